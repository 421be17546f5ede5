//! Filesystem units.
//!
//! Units live in the arena owned by [`crate::FileSystem`]; they never own
//! each other directly. `parent` is an arena id, and a unit that is not
//! attached anywhere (the root, or a freshly created unit) is its own
//! parent. Ancestor walks must therefore terminate on id identity with
//! the root, never by inspecting names.

use chrono::{DateTime, Utc};

/// Index of a unit in the filesystem arena.
///
/// Slots are never reused after release, so a stale id can never alias a
/// unit created later.
pub type UnitId = usize;

/// Reserved name of the root directory. The name validator rejects `:`,
/// so no user-created unit can carry this name; code still must not
/// branch on it -- root checks compare ids.
pub const ROOT_NAME: &str = ":";

/// A single file or directory in the tree.
#[derive(Debug)]
pub struct FsUnit {
    pub name: String,
    pub kind: UnitKind,
    /// Set at creation, refreshed by content mutations.
    pub last_modified: DateTime<Utc>,
    /// Arena id of the containing directory; self for detached units
    /// and for the root.
    pub parent: UnitId,
}

/// What a unit is, and the payload that comes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    File {
        content: String,
    },
    /// Children in insertion order; lookup within a directory is by name.
    Dir {
        children: Vec<UnitId>,
    },
    /// Reserved for symbolic links. Declared so the kind space is fixed,
    /// but never constructed.
    Link,
}

impl FsUnit {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, UnitKind::File { .. })
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, UnitKind::Dir { .. })
    }
}
