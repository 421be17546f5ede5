//! The filesystem tree.
//!
//! [`FileSystem`] owns the unit arena plus two distinguished ids: the
//! root and the pointer (current directory). All structural mutation
//! goes through it so parent and child links stay consistent. Paths are
//! pre-split, root-relative segment slices -- see [`crate::path`] for
//! how path strings become segments.
//!
//! Stale ids are programming errors, not fallible inputs: accessors
//! panic on a released id rather than returning an error.

use chrono::{DateTime, Utc};

use husk_types::error::{HuskError, Result};

use crate::unit::{FsUnit, ROOT_NAME, UnitId, UnitKind};

/// The in-memory tree: arena, root, and the current-directory pointer.
#[derive(Debug)]
pub struct FileSystem {
    units: Vec<Option<FsUnit>>,
    root: UnitId,
    pointer: UnitId,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem {
    /// A tree holding only the root, which is also the current directory.
    pub fn new() -> Self {
        let root = FsUnit {
            name: ROOT_NAME.to_string(),
            kind: UnitKind::Dir {
                children: Vec::new(),
            },
            last_modified: Utc::now(),
            parent: 0,
        };
        Self {
            units: vec![Some(root)],
            root: 0,
            pointer: 0,
        }
    }

    pub fn root(&self) -> UnitId {
        self.root
    }

    /// The current directory.
    pub fn pointer(&self) -> UnitId {
        self.pointer
    }

    /// Whether `id` refers to a live unit.
    pub fn contains(&self, id: UnitId) -> bool {
        self.units.get(id).is_some_and(Option::is_some)
    }

    /// Borrow a unit. Panics if `id` was released.
    pub fn unit(&self, id: UnitId) -> &FsUnit {
        self.units[id].as_ref().expect("released unit id")
    }

    fn unit_mut(&mut self, id: UnitId) -> &mut FsUnit {
        self.units[id].as_mut().expect("released unit id")
    }

    // ----------------------------------------------------------------
    // Creation
    // ----------------------------------------------------------------

    /// Allocate a detached file unit.
    pub fn create_file(&mut self, name: &str, content: &str) -> UnitId {
        self.alloc(
            name,
            UnitKind::File {
                content: content.to_string(),
            },
        )
    }

    /// Allocate a detached directory unit.
    pub fn create_dir(&mut self, name: &str) -> UnitId {
        self.alloc(
            name,
            UnitKind::Dir {
                children: Vec::new(),
            },
        )
    }

    fn alloc(&mut self, name: &str, kind: UnitKind) -> UnitId {
        let id = self.units.len();
        // parent = own id marks the unit as detached until attached.
        self.units.push(Some(FsUnit {
            name: name.to_string(),
            kind,
            last_modified: Utc::now(),
            parent: id,
        }));
        id
    }

    // ----------------------------------------------------------------
    // Directory-level operations
    // ----------------------------------------------------------------

    /// Children of a directory in insertion order. Non-directories hold
    /// nothing.
    pub fn children(&self, id: UnitId) -> &[UnitId] {
        match &self.unit(id).kind {
            UnitKind::Dir { children } => children,
            _ => &[],
        }
    }

    /// Look up a directory entry by name.
    pub fn child(&self, dir: UnitId, name: &str) -> Option<UnitId> {
        self.children(dir)
            .iter()
            .copied()
            .find(|&c| self.unit(c).name == name)
    }

    /// Put `child` into `parent`, which must be a directory.
    ///
    /// An existing entry with the same name is silently replaced **in
    /// place** -- the entry keeps its position in insertion order and the
    /// replaced subtree is released. A child already attached elsewhere
    /// is moved, not duplicated.
    pub fn attach(&mut self, parent: UnitId, child: UnitId) -> Result<UnitId> {
        assert_ne!(child, self.root, "the root cannot be attached");
        if !self.unit(parent).is_dir() {
            return Err(HuskError::InvalidParent);
        }

        let old_parent = self.unit(child).parent;
        if old_parent != child && old_parent != parent {
            self.unlist(old_parent, child);
        }

        let name = self.unit(child).name.clone();
        let existing = self
            .children(parent)
            .iter()
            .position(|&c| self.unit(c).name == name);
        match existing {
            Some(idx) => {
                let replaced = self.children(parent)[idx];
                if replaced != child {
                    if let UnitKind::Dir { children } = &mut self.unit_mut(parent).kind {
                        children[idx] = child;
                    }
                    self.release(replaced);
                }
            }
            None => {
                if let UnitKind::Dir { children } = &mut self.unit_mut(parent).kind {
                    children.push(child);
                }
            }
        }

        self.unit_mut(child).parent = parent;
        Ok(child)
    }

    /// Remove the entry called `name` from `parent` and release its
    /// subtree. Returns `true` when an entry was removed, `false` when
    /// nothing by that name exists, so calling it twice is safe.
    pub fn detach(&mut self, parent: UnitId, name: &str) -> bool {
        let Some(entry) = self.child(parent, name) else {
            return false;
        };
        self.unlist(parent, entry);
        self.release(entry);
        true
    }

    /// Drop `child` from `parent`'s entry list without releasing it.
    fn unlist(&mut self, parent: UnitId, child: UnitId) {
        if let UnitKind::Dir { children } = &mut self.unit_mut(parent).kind {
            children.retain(|&c| c != child);
        }
    }

    /// Free a unit and everything beneath it. Slots are never reused.
    fn release(&mut self, id: UnitId) {
        let unit = self.units[id].take().expect("released unit id");
        if let UnitKind::Dir { children } = unit.kind {
            for child in children {
                self.release(child);
            }
        }
    }

    // ----------------------------------------------------------------
    // Tree-level operations
    // ----------------------------------------------------------------

    /// Resolve root-relative segments to a unit. The empty path is the
    /// root. Returns `None` as soon as a segment is missing or an
    /// intermediate unit is not a directory.
    pub fn get<S: AsRef<str>>(&self, segments: &[S]) -> Option<UnitId> {
        let mut current = self.root;
        for seg in segments {
            current = self.child(current, seg.as_ref())?;
        }
        Some(current)
    }

    /// Insert `unit` at `path`, the full path of the new unit with its
    /// name as the last segment.
    ///
    /// With more than one segment, the last segment must equal the
    /// unit's own name, and the parent is resolved from the preceding
    /// segments (`ParentNotFound` / `NotADirectory` on failure). With a
    /// single segment (or none) the unit goes directly under the root,
    /// with no name check. Duplicate names silently overwrite, as in
    /// [`FileSystem::attach`].
    pub fn add<S: AsRef<str>>(&mut self, unit: UnitId, path: &[S]) -> Result<UnitId> {
        if path.len() <= 1 {
            let root = self.root;
            return self.attach(root, unit);
        }
        let last = path[path.len() - 1].as_ref();
        if self.unit(unit).name != last {
            return Err(HuskError::InvalidPath(format!(
                "path ends in '{last}' but the unit is named '{}'",
                self.unit(unit).name
            )));
        }
        let parent = self.resolve_parent(&path[..path.len() - 1])?;
        self.attach(parent, unit)
    }

    /// Remove `unit` at `path`; the contract mirrors [`FileSystem::add`].
    /// Returns whether an entry was actually removed.
    pub fn remove<S: AsRef<str>>(&mut self, unit: UnitId, path: &[S]) -> Result<bool> {
        let name = self.unit(unit).name.clone();
        if path.len() <= 1 {
            let root = self.root;
            return Ok(self.detach(root, &name));
        }
        let last = path[path.len() - 1].as_ref();
        if name != last {
            return Err(HuskError::InvalidPath(format!(
                "path ends in '{last}' but the unit is named '{name}'"
            )));
        }
        let parent = self.resolve_parent(&path[..path.len() - 1])?;
        Ok(self.detach(parent, &name))
    }

    fn resolve_parent<S: AsRef<str>>(&self, parent_path: &[S]) -> Result<UnitId> {
        let parent = self
            .get(parent_path)
            .ok_or_else(|| HuskError::ParentNotFound(join_segments(parent_path)))?;
        if !self.unit(parent).is_dir() {
            return Err(HuskError::NotADirectory(join_segments(parent_path)));
        }
        Ok(parent)
    }

    /// Move the pointer to the directory at `segments`.
    pub fn cd<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<()> {
        let target = self
            .get(segments)
            .ok_or_else(|| HuskError::InvalidPath(join_segments(segments)))?;
        if !self.unit(target).is_dir() {
            return Err(HuskError::NotADirectory(join_segments(segments)));
        }
        self.pointer = target;
        Ok(())
    }

    /// Absolute path of the current directory: `/`-joined ancestor names
    /// with a leading slash; the root alone is `/`.
    pub fn pwd(&self) -> String {
        let segments = self.path(self.pointer);
        if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", segments.join("/"))
        }
    }

    /// Root-relative path segments of a unit (empty for the root).
    /// Panics on a detached non-root unit, which has no path.
    pub fn path(&self, id: UnitId) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = id;
        while current != self.root {
            let unit = self.unit(current);
            assert_ne!(unit.parent, current, "detached unit has no path");
            segments.push(unit.name.clone());
            current = unit.parent;
        }
        segments.reverse();
        segments
    }

    /// Derived size in bytes: UTF-8 content length for files, recursive
    /// sum for directories (which have no intrinsic size of their own).
    pub fn size(&self, id: UnitId) -> u64 {
        match &self.unit(id).kind {
            UnitKind::File { content } => content.len() as u64,
            UnitKind::Dir { children } => children.iter().map(|&c| self.size(c)).sum(),
            UnitKind::Link => 0,
        }
    }

    /// File content, `None` for non-files.
    pub fn content(&self, id: UnitId) -> Option<&str> {
        match &self.unit(id).kind {
            UnitKind::File { content } => Some(content),
            _ => None,
        }
    }

    pub fn last_modified(&self, id: UnitId) -> DateTime<Utc> {
        self.unit(id).last_modified
    }

    /// Replace a file's content; size follows, `last_modified` refreshes.
    pub fn update_file(&mut self, id: UnitId, content: &str) -> Result<()> {
        let unit = self.unit_mut(id);
        match &mut unit.kind {
            UnitKind::File { content: existing } => {
                *existing = content.to_string();
            }
            _ => return Err(HuskError::NotAFile(unit.name.clone())),
        }
        unit.last_modified = Utc::now();
        Ok(())
    }

    /// Append to a file's content; size follows, `last_modified`
    /// refreshes.
    pub fn append_file(&mut self, id: UnitId, content: &str) -> Result<()> {
        let unit = self.unit_mut(id);
        match &mut unit.kind {
            UnitKind::File { content: existing } => {
                existing.push_str(content);
            }
            _ => return Err(HuskError::NotAFile(unit.name.clone())),
        }
        unit.last_modified = Utc::now();
        Ok(())
    }
}

fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("/")
}
