//! In-memory virtual filesystem for husk.
//!
//! The tree is an arena: every file and directory is an [`FsUnit`] slot
//! addressed by a [`UnitId`], with parent and child links maintained by
//! the owning [`FileSystem`]. Nothing here ever touches the host
//! filesystem; snapshots serialize the whole tree to a tagged text
//! format that restores with full fidelity.

pub mod fs;
pub mod path;
pub mod snapshot;
pub mod unit;

/// The filesystem tree and its operations.
pub use fs::FileSystem;
/// Arena unit types.
pub use unit::{FsUnit, ROOT_NAME, UnitId, UnitKind};
