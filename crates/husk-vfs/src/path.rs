//! Path resolution and name validation.
//!
//! Pure string functions; nothing here looks at a filesystem. Paths are
//! handled as `/`-separated strings and resolved into segment vectors
//! that [`crate::FileSystem::get`] consumes.
//!
//! Resolution is deliberately two-moded: only an input containing a `..`
//! segment triggers the segment walk. A `..`-free input is concatenated
//! onto the base verbatim, so `.` is not special and never collapses --
//! callers that want the current directory pass it explicitly.

use husk_types::error::{HuskError, Result};

/// Split a path string on `/`, dropping empty segments. Leading,
/// trailing and repeated slashes are all tolerated uniformly.
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve `input` against the absolute path `base` into root-relative
/// segments.
///
/// If `input` contains any `..` segment, the segments are walked one at
/// a time onto the base stack: a normal segment pushes, `..` pops, and
/// popping an empty stack (ascending above the root) is an
/// [`HuskError::InvalidPath`]. Otherwise the result is the plain
/// concatenation of both segment lists, with no normalization at all.
pub fn resolve(base: &str, input: &str) -> Result<Vec<String>> {
    let mut segments = split_path(base);
    let input_segments = split_path(input);

    if input_segments.iter().any(|s| s == "..") {
        for seg in input_segments {
            if seg == ".." {
                if segments.pop().is_none() {
                    return Err(HuskError::InvalidPath(format!(
                        "{input}: cannot ascend above the root"
                    )));
                }
            } else {
                segments.push(seg);
            }
        }
    } else {
        segments.extend(input_segments);
    }
    Ok(segments)
}

/// Whether `name` is acceptable as a file or directory name: non-empty,
/// only characters from `[A-Za-z0-9._-~]`, and never two dots in a row
/// (so `..` can never be created as a name).
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '~'))
}

/// Whether `path` is acceptable as a directory path string: non-empty
/// and only characters from `[A-Za-z0-9/_-~]`. Note the set has no dot.
/// Repeated slashes are fine -- [`split_path`] collapses them.
pub fn is_valid_dir_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '~'))
}
