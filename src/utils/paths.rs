// Lexical Path Utilities
//
// Tag paths are opaque: they are never canonicalized or checked against the
// filesystem. Everything here works on path components only.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Normalize a path lexically
///
/// Drops `.` components, repeated separators and trailing separators.
/// `..` is kept as-is: resolving it would need the filesystem (symlinks).
///
/// # Examples
/// ```
/// use carrots_core::utils::paths::normalize;
/// use std::path::PathBuf;
///
/// assert_eq!(normalize("./src//widget.py"), PathBuf::from("src/widget.py"));
/// assert_eq!(normalize("src/../lib/"), PathBuf::from("src/../lib"));
/// ```
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if normalized.as_os_str().is_empty() && !path.as_os_str().is_empty() {
        // "." and "./" normalize to the current directory, not to nothing
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Render a path with Unix-style `/` separators regardless of platform
pub fn to_unix_string(path: &Path) -> String {
    let s = path.to_string_lossy();
    // On Unix, MAIN_SEPARATOR is already '/', so this is a no-op
    if MAIN_SEPARATOR == '\\' {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

/// Whether `child` sits lexically at or below `parent`
///
/// `..` is folded into the preceding component before comparing, so
/// `src/../lib` is not under `src`. A parent of `.` contains every relative
/// path that does not climb above it.
pub fn is_nested_under(child: &Path, parent: &Path) -> bool {
    let child = fold_parent_dirs(child);
    let parent = fold_parent_dirs(parent);

    if parent.as_os_str().is_empty() {
        return child.is_relative()
            && !child.components().any(|c| matches!(c, Component::ParentDir));
    }
    child.starts_with(&parent)
}

/// Cancel each `..` against the normal component before it
///
/// Leading `..` that cannot be cancelled are kept; `..` directly under the
/// root is dropped. The current directory folds to an empty path.
fn fold_parent_dirs(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last().copied() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.into_iter().collect()
}
