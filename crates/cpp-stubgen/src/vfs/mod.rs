use std::path::{Component, Path, PathBuf};

/// Normalize a path for identity comparisons.
///
/// Resolves symlinks when the file exists. Otherwise the path is only cleaned
/// lexically, so unsaved buffers that have never touched disk still compare
/// equal to the names clang reports for them.
pub fn normalized_path(path: &Path) -> PathBuf {
    let cleaned = lexically_normalized(path);
    cleaned.canonicalize().unwrap_or(cleaned)
}

/// Drop `.` components and fold `..` into its parent without touching the
/// file system.
pub fn lexically_normalized(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            },
            other => out.push(other),
        }
    }
    out
}

/// Make `path` absolute against the current directory, then normalize it.
pub fn absolute_normalized(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalized_path(&absolute)
}

/// Compare two file paths for identity.
pub fn same_file(
    a: &Path,
    b: &Path,
) -> bool {
    a == b || normalized_path(a) == normalized_path(b)
}

#[cfg(test)]
#[path = "../../tests/src/vfs_tests.rs"]
mod tests;
