use std::path::{Path, PathBuf};

pub const HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hxx"];
pub const SOURCE_EXTENSIONS: &[&str] = &["cpp", "cxx", "c"];

const DEFAULT_HEADER_EXTENSION: &str = "h";
const DEFAULT_SOURCE_EXTENSION: &str = "cpp";

/// The header paired with `file`: `file` itself when it already is one,
/// otherwise the same stem with `.h`.
pub fn header_path(file: &Path) -> PathBuf {
    paired_path(file, HEADER_EXTENSIONS, DEFAULT_HEADER_EXTENSION)
}

/// The source file paired with `file`: `file` itself when it already is one,
/// otherwise the same stem with `.cpp`.
pub fn source_path(file: &Path) -> PathBuf {
    paired_path(file, SOURCE_EXTENSIONS, DEFAULT_SOURCE_EXTENSION)
}

pub fn is_c_family(file: &Path) -> bool {
    file.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| HEADER_EXTENSIONS.contains(&ext) || SOURCE_EXTENSIONS.contains(&ext))
}

fn paired_path(
    file: &Path,
    keep: &[&str],
    default_extension: &str,
) -> PathBuf {
    let extension = file.extension().and_then(|ext| ext.to_str());
    if extension.is_some_and(|ext| keep.contains(&ext)) {
        return file.to_path_buf();
    }
    file.with_extension(default_extension)
}

#[cfg(test)]
#[path = "../../tests/src/stub/paths_tests.rs"]
mod tests;
