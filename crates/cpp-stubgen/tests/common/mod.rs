#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tower_lsp::lsp_types::{Position, Url};

pub const SHAPE_H: &str = "\
namespace geo {

class Shape {
public:
    void draw() const;
    int area(int scale) const;
    void reset();
};

}
";

pub const SHAPE_CPP: &str = "\
#include \"shape.h\"

namespace geo {

void Shape::draw() const
{
}

void Shape::reset()
{
}

}
";

pub fn has_clang() -> bool {
    std::process::Command::new("clang").arg("--version").output().is_ok_and(|output| output.status.success())
}

/// A temporary directory holding `files`, given as (relative path, contents).
pub fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp workspace");
    for (relative_path, contents) in files {
        let path = dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create workspace dirs");
        }
        std::fs::write(&path, contents).expect("write workspace file");
    }
    dir
}

/// Canonical path of `relative_path` inside `dir`, matching what clang reports.
pub fn workspace_path(
    dir: &TempDir,
    relative_path: &str,
) -> PathBuf {
    let path = dir.path().join(relative_path);
    path.canonicalize().unwrap_or(path)
}

pub fn file_uri(path: &Path) -> Url {
    Url::from_file_path(path).expect("workspace path is a valid file:// URI")
}

/// 1-based line and 1-based byte column of the first `needle`.
pub fn cursor_of(
    source: &str,
    needle: &str,
) -> (usize, usize) {
    let offset = source.find(needle).unwrap_or_else(|| panic!("needle not found: {needle}"));
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = offset - before.rfind('\n').map_or(0, |index| index + 1) + 1;
    (line, column)
}

pub fn position_of(
    source: &str,
    needle: &str,
) -> Position {
    let (line, column) = cursor_of(source, needle);
    let line_start = source.split('\n').take(line - 1).map(|text| text.len() + 1).sum::<usize>();
    let character = source[line_start..line_start + column - 1].encode_utf16().count() as u32;
    Position::new(line as u32 - 1, character)
}
