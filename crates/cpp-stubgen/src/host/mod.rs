//! The editor the stub generator runs inside.
//!
//! [`EditorHost`] is the whole surface the orchestrator uses: the current
//! file and cursor, snapshots of open buffers, and the few edits it makes.

pub(crate) mod memory;

use std::path::{Path, PathBuf};

pub use memory::MemoryHost;

use crate::vfs::same_file;

/// Full text of one open buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSnapshot {
    pub path: PathBuf,
    pub text: String,
}

pub trait EditorHost {
    /// Path of the file under the cursor.
    fn current_file(&self) -> Option<PathBuf>;

    /// 1-based line and 1-based byte column.
    fn cursor(&self) -> (usize, usize);

    fn buffers(&self) -> Vec<BufferSnapshot>;

    /// Makes `path` the current buffer, loading it first if it is not open.
    fn open_or_switch(
        &mut self,
        path: &Path,
    );

    fn line_count(
        &self,
        path: &Path,
    ) -> usize;

    /// Inserts `lines` before 0-based line `at`. `at == line_count` appends.
    fn splice_lines(
        &mut self,
        path: &Path,
        at: usize,
        lines: &[String],
    );

    /// Moves the cursor in the current buffer to a 1-based line.
    fn set_cursor_line(
        &mut self,
        line: usize,
    );

    fn report_error(
        &mut self,
        message: &str,
    );
}

/// The open buffer for `path`, if any. Scans the host's buffers on every call.
pub fn find_buffer<H>(
    host: &H,
    path: &Path,
) -> Option<BufferSnapshot>
where
    H: EditorHost + ?Sized,
{
    host.buffers().into_iter().find(|buffer| same_file(&buffer.path, path))
}

/// Splits buffer text into lines the way an editor shows them: no line
/// terminators, and no phantom empty line after a final newline.
pub fn split_lines(text: &str) -> Vec<String> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line).to_string()).collect()
}

#[cfg(test)]
#[path = "../../tests/src/host/host_tests.rs"]
mod tests;
