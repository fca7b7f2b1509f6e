use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{BufferSnapshot, EditorHost, split_lines};
use crate::vfs::{absolute_normalized, same_file};

#[derive(Debug, Clone)]
struct Buffer {
    path: PathBuf,
    lines: Vec<String>,
    modified: bool,
}

/// An editor kept entirely in memory. Buffers are line lists, as in vim.
#[derive(Debug, Default)]
pub struct MemoryHost {
    buffers: Vec<Buffer>,
    current: Option<usize>,
    cursor: (usize, usize),
    errors: Vec<String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `path` with the given text and makes it current.
    pub fn open_with_text(
        &mut self,
        path: impl AsRef<Path>,
        text: &str,
    ) {
        let path = absolute_normalized(path.as_ref());
        let lines = split_lines(text);
        match self.position(&path) {
            Some(index) => {
                self.buffers[index].lines = lines;
                self.current = Some(index);
            },
            None => {
                self.buffers.push(Buffer {
                    path,
                    lines,
                    modified: false,
                });
                self.current = Some(self.buffers.len() - 1);
            },
        }
    }

    /// Opens `path` from disk (empty when missing) and makes it current.
    pub fn open_file(
        &mut self,
        path: impl AsRef<Path>,
    ) {
        self.open_or_switch(path.as_ref());
    }

    pub fn set_cursor(
        &mut self,
        line: usize,
        column: usize,
    ) {
        self.cursor = (line, column);
    }

    pub fn cursor_position(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Lines of the buffer for `path`, if open.
    pub fn lines(
        &self,
        path: &Path,
    ) -> Option<&[String]> {
        self.position(path).map(|index| self.buffers[index].lines.as_slice())
    }

    /// Buffer text joined with `\n`, with a trailing newline when non-empty.
    pub fn text(
        &self,
        path: &Path,
    ) -> Option<String> {
        self.lines(path).map(join_lines)
    }

    /// Buffers changed by [`EditorHost::splice_lines`], with their new text.
    pub fn modified_buffers(&self) -> Vec<BufferSnapshot> {
        self.buffers
            .iter()
            .filter(|buffer| buffer.modified)
            .map(|buffer| BufferSnapshot {
                path: buffer.path.clone(),
                text: join_lines(&buffer.lines),
            })
            .collect()
    }

    fn position(
        &self,
        path: &Path,
    ) -> Option<usize> {
        self.buffers.iter().position(|buffer| same_file(&buffer.path, path))
    }
}

fn join_lines(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

impl EditorHost for MemoryHost {
    fn current_file(&self) -> Option<PathBuf> {
        self.current.map(|index| self.buffers[index].path.clone())
    }

    fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    fn buffers(&self) -> Vec<BufferSnapshot> {
        self.buffers
            .iter()
            .map(|buffer| BufferSnapshot {
                path: buffer.path.clone(),
                text: buffer.lines.join("\n"),
            })
            .collect()
    }

    fn open_or_switch(
        &mut self,
        path: &Path,
    ) {
        if let Some(index) = self.position(path) {
            self.current = Some(index);
            return;
        }
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) => {
                debug!("Starting empty buffer for {}: {error}", path.display());
                String::new()
            },
        };
        self.open_with_text(path, &text);
    }

    fn line_count(
        &self,
        path: &Path,
    ) -> usize {
        self.lines(path).map_or(0, <[String]>::len)
    }

    fn splice_lines(
        &mut self,
        path: &Path,
        at: usize,
        lines: &[String],
    ) {
        let Some(index) = self.position(path) else {
            warn!("Splice into unopened buffer {}", path.display());
            return;
        };
        let buffer = &mut self.buffers[index];
        let at = at.min(buffer.lines.len());
        buffer.lines.splice(at..at, lines.iter().cloned());
        buffer.modified = true;
    }

    fn set_cursor_line(
        &mut self,
        line: usize,
    ) {
        self.cursor = (line, 1);
    }

    fn report_error(
        &mut self,
        message: &str,
    ) {
        self.errors.push(message.to_string());
    }
}

#[cfg(test)]
#[path = "../../tests/src/host/memory_tests.rs"]
mod tests;
