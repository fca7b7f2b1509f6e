use tower_lsp::lsp_types::*;

/// Snapshot of a single open text document.
#[derive(Debug, Clone)]
pub struct Document {
    pub uri: Url,
    /// Full source text (always kept up-to-date).
    pub text: String,
    /// Document version as reported by the client.
    pub version: i32,
    /// Line start byte offsets, rebuilt on every mutation.
    line_offsets: Vec<usize>,
}

impl Document {
    pub fn new(
        uri: Url,
        text: String,
        version: i32,
    ) -> Self {
        let line_offsets = Self::compute_line_offsets(&text);
        Self {
            uri,
            text,
            version,
            line_offsets,
        }
    }

    /// Convert an LSP `Position` (line/character, 0-based) to a byte offset.
    pub fn offset_of(
        &self,
        pos: Position,
    ) -> Option<usize> {
        let line = pos.line as usize;
        let line_start = *self.line_offsets.get(line)?;
        let line_end = self.line_offsets.get(line + 1).copied().unwrap_or(self.text.len());
        let line_text = &self.text[line_start..line_end];

        // LSP character offsets are UTF-16 code-unit counts.
        let mut utf16_offset: u32 = 0;
        let mut byte_offset = line_start;
        for ch in line_text.chars() {
            if utf16_offset >= pos.character {
                break;
            }
            utf16_offset += ch.len_utf16() as u32;
            byte_offset += ch.len_utf8();
        }
        Some(byte_offset)
    }

    /// Convert a byte offset to an LSP `Position`.
    pub fn position_of(
        &self,
        offset: usize,
    ) -> Position {
        let offset = offset.min(self.text.len());
        let line = match self.line_offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(ins) => ins.saturating_sub(1),
        };
        let line_start = self.line_offsets[line];
        let character = self.text[line_start..offset].chars().map(|c| c.len_utf16() as u32).sum::<u32>();
        Position {
            line: line as u32,
            character,
        }
    }

    /// The editor cursor for an LSP position: 1-based line, 1-based byte
    /// column.
    pub fn cursor_of(
        &self,
        pos: Position,
    ) -> Option<(usize, usize)> {
        let offset = self.offset_of(pos)?;
        let line = pos.line as usize;
        Some((line + 1, offset - self.line_offsets[line] + 1))
    }

    /// Where text inserted before 0-based `line` goes, and the prefix it
    /// needs. Past the last line this is the end of the text, which needs a
    /// newline first when the text does not end with one.
    pub fn insertion_point(
        &self,
        line: usize,
    ) -> (Position, &'static str) {
        match self.line_offsets.get(line) {
            Some(&offset) if offset < self.text.len() => (self.position_of(offset), ""),
            _ => {
                let prefix = if self.text.is_empty() || self.text.ends_with('\n') {
                    ""
                } else {
                    "\n"
                };
                (self.position_of(self.text.len()), prefix)
            },
        }
    }

    /// Apply a list of incremental or full-content changes and bump version.
    pub fn apply_changes(
        &mut self,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) {
        for change in changes {
            if let Some(range) = change.range {
                if let (Some(start), Some(end)) = (self.offset_of(range.start), self.offset_of(range.end)) {
                    self.text.replace_range(start..end, &change.text);
                    self.line_offsets = Self::compute_line_offsets(&self.text);
                }
            } else {
                self.text = change.text;
                self.line_offsets = Self::compute_line_offsets(&self.text);
            }
        }
        self.version = version;
    }

    fn compute_line_offsets(text: &str) -> Vec<usize> {
        let mut offsets = vec![0usize];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(i + 1);
            }
        }
        offsets
    }
}

#[cfg(test)]
#[path = "../../tests/src/document/text_document_tests.rs"]
mod tests;
