//! An [`EditorHost`] over the LSP document store.
//!
//! The orchestrator runs on a blocking thread, so this host cannot talk to
//! the client. It records what the orchestrator asks for and turns that into
//! client requests afterwards.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use tower_lsp::lsp_types::{
    CreateFile, DocumentChangeOperation, DocumentChanges, OneOf, OptionalVersionedTextDocumentIdentifier, Position,
    Range, ResourceOp, ShowDocumentParams, TextDocumentEdit, TextEdit, Url, WorkspaceEdit,
};
use tracing::warn;

use crate::{
    document::Document,
    host::{BufferSnapshot, EditorHost, split_lines},
    vfs::same_file,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostAction {
    Insert {
        path: PathBuf,
        at: usize,
        lines: Vec<String>,
    },
    ShowLine {
        path: PathBuf,
        line: usize,
    },
    Error(String),
}

/// What the server sends the client once the orchestrator is done.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ClientRequest {
    ApplyEdit(WorkspaceEdit),
    ShowDocument(ShowDocumentParams),
    ShowError(String),
}

pub(crate) struct LspHost {
    current: PathBuf,
    cursor: (usize, usize),
    open: Vec<BufferSnapshot>,
    /// Files loaded by `open_or_switch` that the client does not have open.
    loaded: Vec<BufferSnapshot>,
    /// Loaded files that do not exist on disk either.
    created: HashSet<PathBuf>,
    active: PathBuf,
    actions: Vec<HostAction>,
}

impl LspHost {
    pub(crate) fn new(
        current: PathBuf,
        cursor: (usize, usize),
        documents: Vec<Document>,
    ) -> Self {
        let open = documents
            .into_iter()
            .filter_map(|document| {
                let path = document.uri.to_file_path().ok()?;
                Some(BufferSnapshot {
                    path,
                    text: document.text,
                })
            })
            .collect();
        Self {
            active: current.clone(),
            current,
            cursor,
            open,
            loaded: Vec::new(),
            created: HashSet::new(),
            actions: Vec::new(),
        }
    }

    pub(crate) fn actions(&self) -> &[HostAction] {
        &self.actions
    }

    fn snapshot(
        &self,
        path: &Path,
    ) -> Option<&BufferSnapshot> {
        self.open.iter().chain(&self.loaded).find(|buffer| same_file(&buffer.path, path))
    }

    /// Client requests for the recorded actions, in order.
    pub(crate) fn into_requests(self) -> Vec<ClientRequest> {
        let mut requests = Vec::new();
        for action in &self.actions {
            match action {
                HostAction::Insert {
                    path,
                    at,
                    lines,
                } => {
                    let Ok(uri) = Url::from_file_path(path) else {
                        warn!("Cannot address {} as a file URI", path.display());
                        continue;
                    };
                    let text = self.snapshot(path).map(|buffer| buffer.text.clone()).unwrap_or_default();
                    let created = self.created.contains(path);
                    requests.push(ClientRequest::ApplyEdit(insert_edit(uri, &text, *at, lines, created)));
                },
                HostAction::ShowLine {
                    path,
                    line,
                } => {
                    let Ok(uri) = Url::from_file_path(path) else {
                        warn!("Cannot address {} as a file URI", path.display());
                        continue;
                    };
                    let position = Position::new(line.saturating_sub(1) as u32, 0);
                    requests.push(ClientRequest::ShowDocument(ShowDocumentParams {
                        uri,
                        external: Some(false),
                        take_focus: Some(true),
                        selection: Some(Range::new(position, position)),
                    }));
                },
                HostAction::Error(message) => requests.push(ClientRequest::ShowError(message.clone())),
            }
        }
        requests
    }
}

/// A workspace edit inserting `lines` before 0-based line `at` of a buffer
/// holding `text`. A `CreateFile` goes first for a file that does not exist.
fn insert_edit(
    uri: Url,
    text: &str,
    at: usize,
    lines: &[String],
    create: bool,
) -> WorkspaceEdit {
    let document = Document::new(uri.clone(), text.to_string(), 0);
    let (position, prefix) = document.insertion_point(at);
    let new_text = format!("{prefix}{}\n", lines.join("\n"));

    let mut operations = Vec::new();
    if create {
        operations.push(DocumentChangeOperation::Op(ResourceOp::Create(CreateFile {
            uri: uri.clone(),
            options: None,
            annotation_id: None,
        })));
    }
    operations.push(DocumentChangeOperation::Edit(TextDocumentEdit {
        text_document: OptionalVersionedTextDocumentIdentifier {
            uri,
            version: None,
        },
        edits: vec![OneOf::Left(TextEdit {
            range: Range::new(position, position),
            new_text,
        })],
    }));

    WorkspaceEdit {
        changes: None,
        document_changes: Some(DocumentChanges::Operations(operations)),
        change_annotations: None,
    }
}

impl EditorHost for LspHost {
    fn current_file(&self) -> Option<PathBuf> {
        Some(self.current.clone())
    }

    fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    fn buffers(&self) -> Vec<BufferSnapshot> {
        self.open.clone()
    }

    fn open_or_switch(
        &mut self,
        path: &Path,
    ) {
        self.active = path.to_path_buf();
        if self.snapshot(path).is_some() {
            return;
        }
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                self.created.insert(path.to_path_buf());
                String::new()
            },
        };
        self.loaded.push(BufferSnapshot {
            path: path.to_path_buf(),
            text,
        });
    }

    fn line_count(
        &self,
        path: &Path,
    ) -> usize {
        self.snapshot(path).map_or(0, |buffer| split_lines(&buffer.text).len())
    }

    fn splice_lines(
        &mut self,
        path: &Path,
        at: usize,
        lines: &[String],
    ) {
        self.actions.push(HostAction::Insert {
            path: path.to_path_buf(),
            at,
            lines: lines.to_vec(),
        });
    }

    fn set_cursor_line(
        &mut self,
        line: usize,
    ) {
        self.actions.push(HostAction::ShowLine {
            path: self.active.clone(),
            line,
        });
    }

    fn report_error(
        &mut self,
        message: &str,
    ) {
        self.actions.push(HostAction::Error(message.to_string()));
    }
}

#[cfg(test)]
#[path = "../../tests/src/server/lsp_host_tests.rs"]
mod tests;
