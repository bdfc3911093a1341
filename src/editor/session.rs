//! An open template document and the editor state derived from it

use super::state::{compute_editor_state, ComputedEditorState};
use crate::errors::LoadError;
use crate::evaluation::{IdentifierSlot, StackItemIdentifier};
use crate::trace::TemplateDocument;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What changed on a reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadSummary {
    pub frames: usize,
    pub compiled: usize,
    /// False when every compilation failed and the old identifier was kept
    pub identifier_replaced: bool,
}

pub struct EditorSession {
    path: Option<PathBuf>,
    document: TemplateDocument,
    selection: Option<String>,
    state: ComputedEditorState,
    identifiers: IdentifierSlot,
}

impl EditorSession {
    /// Open a document from disk.
    ///
    /// Without an explicit selection the first script of the template is
    /// selected.
    pub fn open(path: &Path, selection: Option<String>) -> Result<Self, LoadError> {
        let document = TemplateDocument::load(path)?;
        let mut session = Self::from_document(document, selection)?;
        session.path = Some(path.to_path_buf());
        Ok(session)
    }

    pub fn from_document(
        document: TemplateDocument,
        selection: Option<String>,
    ) -> Result<Self, LoadError> {
        let selection =
            selection.or_else(|| document.scripts.first().map(|script| script.id.clone()));
        let mut session = EditorSession {
            path: None,
            state: ComputedEditorState::Loading,
            document,
            selection,
            identifiers: IdentifierSlot::new(),
        };
        session.recompute()?;
        Ok(session)
    }

    /// Re-read the document from disk and recompute the editor state
    pub fn reload(&mut self) -> Result<ReloadSummary, LoadError> {
        match &self.path {
            Some(path) => {
                let document = TemplateDocument::load(path)?;
                self.replace_document(document)
            }
            None => self.recompute(),
        }
    }

    /// Swap in a new document, e.g. after the compiler re-ran
    ///
    /// The session is left untouched if the new document cannot be shown.
    pub fn replace_document(
        &mut self,
        document: TemplateDocument,
    ) -> Result<ReloadSummary, LoadError> {
        let previous = std::mem::replace(&mut self.document, document);
        self.recompute().inspect_err(|_| self.document = previous)
    }

    /// Select a different script (by ID)
    pub fn select(&mut self, selection: Option<String>) -> Result<ReloadSummary, LoadError> {
        let previous = std::mem::replace(&mut self.selection, selection);
        self.recompute().inspect_err(|_| self.selection = previous)
    }

    fn recompute(&mut self) -> Result<ReloadSummary, LoadError> {
        let state = compute_editor_state(&self.document, self.selection.as_deref())?;

        let (frames, compiled, next) = match &state {
            ComputedEditorState::Script(script_mode) => (
                script_mode.frames.len(),
                script_mode
                    .frames
                    .iter()
                    .filter(|frame| frame.compilation.is_success())
                    .count(),
                script_mode.identify_stack_items.clone(),
            ),
            _ => (0, 0, None),
        };
        let identifier_replaced = self.identifiers.update(next);
        self.state = state;

        Ok(ReloadSummary {
            frames,
            compiled,
            identifier_replaced,
        })
    }

    pub fn state(&self) -> &ComputedEditorState {
        &self.state
    }

    pub fn document(&self) -> &TemplateDocument {
        &self.document
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The identifier in effect, which may come from an earlier compilation
    pub fn identifier(&self) -> Option<Arc<StackItemIdentifier>> {
        self.identifiers.get()
    }
}
