//! Outcome highlight for the final line of an evaluation

use crate::vm::ProgramState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    /// Evaluation finished with a clean stack
    Success,
    /// The VM reported an error
    Fail,
    /// No error, but the stack is not a single canonical `1`
    DirtyStack,
}

impl HighlightKind {
    pub fn label(self) -> &'static str {
        match self {
            HighlightKind::Success => "success",
            HighlightKind::Fail => "fail",
            HighlightKind::DirtyStack => "dirty stack",
        }
    }
}

/// Classify the last state of an evaluation
pub fn highlight(final_state: &ProgramState) -> HighlightKind {
    if final_state.has_error() {
        HighlightKind::Fail
    } else if final_state.is_clean_stack() {
        HighlightKind::Success
    } else {
        HighlightKind::DirtyStack
    }
}
