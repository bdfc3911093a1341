//! Nesting markers for evaluation lines

use crate::vm::ProgramState;

/// Visual indicator that the end of a line is inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpacerKind {
    /// Inside a sub-evaluation invoked by the current script
    Evaluation,
    /// Inside an `OP_IF`/`OP_NOTIF` block whose active branch is executing
    ExecutedConditional,
    /// Inside an `OP_IF`/`OP_NOTIF` block whose active branch is skipped
    SkippedConditional,
}

/// Spacers for one state, outermost block first.
///
/// Conditionals come from the execution stack; one [`SpacerKind::Evaluation`]
/// follows for every open sub-evaluation.
pub fn spacers(state: &ProgramState) -> Vec<SpacerKind> {
    state
        .execution_stack
        .iter()
        .map(|&executing| {
            if executing {
                SpacerKind::ExecutedConditional
            } else {
                SpacerKind::SkippedConditional
            }
        })
        .chain(std::iter::repeat(SpacerKind::Evaluation).take(state.evaluation_depth))
        .collect()
}
