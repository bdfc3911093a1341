//! Building annotated evaluation lines from a program-state stream

use super::highlight::{highlight, HighlightKind};
use super::spacer::{spacers, SpacerKind};
use crate::vm::ProgramState;

/// One renderable line: a program state plus its annotations
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationLine {
    pub state: ProgramState,
    pub spacers: Vec<SpacerKind>,
    /// Present only on the final line
    pub highlight: Option<HighlightKind>,
}

/// Annotated lines for one script evaluation, in evaluation order.
///
/// Use `Option<Evaluation>` where "nothing was evaluated" must stay distinct
/// from an evaluation that produced no states.
pub type Evaluation = Vec<EvaluationLine>;

/// Annotate every state; the final one also gets a highlight
pub fn build_evaluation(states: &[ProgramState]) -> Evaluation {
    let last = states.len().saturating_sub(1);

    states
        .iter()
        .enumerate()
        .map(|(index, state)| {
            let is_final = index == last;
            if !is_final && state.has_error() {
                tracing::warn!(
                    index,
                    total = states.len(),
                    "error state is not the final state of the evaluation"
                );
            }
            EvaluationLine {
                state: state.clone(),
                spacers: spacers(state),
                highlight: is_final.then(|| highlight(state)),
            }
        })
        .collect()
}

/// Highlight of the final line, if the evaluation has any lines
pub fn outcome(evaluation: &[EvaluationLine]) -> Option<HighlightKind> {
    evaluation.last().and_then(|line| line.highlight)
}
