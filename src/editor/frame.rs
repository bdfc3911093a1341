//! One script as shown in a script editor column

use super::script::ScriptType;
use crate::evaluation::{build_evaluation, outcome, Evaluation, HighlightKind};
use crate::trace::{Compilation, CompilationError, TemplateScript};

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptEditorFrame {
    pub name: String,
    pub id: String,
    pub internal_id: String,
    pub script: String,
    pub script_type: ScriptType,
    pub compilation: Compilation,
    /// `None` when the script did not compile
    pub evaluation: Option<Evaluation>,
}

/// How a frame's evaluation ended, for summaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Compilation failed, so there is nothing to evaluate
    NoEvaluation,
    /// Compiled, but the evaluator recorded no states
    EmptyEvaluation,
    Finished(HighlightKind),
}

impl ScriptEditorFrame {
    pub fn from_script(script: &TemplateScript) -> Self {
        let compilation = script.compilation.clone().unwrap_or_else(|| Compilation::Failure {
            errors: vec![CompilationError {
                message: "Script has not been compiled".to_string(),
                line: None,
            }],
        });
        let evaluation = compilation.states().map(build_evaluation);

        tracing::debug!(
            script = %script.id,
            compiled = compilation.is_success(),
            lines = evaluation.as_ref().map(Vec::len),
            "built script editor frame"
        );

        ScriptEditorFrame {
            name: script.name.clone(),
            id: script.id.clone(),
            internal_id: script.internal_id.clone(),
            script: script.script.clone(),
            script_type: script.script_type,
            compilation,
            evaluation,
        }
    }

    pub fn outcome(&self) -> FrameOutcome {
        match &self.evaluation {
            None => FrameOutcome::NoEvaluation,
            Some(lines) => match outcome(lines) {
                None => FrameOutcome::EmptyEvaluation,
                Some(highlight) => FrameOutcome::Finished(highlight),
            },
        }
    }

    /// One-line outcome, as printed by `check`
    pub fn summary(&self) -> String {
        match self.outcome() {
            FrameOutcome::NoEvaluation => {
                let errors: Vec<&str> = self
                    .compilation
                    .errors()
                    .iter()
                    .map(|error| error.message.as_str())
                    .collect();
                format!("no evaluation ({})", errors.join("; "))
            }
            FrameOutcome::EmptyEvaluation => "empty evaluation".to_string(),
            FrameOutcome::Finished(highlight) => match self.final_error() {
                Some(error) => format!("{}: {}", highlight.label(), error),
                None => highlight.label().to_string(),
            },
        }
    }

    /// Error reported by the VM on the final line, if any
    pub fn final_error(&self) -> Option<&str> {
        self.evaluation
            .as_ref()
            .and_then(|lines| lines.last())
            .and_then(|line| line.state.error.as_deref())
    }
}
