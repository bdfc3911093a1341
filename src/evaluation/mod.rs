//! Annotation of VM evaluation traces
//!
//! The external evaluator hands over an ordered list of
//! [`ProgramState`](crate::vm::ProgramState)s. This module decorates them for
//! display:
//!
//! - [`spacer`]: nesting markers derived from a single state's execution stack
//! - [`highlight`]: success / fail / dirty-stack outcome of the final state
//! - [`line`]: combines both into an [`Evaluation`]
//! - [`identify`]: reverse lookup from stack bytes to identifier names
//!
//! Every classifier is a pure function of its input state. Only
//! [`identify::IdentifierSlot`] holds anything across evaluations.

pub mod highlight;
pub mod identify;
pub mod line;
pub mod spacer;

pub use highlight::{highlight, HighlightKind};
pub use identify::{Binding, BindingScope, IdentifierSlot, StackItemIdentifier};
pub use line::{build_evaluation, outcome, Evaluation, EvaluationLine};
pub use spacer::{spacers, SpacerKind};
