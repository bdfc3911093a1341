//! Editor model: what is shown for the selected script
//!
//! - [`mode`]: editor modes and pane identifiers
//! - [`script`]: script types and the "add script" workflow
//! - [`frame`]: one script with its compilation and annotated evaluation
//! - [`state`]: [`ComputedEditorState`] for a selection
//! - [`session`]: an open document, its state and the retained identifier
//!
//! # Identifier retention
//!
//! Each computed state carries an identifier only when at least one of its
//! frames compiled. [`EditorSession`] feeds that into an
//! [`IdentifierSlot`](crate::evaluation::IdentifierSlot), so stack values
//! stay labelled while the user is mid-edit and the compiler is failing.

pub mod frame;
pub mod mode;
pub mod script;
pub mod session;
pub mod state;

pub use frame::{FrameOutcome, ScriptEditorFrame};
pub use mode::{ProjectEditorMode, ScriptEditorPane, ScriptEvaluationViewerPane};
pub use script::{NewScript, NewScriptRequest, ScriptType};
pub use session::{EditorSession, ReloadSummary};
pub use state::{compute_editor_state, ComputedEditorState, EditorStateScriptMode};
