//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`evaluation`]: annotated evaluation lines with the spacer gutter and
//!   current line indicator
//! - [`stack`]: data, alternate and execution stacks of the current state
//! - [`frames`]: scripts evaluated together, with compile status
//! - [`status`]: status bar with keybindings and playback state
//! - `utils`: blocks, outcome colours and scroll clamping shared by the panes
//!
//! Each pane module exports a `render_*` function and, where the pane
//! scrolls, its scroll state type.

mod utils;

pub mod evaluation;
pub mod frames;
pub mod stack;
pub mod status;

// Re-export render functions for convenience
pub use evaluation::{render_evaluation_pane, EvaluationRenderData, EvaluationScrollState};
pub use frames::render_frames_pane;
pub use stack::{render_stack_pane, StackRenderData, StackScrollState};
pub use status::{render_status_bar, StatusRenderData};
