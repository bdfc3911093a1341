//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, playback
//! - **[`panes`]**: render functions for each visible pane (evaluation, stack,
//!   frames, status bar)
//! - **[`theme`]**: colour palette used by all panes
//!
//! Construct an [`App`] from an [`EditorSession`] and call [`App::run`].
//!
//! [`EditorSession`]: crate::editor::EditorSession
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::{App, ViewerConfig};
