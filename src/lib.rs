//! # Introduction
//!
//! scriptlens shows how a wallet template's scripts evaluate, one VM program
//! state at a time. An external compiler writes a template document holding,
//! for every script, either the recorded program states and resolved
//! bindings or the compilation errors. scriptlens annotates those states and
//! lets you step through them in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Template JSON → TemplateDocument → ComputedEditorState → Evaluation lines → TUI
//! ```
//!
//! 1. [`trace`]: the template document format and an [`trace::EvaluationCursor`]
//!    for stepping.
//! 2. [`vm`]: stack items, opcodes and [`vm::ProgramState`], as recorded by the
//!    evaluator.
//! 3. [`evaluation`]: spacers, outcome highlights and stack item
//!    identification for each state.
//! 4. [`editor`]: which scripts are evaluated together for a selection, and
//!    the "add script" workflow.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! Errors live in [`errors`].

pub mod editor;
pub mod errors;
pub mod evaluation;
pub mod trace;
pub mod ui;
pub mod vm;
