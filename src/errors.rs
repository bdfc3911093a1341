//! Error types for loading templates, navigating evaluations and adding scripts
//!
//! - [`LoadError`]: reading or interpreting a template document
//! - [`CursorError`]: stepping past either end of an evaluation
//! - [`ScriptError`]: rejected "add script" requests
//!
//! None of these describe a failed *evaluation*. A script that fails in the VM
//! is ordinary data (an error marker on its final program state) and is shown
//! to the user rather than propagated.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a template document
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document could not be read or written
    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not match the template schema
    #[error("Invalid template document: {0}")]
    Json(#[from] serde_json::Error),

    /// A script names a parent that does not exist in the template
    #[error("Script '{script}' refers to missing parent '{parent}'")]
    DanglingParent { script: String, parent: String },

    /// A script has a parent of the wrong type
    #[error("Script '{script}' cannot have a parent of type {parent_type}")]
    InvalidParent { script: String, parent_type: String },

    /// The selected script is not part of the template
    #[error("No script with id '{0}' in template")]
    UnknownScript(String),
}

/// Errors raised when moving through an evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("Already at the first line")]
    AtStart,

    #[error("Already at the final line")]
    AtEnd,

    /// There are no lines to move through
    #[error("Nothing to step through (no evaluation lines)")]
    Empty,
}

/// Reasons an "add script" request is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("A script name is required")]
    EmptyName,

    #[error("A script ID is required")]
    EmptyId,

    /// The ID does not start with a letter or `_`, or contains other characters
    #[error("Invalid script ID '{0}'")]
    InvalidId(String),

    #[error("The ID '{0}' is already in use.")]
    NonUniqueId(String),

    /// Unlocking scripts and script tests need something to attach to
    #[error("No {0} scripts are available to attach this script to")]
    NoParentAvailable(&'static str),

    #[error("'{0}' is not a valid parent for this script")]
    InvalidParent(String),

    /// Only the four creatable types may be requested
    #[error("Scripts of type {0} cannot be created directly")]
    NotCreatable(&'static str),
}
