//! Template documents produced by the external compiler
//!
//! A template document is a JSON file listing the template's scripts. Each
//! script carries the compiler's verdict: either the program states recorded
//! while evaluating it together with the bindings the compiler resolved, or
//! the compilation errors.
//!
//! ```json
//! {
//!   "name": "Single signature",
//!   "scripts": [{
//!     "internalId": "01J...", "id": "lock", "name": "Lock", "type": "locking",
//!     "script": "OP_DUP OP_HASH160 <$(<owner.public_key> OP_HASH160)> ...",
//!     "compilation": {
//!       "success": true,
//!       "states": [{ "ip": 0, "stack": [], "executionStack": [] }],
//!       "bindings": [{ "identifier": "owner.public_key",
//!                      "scope": { "entity": "owner" }, "value": "02..." }]
//!     }
//!   }]
//! }
//! ```
//!
//! All byte values are hex strings. [`cursor`] tracks a position inside one
//! evaluation for step-by-step viewing.

pub mod cursor;

pub use cursor::EvaluationCursor;

use crate::editor::script::ScriptType;
use crate::errors::LoadError;
use crate::evaluation::Binding;
use crate::vm::ProgramState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub scripts: Vec<TemplateScript>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateScript {
    pub internal_id: String,
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub script_type: ScriptType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_internal_id: Option<String>,
    /// Locking scripts only: wrapped in pay-to-script-hash
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub p2sh: bool,
    /// Source text, as written in the editor
    #[serde(default)]
    pub script: String,
    /// Absent until the compiler has seen the script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compilation: Option<Compilation>,
}

/// Result of compiling and evaluating one script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCompilation", into = "RawCompilation")]
pub enum Compilation {
    Success {
        states: Vec<ProgramState>,
        bindings: Vec<Binding>,
    },
    Failure {
        errors: Vec<CompilationError>,
    },
}

impl Compilation {
    pub fn is_success(&self) -> bool {
        matches!(self, Compilation::Success { .. })
    }

    pub fn states(&self) -> Option<&[ProgramState]> {
        match self {
            Compilation::Success { states, .. } => Some(states),
            Compilation::Failure { .. } => None,
        }
    }

    pub fn bindings(&self) -> &[Binding] {
        match self {
            Compilation::Success { bindings, .. } => bindings,
            Compilation::Failure { .. } => &[],
        }
    }

    pub fn errors(&self) -> &[CompilationError] {
        match self {
            Compilation::Success { .. } => &[],
            Compilation::Failure { errors } => errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationError {
    #[serde(alias = "error")]
    pub message: String,
    /// 1-based source line, when the compiler reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// Wire shape of [`Compilation`]: a `success` flag plus whichever lists apply
#[derive(Serialize, Deserialize)]
struct RawCompilation {
    success: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    states: Vec<ProgramState>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    bindings: Vec<Binding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<CompilationError>,
}

impl From<RawCompilation> for Compilation {
    fn from(raw: RawCompilation) -> Self {
        if raw.success {
            Compilation::Success {
                states: raw.states,
                bindings: raw.bindings,
            }
        } else {
            Compilation::Failure { errors: raw.errors }
        }
    }
}

impl From<Compilation> for RawCompilation {
    fn from(compilation: Compilation) -> Self {
        match compilation {
            Compilation::Success { states, bindings } => RawCompilation {
                success: true,
                states,
                bindings,
                errors: Vec::new(),
            },
            Compilation::Failure { errors } => RawCompilation {
                success: false,
                states: Vec::new(),
                bindings: Vec::new(),
                errors,
            },
        }
    }
}

impl TemplateDocument {
    pub fn new(name: impl Into<String>) -> Self {
        TemplateDocument {
            name: name.into(),
            description: None,
            scripts: Vec::new(),
        }
    }

    /// Read and validate a document from disk
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            scripts = document.scripts.len(),
            "loaded template document"
        );
        Ok(document)
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let document: TemplateDocument = serde_json::from_str(json)?;
        document.validate()?;
        Ok(document)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), LoadError> {
        let json = self.to_json()?;
        fs::write(path, json + "\n").map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "saved template document");
        Ok(())
    }

    /// Every parent reference must name an existing script of a compatible type
    pub fn validate(&self) -> Result<(), LoadError> {
        for script in &self.scripts {
            let Some(parent_id) = &script.parent_internal_id else {
                continue;
            };
            let parent = self
                .script_by_internal_id(parent_id)
                .ok_or_else(|| LoadError::DanglingParent {
                    script: script.id.clone(),
                    parent: parent_id.clone(),
                })?;
            if !script.script_type.accepts_parent(parent.script_type) {
                return Err(LoadError::InvalidParent {
                    script: script.id.clone(),
                    parent_type: parent.script_type.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn script_by_id(&self, id: &str) -> Option<&TemplateScript> {
        self.scripts.iter().find(|script| script.id == id)
    }

    pub fn script_by_internal_id(&self, internal_id: &str) -> Option<&TemplateScript> {
        self.scripts
            .iter()
            .find(|script| script.internal_id == internal_id)
    }

    /// Scripts whose parent is `internal_id`, sorted by name
    pub fn children_of(&self, internal_id: &str) -> Vec<&TemplateScript> {
        let mut children: Vec<&TemplateScript> = self
            .scripts
            .iter()
            .filter(|script| script.parent_internal_id.as_deref() == Some(internal_id))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    pub fn parent_of(&self, script: &TemplateScript) -> Option<&TemplateScript> {
        script
            .parent_internal_id
            .as_deref()
            .and_then(|id| self.script_by_internal_id(id))
    }
}
