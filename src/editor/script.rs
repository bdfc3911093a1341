//! Script types and the "add script" workflow
//!
//! Mirrors what the IDE's "Add Script" dialog enforces: which types can be
//! created directly, which need a parent, how an ID is derived from a name,
//! and when a request is rejected.

use crate::errors::ScriptError;
use crate::trace::TemplateScript;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScriptType {
    Locking,
    Unlocking,
    Isolated,
    TestSetup,
    TestCheck,
    /// An isolated script with at least one test attached
    Tested,
}

impl ScriptType {
    /// Types offered when adding a script
    pub const CREATABLE: [ScriptType; 4] = [
        ScriptType::Locking,
        ScriptType::Unlocking,
        ScriptType::Isolated,
        ScriptType::TestSetup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScriptType::Locking => "locking",
            ScriptType::Unlocking => "unlocking",
            ScriptType::Isolated => "isolated",
            ScriptType::TestSetup => "test-setup",
            ScriptType::TestCheck => "test-check",
            ScriptType::Tested => "tested",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScriptType::Locking => "Locking Script",
            ScriptType::Unlocking => "Unlocking Script",
            ScriptType::Isolated => "Isolated Script",
            ScriptType::TestSetup => "Script Test",
            ScriptType::TestCheck => "Script Test Check",
            ScriptType::Tested => "Tested Script",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ScriptType::Locking => {
                "Locking scripts hold funds. A locking script is the \u{201c}challenge\u{201d} which must be unlocked to spend a transaction output. An \u{201c}Address\u{201d} is simply an abstraction for a specific locking script."
            }
            ScriptType::Unlocking => {
                "An unlocking script spends from a locking script. To create a transaction, the spender must provide a valid unlocking script for each input being spent. (A locking script can be unlocked by multiple unlocking scripts.)"
            }
            ScriptType::Isolated => {
                "An isolated script is useful for constructions like checksums or re-usable utility scripts (which can be used inside other scripts). Isolated scripts can have script tests, e.g. utility scripts can be tested to ensure they perform a series of operations properly."
            }
            ScriptType::TestSetup => {
                "A script test is applied to an isolated script. Each script test has a \u{201c}setup\u{201d} phase which is evaluated before the tested script, and a \u{201c}check\u{201d} phase which is evaluated after. The test passes if the \u{201c}check\u{201d} script leaves a single Script Number 1 on the stack."
            }
            ScriptType::Tested => {
                "Tested scripts are created by assigning a test-setup script to an isolated script."
            }
            ScriptType::TestCheck => {
                "Check scripts are created together with their test-setup script."
            }
        }
    }

    /// Unlocking scripts and script tests must be attached to another script
    pub fn has_parent(self) -> bool {
        matches!(self, ScriptType::Unlocking | ScriptType::TestSetup)
    }

    /// Label of the parent selector for types that have one
    pub fn parent_label(self) -> Option<&'static str> {
        match self {
            ScriptType::Unlocking => Some("Unlocks"),
            ScriptType::TestSetup => Some("Tested Script"),
            _ => None,
        }
    }

    /// Whether a script of type `parent` may be the parent of this type
    pub fn accepts_parent(self, parent: ScriptType) -> bool {
        match self {
            ScriptType::Unlocking => {
                matches!(parent, ScriptType::Locking | ScriptType::Isolated)
            }
            ScriptType::TestSetup => {
                matches!(parent, ScriptType::Tested | ScriptType::Isolated)
            }
            ScriptType::TestCheck => parent == ScriptType::TestSetup,
            _ => false,
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "locking" => Ok(ScriptType::Locking),
            "unlocking" => Ok(ScriptType::Unlocking),
            "isolated" => Ok(ScriptType::Isolated),
            "test-setup" => Ok(ScriptType::TestSetup),
            "test-check" => Ok(ScriptType::TestCheck),
            "tested" => Ok(ScriptType::Tested),
            other => Err(format!(
                "unknown script type '{}' (expected locking, unlocking, isolated or test-setup)",
                other
            )),
        }
    }
}

/// Derive a script ID from a human-readable name.
///
/// Lower-cases, turns whitespace into `_`, drops anything outside
/// `[a-z0-9_.-]`, and prefixes `_` when the result would start with a digit,
/// `.` or `-`.
pub fn to_conventional_id(name: &str) -> String {
    let mut id: String = name
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else {
                let c = c.to_ascii_lowercase();
                (c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-'))
                    .then_some(c)
            }
        })
        .collect();

    if id.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '-') {
        id.insert(0, '_');
    }
    id
}

/// Must begin with a-z, A-Z or `_`; the rest may add digits, `.` and `-`
pub fn is_valid_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => chars
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')),
        _ => false,
    }
}

/// Scripts a new script of type `kind` could be attached to, sorted by name
pub fn available_parents(scripts: &[TemplateScript], kind: ScriptType) -> Vec<&TemplateScript> {
    let mut parents: Vec<&TemplateScript> = scripts
        .iter()
        .filter(|script| {
            script.script_type == ScriptType::Isolated
                || if kind == ScriptType::Unlocking {
                    script.script_type == ScriptType::Locking
                } else {
                    script.script_type == ScriptType::Tested
                }
        })
        .collect();
    parents.sort_by(|a, b| a.name.cmp(&b.name));
    parents
}

/// A request to add a script, as entered by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScriptRequest {
    pub script_type: ScriptType,
    pub name: String,
    /// Derived from `name` when absent
    pub id: Option<String>,
    /// ID or internal ID of the parent; defaults to the first candidate
    pub parent: Option<String>,
}

/// A validated script ready to be added to a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScript {
    pub internal_id: String,
    pub id: String,
    pub name: String,
    pub script_type: ScriptType,
    pub parent_internal_id: Option<String>,
}

impl NewScriptRequest {
    pub fn new(script_type: ScriptType, name: impl Into<String>) -> Self {
        NewScriptRequest {
            script_type,
            name: name.into(),
            id: None,
            parent: None,
        }
    }

    /// What the "Add Script" dialog shows for this type: its description and,
    /// when a parent is needed, the scripts it can be attached to
    pub fn help(&self, scripts: &[TemplateScript]) -> String {
        let kind = self.script_type;
        let mut help = format!("{}: {}", kind.label(), kind.description());
        if let Some(parent_label) = kind.parent_label() {
            let candidates: Vec<String> = available_parents(scripts, kind)
                .iter()
                .map(|script| format!("{} ({})", script.name, script.id))
                .collect();
            let candidates = if candidates.is_empty() {
                "(none available)".to_string()
            } else {
                candidates.join(", ")
            };
            help.push_str(&format!("\n{}: {}", parent_label, candidates));
        }
        help
    }

    pub fn validate(&self, scripts: &[TemplateScript]) -> Result<NewScript, ScriptError> {
        if !ScriptType::CREATABLE.contains(&self.script_type) {
            return Err(ScriptError::NotCreatable(self.script_type.as_str()));
        }

        let name = self.name.trim();
        if name.is_empty() {
            return Err(ScriptError::EmptyName);
        }

        let id = match &self.id {
            Some(id) => to_conventional_id(id),
            None => to_conventional_id(name),
        };
        if id.is_empty() {
            return Err(ScriptError::EmptyId);
        }
        if !is_valid_id(&id) {
            return Err(ScriptError::InvalidId(id));
        }

        let parent_internal_id = if self.script_type.has_parent() {
            let candidates = available_parents(scripts, self.script_type);
            let parent = match &self.parent {
                Some(wanted) => candidates
                    .iter()
                    .find(|script| &script.id == wanted || &script.internal_id == wanted)
                    .ok_or_else(|| ScriptError::InvalidParent(wanted.clone()))?,
                None => candidates.first().ok_or(ScriptError::NoParentAvailable(
                    if self.script_type == ScriptType::Unlocking {
                        "locking or isolated"
                    } else {
                        "isolated or tested"
                    },
                ))?,
            };
            Some(parent.internal_id.clone())
        } else {
            None
        };

        if scripts.iter().any(|script| script.id == id) {
            return Err(ScriptError::NonUniqueId(id));
        }

        Ok(NewScript {
            internal_id: Ulid::new().to_string(),
            id,
            name: name.to_string(),
            script_type: self.script_type,
            parent_internal_id,
        })
    }
}

impl From<NewScript> for TemplateScript {
    fn from(new: NewScript) -> Self {
        TemplateScript {
            internal_id: new.internal_id,
            id: new.id,
            name: new.name,
            script_type: new.script_type,
            parent_internal_id: new.parent_internal_id,
            p2sh: false,
            script: String::new(),
            compilation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(internal_id: &str, id: &str, name: &str, script_type: ScriptType) -> TemplateScript {
        TemplateScript {
            internal_id: internal_id.to_string(),
            id: id.to_string(),
            name: name.to_string(),
            script_type,
            parent_internal_id: None,
            p2sh: false,
            script: String::new(),
            compilation: None,
        }
    }

    #[test]
    fn test_conventional_id() {
        assert_eq!(to_conventional_id("Spend with Key"), "spend_with_key");
        assert_eq!(to_conventional_id("  2-of-3 Vault!"), "_2-of-3_vault");
        assert_eq!(to_conventional_id("a.b-c_d"), "a.b-c_d");
        assert_eq!(to_conventional_id("!!!"), "");
        assert!(is_valid_id(&to_conventional_id("9 lives")));
    }

    #[test]
    fn test_id_validity() {
        assert!(is_valid_id("p2pkh_lock"));
        assert!(is_valid_id("_x.y-z"));
        assert!(!is_valid_id("1abc"));
        assert!(!is_valid_id("a b"));
        assert!(!is_valid_id(""));
    }

    #[test]
    fn test_parent_candidates_sorted() {
        let scripts = vec![
            script("1", "zz_lock", "Zed Lock", ScriptType::Locking),
            script("2", "util", "Checksum", ScriptType::Isolated),
            script("3", "tested", "Adder", ScriptType::Tested),
            script("4", "unlock", "Unlock", ScriptType::Unlocking),
        ];

        let for_unlocking: Vec<&str> = available_parents(&scripts, ScriptType::Unlocking)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(for_unlocking, vec!["util", "zz_lock"]);

        let for_tests: Vec<&str> = available_parents(&scripts, ScriptType::TestSetup)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(for_tests, vec!["tested", "util"]);
    }

    #[test]
    fn test_validate_defaults() {
        let scripts = vec![script("lock-1", "lock", "Lock", ScriptType::Locking)];
        let new = NewScriptRequest::new(ScriptType::Unlocking, "Spend")
            .validate(&scripts)
            .unwrap();

        assert_eq!(new.id, "spend");
        assert_eq!(new.parent_internal_id.as_deref(), Some("lock-1"));
        assert_eq!(new.internal_id.len(), 26);

        let isolated = NewScriptRequest::new(ScriptType::Isolated, "Util")
            .validate(&[])
            .unwrap();
        assert!(isolated.parent_internal_id.is_none());
    }

    #[test]
    fn test_validate_rejections() {
        let scripts = vec![script("lock-1", "lock", "Lock", ScriptType::Locking)];

        assert_eq!(
            NewScriptRequest::new(ScriptType::Locking, "  ").validate(&scripts),
            Err(ScriptError::EmptyName)
        );
        assert_eq!(
            NewScriptRequest::new(ScriptType::Locking, "Lock").validate(&scripts),
            Err(ScriptError::NonUniqueId("lock".to_string()))
        );
        assert!(matches!(
            NewScriptRequest::new(ScriptType::TestSetup, "Test").validate(&scripts),
            Err(ScriptError::NoParentAvailable(_))
        ));
        assert_eq!(
            NewScriptRequest::new(ScriptType::Tested, "Tested").validate(&scripts),
            Err(ScriptError::NotCreatable("tested"))
        );

        let mut request = NewScriptRequest::new(ScriptType::Unlocking, "Spend");
        request.parent = Some("missing".to_string());
        assert_eq!(
            request.validate(&scripts),
            Err(ScriptError::InvalidParent("missing".to_string()))
        );
    }

    #[test]
    fn test_help_lists_parent_candidates() {
        let scripts = vec![
            script("l", "lock", "Lock", ScriptType::Locking),
            script("u", "util", "Checksum", ScriptType::Isolated),
        ];

        let help = NewScriptRequest::new(ScriptType::Unlocking, "Spend").help(&scripts);
        let mut lines = help.lines();
        assert!(lines
            .next()
            .is_some_and(|line| line.starts_with("Unlocking Script: An unlocking script spends")));
        assert_eq!(lines.next(), Some("Unlocks: Checksum (util), Lock (lock)"));

        let help = NewScriptRequest::new(ScriptType::TestSetup, "Test").help(&[]);
        assert!(help.ends_with("\nTested Script: (none available)"));

        let help = NewScriptRequest::new(ScriptType::Isolated, "Util").help(&scripts);
        assert_eq!(help.lines().count(), 1);
        assert!(help.starts_with("Isolated Script: "));
    }

    #[test]
    fn test_script_type_strings() {
        for kind in ScriptType::CREATABLE {
            assert_eq!(kind.as_str().parse::<ScriptType>(), Ok(kind));
        }
        assert!("p2sh".parse::<ScriptType>().is_err());
        assert!(ScriptType::Unlocking.has_parent());
        assert!(!ScriptType::Locking.has_parent());
        assert_eq!(ScriptType::TestSetup.parent_label(), Some("Tested Script"));
    }
}
