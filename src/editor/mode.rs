//! Editor modes and pane identifiers

use std::fmt;

/// What the editor is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectEditorMode {
    /// The first view when the IDE loads
    Welcome,
    /// An isolated script and its tests
    IsolatedScriptEditor,
    /// An unlocking and locking script pair
    ScriptPairEditor,
    /// A script test: setup, tested script and check
    TestedScriptEditor,
    EntityEditor,
    TemplateSettingsEditor,
    /// Waiting for the VM and crypto dependencies, or nothing selected
    Loading,
    /// Importing a template from a remote URL
    Importing,
}

impl ProjectEditorMode {
    /// Modes that display script editor frames and evaluations
    pub fn is_script_mode(self) -> bool {
        matches!(
            self,
            ProjectEditorMode::IsolatedScriptEditor
                | ProjectEditorMode::ScriptPairEditor
                | ProjectEditorMode::TestedScriptEditor
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectEditorMode::Welcome => "welcome",
            ProjectEditorMode::IsolatedScriptEditor => "isolatedScriptEditor",
            ProjectEditorMode::ScriptPairEditor => "scriptPairEditor",
            ProjectEditorMode::TestedScriptEditor => "testedScriptEditor",
            ProjectEditorMode::EntityEditor => "entityEditor",
            ProjectEditorMode::TemplateSettingsEditor => "templateSettingsEditor",
            ProjectEditorMode::Loading => "loading",
            ProjectEditorMode::Importing => "importing",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ProjectEditorMode::Welcome => "Welcome",
            ProjectEditorMode::IsolatedScriptEditor => "Isolated Script",
            ProjectEditorMode::ScriptPairEditor => "Script Pair",
            ProjectEditorMode::TestedScriptEditor => "Script Test",
            ProjectEditorMode::EntityEditor => "Entity",
            ProjectEditorMode::TemplateSettingsEditor => "Template Settings",
            ProjectEditorMode::Loading => "Loading",
            ProjectEditorMode::Importing => "Importing",
        }
    }
}

impl fmt::Display for ProjectEditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Script editor column, by position
///
/// `Zero` exists in every script mode, `One` for unlocking and test editors,
/// `Two` only when a test check script is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptEditorPane {
    Zero,
    One,
    Two,
}

impl ScriptEditorPane {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ScriptEditorPane::Zero),
            1 => Some(ScriptEditorPane::One),
            2 => Some(ScriptEditorPane::Two),
            _ => None,
        }
    }

    /// Column heading, in evaluation order
    pub fn label(self) -> &'static str {
        match self {
            ScriptEditorPane::Zero => "1st",
            ScriptEditorPane::One => "2nd",
            ScriptEditorPane::Two => "3rd",
        }
    }

    /// The evaluation viewer shown beside this editor
    pub fn viewer(self) -> ScriptEvaluationViewerPane {
        match self {
            ScriptEditorPane::Zero => ScriptEvaluationViewerPane::Zero,
            ScriptEditorPane::One => ScriptEvaluationViewerPane::One,
            ScriptEditorPane::Two => ScriptEvaluationViewerPane::Two,
        }
    }
}

/// Evaluation viewer column, paired one-to-one with [`ScriptEditorPane`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptEvaluationViewerPane {
    Zero,
    One,
    Two,
}

impl ScriptEvaluationViewerPane {
    pub fn title(self) -> &'static str {
        match self {
            ScriptEvaluationViewerPane::Zero => "Evaluation 1",
            ScriptEvaluationViewerPane::One => "Evaluation 2",
            ScriptEvaluationViewerPane::Two => "Evaluation 3",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_modes() {
        assert!(ProjectEditorMode::ScriptPairEditor.is_script_mode());
        assert!(ProjectEditorMode::TestedScriptEditor.is_script_mode());
        assert!(!ProjectEditorMode::Welcome.is_script_mode());
        assert!(!ProjectEditorMode::EntityEditor.is_script_mode());
        assert_eq!(ProjectEditorMode::Importing.to_string(), "importing");
    }

    #[test]
    fn test_panes_by_index() {
        assert_eq!(ScriptEditorPane::from_index(1), Some(ScriptEditorPane::One));
        assert_eq!(ScriptEditorPane::from_index(3), None);
        assert_eq!(ScriptEditorPane::Two.viewer(), ScriptEvaluationViewerPane::Two);
        assert_eq!(ScriptEditorPane::Two.label(), "3rd");
        assert_eq!(ScriptEditorPane::One.viewer().title(), "Evaluation 2");
    }
}
