//! Deriving the editor state for a selected script
//!
//! Selecting a script decides which scripts are evaluated together and in
//! which order:
//!
//! | selected      | mode                   | frames                              |
//! |---------------|------------------------|-------------------------------------|
//! | isolated      | `IsolatedScriptEditor` | `[isolated]`                        |
//! | tested        | `IsolatedScriptEditor` | `[tested]`                          |
//! | unlocking     | `ScriptPairEditor`     | `[unlocking, parent]`               |
//! | locking       | `ScriptPairEditor`     | `[first unlocking child, locking]`  |
//! | test-setup    | `TestedScriptEditor`   | `[setup, tested parent, check]`     |
//! | test-check    | `TestedScriptEditor`   | as for its setup                    |
//!
//! A locking script without unlocking scripts is shown alone, and a test
//! without a check script shows only setup and tested script.

use super::frame::{FrameOutcome, ScriptEditorFrame};
use super::mode::ProjectEditorMode;
use super::script::ScriptType;
use crate::errors::LoadError;
use crate::evaluation::{HighlightKind, StackItemIdentifier};
use crate::trace::{TemplateDocument, TemplateScript};

#[derive(Debug, Clone, PartialEq)]
pub enum ComputedEditorState {
    Welcome,
    TemplateSettings,
    Entity,
    Loading,
    Importing,
    Script(EditorStateScriptMode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorStateScriptMode {
    /// One of the three script modes
    pub editor_mode: ProjectEditorMode,
    pub frames: Vec<ScriptEditorFrame>,
    /// IDs of the frames in evaluation order
    pub evaluation_trace: Vec<String>,
    pub is_p2sh: bool,
    /// `None` if no frame compiled, so the previous identifier stays in use
    pub identify_stack_items: Option<StackItemIdentifier>,
}

impl ComputedEditorState {
    pub fn editor_mode(&self) -> ProjectEditorMode {
        match self {
            ComputedEditorState::Welcome => ProjectEditorMode::Welcome,
            ComputedEditorState::TemplateSettings => ProjectEditorMode::TemplateSettingsEditor,
            ComputedEditorState::Entity => ProjectEditorMode::EntityEditor,
            ComputedEditorState::Loading => ProjectEditorMode::Loading,
            ComputedEditorState::Importing => ProjectEditorMode::Importing,
            ComputedEditorState::Script(script_mode) => script_mode.editor_mode,
        }
    }

    pub fn script_mode(&self) -> Option<&EditorStateScriptMode> {
        match self {
            ComputedEditorState::Script(script_mode) => Some(script_mode),
            _ => None,
        }
    }

    pub fn frames(&self) -> &[ScriptEditorFrame] {
        self.script_mode()
            .map(|script_mode| script_mode.frames.as_slice())
            .unwrap_or(&[])
    }
}

impl EditorStateScriptMode {
    /// False if any frame's evaluation ended in a VM failure.
    ///
    /// Dirty stacks and scripts that did not compile are reported but do not
    /// count as failures.
    pub fn passed(&self) -> bool {
        !self
            .frames
            .iter()
            .any(|frame| frame.outcome() == FrameOutcome::Finished(HighlightKind::Fail))
    }
}

/// Compute the editor state for `selection` (a script ID).
///
/// With no selection, or an empty template, the editor shows the welcome view.
pub fn compute_editor_state(
    document: &TemplateDocument,
    selection: Option<&str>,
) -> Result<ComputedEditorState, LoadError> {
    let Some(selected_id) = selection else {
        return Ok(ComputedEditorState::Welcome);
    };
    let selected = document
        .script_by_id(selected_id)
        .ok_or_else(|| LoadError::UnknownScript(selected_id.to_string()))?;

    let (editor_mode, scripts) = frame_scripts(document, selected)?;

    let is_p2sh = editor_mode == ProjectEditorMode::ScriptPairEditor
        && scripts
            .iter()
            .any(|script| script.script_type == ScriptType::Locking && script.p2sh);

    let frames: Vec<ScriptEditorFrame> = scripts
        .iter()
        .copied()
        .map(ScriptEditorFrame::from_script)
        .collect();

    let compiled: Vec<&ScriptEditorFrame> = frames
        .iter()
        .filter(|frame| frame.compilation.is_success())
        .collect();
    let identify_stack_items = (!compiled.is_empty()).then(|| {
        StackItemIdentifier::new(compiled.iter().flat_map(|frame| frame.compilation.bindings()))
    });

    tracing::info!(
        script = selected_id,
        mode = %editor_mode,
        frames = frames.len(),
        compiled = compiled.len(),
        "computed editor state"
    );

    Ok(ComputedEditorState::Script(EditorStateScriptMode {
        editor_mode,
        evaluation_trace: frames.iter().map(|frame| frame.id.clone()).collect(),
        frames,
        is_p2sh,
        identify_stack_items,
    }))
}

fn frame_scripts<'a>(
    document: &'a TemplateDocument,
    selected: &'a TemplateScript,
) -> Result<(ProjectEditorMode, Vec<&'a TemplateScript>), LoadError> {
    let parent = |script: &'a TemplateScript| -> Result<&'a TemplateScript, LoadError> {
        document
            .parent_of(script)
            .ok_or_else(|| LoadError::DanglingParent {
                script: script.id.clone(),
                parent: script.parent_internal_id.clone().unwrap_or_default(),
            })
    };

    Ok(match selected.script_type {
        ScriptType::Isolated | ScriptType::Tested => {
            (ProjectEditorMode::IsolatedScriptEditor, vec![selected])
        }
        ScriptType::Unlocking => (
            ProjectEditorMode::ScriptPairEditor,
            vec![selected, parent(selected)?],
        ),
        ScriptType::Locking => {
            let unlocking = document
                .children_of(&selected.internal_id)
                .into_iter()
                .find(|child| child.script_type == ScriptType::Unlocking);
            let scripts = match unlocking {
                Some(unlocking) => vec![unlocking, selected],
                None => vec![selected],
            };
            (ProjectEditorMode::ScriptPairEditor, scripts)
        }
        ScriptType::TestSetup => (
            ProjectEditorMode::TestedScriptEditor,
            test_scripts(document, selected, parent(selected)?),
        ),
        ScriptType::TestCheck => {
            let setup = parent(selected)?;
            (
                ProjectEditorMode::TestedScriptEditor,
                test_scripts(document, setup, parent(setup)?),
            )
        }
    })
}

fn test_scripts<'a>(
    document: &'a TemplateDocument,
    setup: &'a TemplateScript,
    tested: &'a TemplateScript,
) -> Vec<&'a TemplateScript> {
    let mut scripts = vec![setup, tested];
    if let Some(check) = document
        .children_of(&setup.internal_id)
        .into_iter()
        .find(|child| child.script_type == ScriptType::TestCheck)
    {
        scripts.push(check);
    }
    scripts
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "name": "Pairs and tests",
        "scripts": [
            { "internalId": "lock", "id": "lock", "name": "Lock", "type": "locking", "p2sh": true,
              "compilation": { "success": true, "states": [{ "stack": ["01"] }],
                               "bindings": [{ "identifier": "lock", "scope": "script", "value": "aa" }] } },
            { "internalId": "b-unlock", "id": "b_unlock", "name": "B Unlock", "type": "unlocking",
              "parentInternalId": "lock",
              "compilation": { "success": false, "errors": [{ "message": "nope" }] } },
            { "internalId": "a-unlock", "id": "a_unlock", "name": "A Unlock", "type": "unlocking",
              "parentInternalId": "lock",
              "compilation": { "success": false, "errors": [{ "message": "nope" }] } },
            { "internalId": "lonely", "id": "lonely", "name": "Lonely", "type": "locking" },
            { "internalId": "adder", "id": "adder", "name": "Adder", "type": "tested",
              "compilation": { "success": true, "states": [] } },
            { "internalId": "setup", "id": "setup", "name": "Setup", "type": "test-setup",
              "parentInternalId": "adder",
              "compilation": { "success": true, "states": [] } },
            { "internalId": "check", "id": "check", "name": "Check", "type": "test-check",
              "parentInternalId": "setup",
              "compilation": { "success": true, "states": [] } }
        ]
    }"#;

    fn trace_of(state: &ComputedEditorState) -> Vec<&str> {
        state
            .script_mode()
            .unwrap()
            .evaluation_trace
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn test_no_selection_is_welcome() {
        let document = TemplateDocument::from_json(DOCUMENT).unwrap();
        let state = compute_editor_state(&document, None).unwrap();
        assert_eq!(state, ComputedEditorState::Welcome);
        assert!(state.frames().is_empty());
    }

    #[test]
    fn test_unknown_selection() {
        let document = TemplateDocument::from_json(DOCUMENT).unwrap();
        assert!(matches!(
            compute_editor_state(&document, Some("missing")),
            Err(LoadError::UnknownScript(_))
        ));
    }

    #[test]
    fn test_unlocking_pairs_with_parent() {
        let document = TemplateDocument::from_json(DOCUMENT).unwrap();
        let state = compute_editor_state(&document, Some("b_unlock")).unwrap();

        assert_eq!(state.editor_mode(), ProjectEditorMode::ScriptPairEditor);
        assert_eq!(trace_of(&state), vec!["b_unlock", "lock"]);
        let script_mode = state.script_mode().unwrap();
        assert!(script_mode.is_p2sh);
        assert!(script_mode.frames[0].evaluation.is_none());
        assert_eq!(
            script_mode.identify_stack_items.as_ref().unwrap().identify(&[0xaa]),
            Some("lock")
        );
    }

    #[test]
    fn test_locking_uses_first_unlocking_by_name() {
        let document = TemplateDocument::from_json(DOCUMENT).unwrap();
        let state = compute_editor_state(&document, Some("lock")).unwrap();
        assert_eq!(trace_of(&state), vec!["a_unlock", "lock"]);

        let alone = compute_editor_state(&document, Some("lonely")).unwrap();
        assert_eq!(trace_of(&alone), vec!["lonely"]);
        assert!(!alone.script_mode().unwrap().is_p2sh);
        assert!(alone.script_mode().unwrap().identify_stack_items.is_none());
    }

    #[test]
    fn test_tests_show_setup_tested_check() {
        let document = TemplateDocument::from_json(DOCUMENT).unwrap();
        for selection in ["setup", "check"] {
            let state = compute_editor_state(&document, Some(selection)).unwrap();
            assert_eq!(state.editor_mode(), ProjectEditorMode::TestedScriptEditor);
            assert_eq!(trace_of(&state), vec!["setup", "adder", "check"]);
        }

        let tested = compute_editor_state(&document, Some("adder")).unwrap();
        assert_eq!(tested.editor_mode(), ProjectEditorMode::IsolatedScriptEditor);
        assert_eq!(trace_of(&tested), vec!["adder"]);
    }
}
