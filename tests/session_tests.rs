// Integration tests driving an editor session over the demo template

use scriptlens::editor::{
    EditorSession, FrameOutcome, NewScriptRequest, ProjectEditorMode, ScriptType,
};
use scriptlens::errors::{LoadError, ScriptError};
use scriptlens::evaluation::HighlightKind;
use scriptlens::trace::{Compilation, CompilationError, TemplateDocument, TemplateScript};
use std::path::Path;

const DEMO: &str = "demos/single_signature.json";
const PUBLIC_KEY: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

fn open(selection: &str) -> EditorSession {
    EditorSession::open(Path::new(DEMO), Some(selection.to_string()))
        .expect("Failed to open demo template")
}

fn frame_ids(session: &EditorSession) -> Vec<&str> {
    session
        .state()
        .frames()
        .iter()
        .map(|frame| frame.id.as_str())
        .collect()
}

fn public_key() -> Vec<u8> {
    hex::decode(PUBLIC_KEY).unwrap()
}

#[test]
fn test_default_selection_is_first_script() {
    let session = EditorSession::open(Path::new(DEMO), None).unwrap();
    assert_eq!(session.selection(), Some("lock"));
    assert_eq!(
        session.state().editor_mode(),
        ProjectEditorMode::ScriptPairEditor
    );
    // "Unlock" sorts before "Unlock (draft)"
    assert_eq!(frame_ids(&session), vec!["unlock", "lock"]);
}

#[test]
fn test_pair_evaluation_succeeds() {
    let session = open("unlock");
    let frames = session.state().frames();
    assert_eq!(frames[0].outcome(), FrameOutcome::Finished(HighlightKind::DirtyStack));
    assert_eq!(frames[1].outcome(), FrameOutcome::Finished(HighlightKind::Success));

    let lock = frames[1].evaluation.as_ref().unwrap();
    assert_eq!(lock.len(), 6);
    assert_eq!(lock[1].state.instruction.as_ref().unwrap().to_string(), "OP_DUP");
}

#[test]
fn test_identifier_names_stack_items() {
    let session = open("lock");
    let identifier = session.identifier().unwrap();
    assert_eq!(identifier.identify(&public_key()), Some("owner.public_key"));
    assert_eq!(
        identifier.identify(&hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap()),
        Some("owner_hash")
    );
    assert_eq!(identifier.identify(&[0x01]), None);
}

#[test]
fn test_failed_compile_has_no_evaluation() {
    let session = open("unlock_draft");
    let frames = session.state().frames();
    assert_eq!(frame_ids(&session), vec!["unlock_draft", "lock"]);
    assert_eq!(frames[0].evaluation, None);
    assert_eq!(frames[0].compilation.errors()[0].line, Some(1));
    // The locking script still compiled, so identification is available
    assert!(session.identifier().is_some());
}

#[test]
fn test_conditional_branch_spacers() {
    let session = open("branch");
    assert_eq!(
        session.state().editor_mode(),
        ProjectEditorMode::IsolatedScriptEditor
    );

    let evaluation = session.state().frames()[0].evaluation.as_ref().unwrap();
    let skipped: Vec<bool> = evaluation
        .iter()
        .map(|line| !line.state.is_executing())
        .collect();
    assert_eq!(skipped, vec![false, false, false, false, true, true, false]);
    assert_eq!(
        session.state().frames()[0].outcome(),
        FrameOutcome::Finished(HighlightKind::DirtyStack)
    );
}

#[test]
fn test_failing_script_reports_error() {
    let session = open("always_fails");
    let frame = &session.state().frames()[0];
    assert_eq!(frame.outcome(), FrameOutcome::Finished(HighlightKind::Fail));
    assert_eq!(
        frame.final_error(),
        Some("Program called an OP_RETURN operation.")
    );
}

#[test]
fn test_script_test_frames() {
    for selection in ["adds_one_and_two", "adds_one_and_two_check"] {
        let session = open(selection);
        assert_eq!(
            session.state().editor_mode(),
            ProjectEditorMode::TestedScriptEditor
        );
        assert_eq!(
            frame_ids(&session),
            vec!["adds_one_and_two", "adder", "adds_one_and_two_check"]
        );
    }

    let session = open("adds_one_and_two_check");
    let check = &session.state().frames()[2];
    assert_eq!(check.outcome(), FrameOutcome::Finished(HighlightKind::Success));
}

#[test]
fn test_identifier_retained_when_compilation_breaks() {
    let mut session = open("unlock");
    assert!(session.identifier().is_some());

    // Mid-edit: the compiler now rejects both scripts in the pair
    let mut broken = session.document().clone();
    for script in &mut broken.scripts {
        if script.id == "unlock" || script.id == "lock" {
            script.compilation = Some(Compilation::Failure {
                errors: vec![CompilationError {
                    message: "Unexpected end of script".to_string(),
                    line: Some(1),
                }],
            });
        }
    }

    let summary = session.replace_document(broken).unwrap();
    assert_eq!(summary.frames, 2);
    assert_eq!(summary.compiled, 0);
    assert!(!summary.identifier_replaced);
    assert!(session.state().frames().iter().all(|f| f.evaluation.is_none()));

    let identifier = session.identifier().unwrap();
    assert_eq!(identifier.identify(&public_key()), Some("owner.public_key"));
}

#[test]
fn test_unknown_selection_keeps_session() {
    let mut session = open("branch");
    let result = session.select(Some("missing".to_string()));
    assert!(matches!(result, Err(LoadError::UnknownScript(id)) if id == "missing"));
    assert_eq!(session.selection(), Some("branch"));
    assert_eq!(frame_ids(&session), vec!["branch"]);
}

#[test]
fn test_missing_file() {
    let result = EditorSession::open(Path::new("demos/does_not_exist.json"), None);
    assert!(matches!(result, Err(LoadError::Io { .. })));
}

#[test]
fn test_add_unlocking_script() {
    let mut document = TemplateDocument::load(Path::new(DEMO)).unwrap();

    let request = NewScriptRequest {
        parent: Some("lock".to_string()),
        ..NewScriptRequest::new(ScriptType::Unlocking, "Spend with key")
    };
    let script = request.validate(&document.scripts).unwrap();
    assert_eq!(script.id, "spend_with_key");
    assert_eq!(
        script.parent_internal_id.as_deref(),
        Some("01HZX4V2K0LOCK00000000000A")
    );

    document.scripts.push(TemplateScript::from(script));
    let reloaded = TemplateDocument::from_json(&document.to_json().unwrap()).unwrap();
    assert_eq!(reloaded, document);

    let session = EditorSession::from_document(reloaded, Some("spend_with_key".to_string()))
        .unwrap();
    assert_eq!(frame_ids(&session), vec!["spend_with_key", "lock"]);
    assert_eq!(session.state().frames()[0].outcome(), FrameOutcome::NoEvaluation);
}

#[test]
fn test_add_script_rejections() {
    let document = TemplateDocument::load(Path::new(DEMO)).unwrap();

    let duplicate = NewScriptRequest::new(ScriptType::Locking, "Lock");
    assert_eq!(
        duplicate.validate(&document.scripts),
        Err(ScriptError::NonUniqueId("lock".to_string()))
    );

    let wrong_parent = NewScriptRequest {
        parent: Some("adder".to_string()),
        ..NewScriptRequest::new(ScriptType::Unlocking, "Spend")
    };
    assert_eq!(
        wrong_parent.validate(&document.scripts),
        Err(ScriptError::InvalidParent("adder".to_string()))
    );

    let tested = NewScriptRequest::new(ScriptType::Tested, "Tested");
    assert!(matches!(
        tested.validate(&document.scripts),
        Err(ScriptError::NotCreatable(_))
    ));
}

fn check_lines(session: &EditorSession) -> Vec<String> {
    session
        .state()
        .frames()
        .iter()
        .map(|frame| format!("{}: {}", frame.id, frame.summary()))
        .collect()
}

#[test]
fn test_check_fails_on_vm_error() {
    let session = open("always_fails");
    let script_mode = session.state().script_mode().unwrap();
    assert!(!script_mode.passed());
    assert_eq!(
        check_lines(&session),
        vec!["always_fails: fail: Program called an OP_RETURN operation."]
    );
}

#[test]
fn test_check_passes_dirty_stack() {
    let session = open("branch");
    assert!(session.state().script_mode().unwrap().passed());
    assert_eq!(check_lines(&session), vec!["branch: dirty stack"]);
}

#[test]
fn test_check_passes_compile_failure() {
    let session = open("unlock_draft");
    assert!(session.state().script_mode().unwrap().passed());
    assert_eq!(
        check_lines(&session),
        vec![
            "unlock_draft: no evaluation (Unknown identifier \"owner.sig\".)",
            "lock: success",
        ]
    );
}

#[test]
fn test_check_empty_evaluation() {
    let mut document = TemplateDocument::load(Path::new(DEMO)).unwrap();
    for script in &mut document.scripts {
        if script.id == "branch" {
            script.compilation = Some(Compilation::Success {
                states: vec![],
                bindings: vec![],
            });
        }
    }
    let session = EditorSession::from_document(document, Some("branch".to_string())).unwrap();
    assert_eq!(check_lines(&session), vec!["branch: empty evaluation"]);
    assert!(session.state().script_mode().unwrap().passed());
}

#[test]
fn test_reload_from_disk_retains_identifier() {
    let path = std::env::temp_dir().join(format!("scriptlens-reload-{}.json", ulid::Ulid::new()));
    let mut document = TemplateDocument::load(Path::new(DEMO)).unwrap();
    document.save(&path).expect("Failed to write template copy");

    let mut session = EditorSession::open(&path, Some("unlock".to_string())).unwrap();
    assert!(session.identifier().is_some());

    // The compiler rewrites the file with every script failing
    for script in &mut document.scripts {
        script.compilation = Some(Compilation::Failure {
            errors: vec![CompilationError {
                message: "Unexpected end of script".to_string(),
                line: None,
            }],
        });
    }
    document.save(&path).expect("Failed to rewrite template copy");

    let summary = session.reload();
    std::fs::remove_file(&path).ok();
    let summary = summary.unwrap();

    assert_eq!(summary.compiled, 0);
    assert!(!summary.identifier_replaced);
    assert!(session.state().frames().iter().all(|f| f.evaluation.is_none()));
    let identifier = session.identifier().unwrap();
    assert_eq!(identifier.identify(&public_key()), Some("owner.public_key"));
}
