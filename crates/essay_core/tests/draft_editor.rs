use std::path::PathBuf;
use std::sync::Once;

use essay_core::{
    decode_draft, update, AppState, Draft, EditorContent, Effect, Msg, NoticeLevel,
    ProfileField, RemoteFailure, RemoteFailureKind, Section, COPY_ACK_DURATION,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(essay_logging::initialize_for_tests);
}

fn at_step3(response: Value) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::FieldChanged {
            field: ProfileField::TargetCourse,
            value: "Physics".to_string(),
        },
    );
    let (state, _) = update(state, Msg::NextClicked);
    let (state, _) = update(state, Msg::NextClicked);
    let (state, _) = update(state, Msg::GenerationFinished(Ok(response)));
    assert_eq!(state.stage().step_number(), 3);
    state
}

fn abc() -> Value {
    json!({"q1_motivation": "A", "q2_academics": "B", "q3_activities": "C"})
}

fn current_draft(state: &AppState) -> Draft {
    state
        .stage()
        .editor()
        .and_then(|editor| editor.draft())
        .cloned()
        .expect("structured draft")
}

#[test]
fn serialized_and_structured_drafts_decode_identically() {
    let structured = abc();
    let serialized =
        Value::String(r#"{"q1_motivation":"x","q2_academics":"y","q3_activities":"z"}"#.into());

    assert_eq!(decode_draft(&serialized), Ok(Draft::new("x", "y", "z")));
    assert_eq!(decode_draft(&structured), Ok(Draft::new("A", "B", "C")));
    assert_eq!(
        decode_draft(&serialized),
        decode_draft(&json!({"q1_motivation":"x","q2_academics":"y","q3_activities":"z"}))
    );
}

#[test]
fn malformed_inputs_fail_with_error() {
    for input in [
        json!("just some prose"),
        json!("{not json"),
        json!("{\"q1_motivation\": \"only one\"}"),
        json!(["q1_motivation", "q2_academics"]),
        json!(42),
        Value::Null,
        json!({"q1_motivation": "A", "q2_academics": 7, "q3_activities": "C"}),
    ] {
        let err = decode_draft(&input).expect_err("should be malformed");
        assert!(err.to_string().starts_with("malformed draft"), "{err}");
    }
}

#[test]
fn malformed_generation_result_renders_raw_fallback() {
    init_logging();
    let state = at_step3(json!("The model replied in prose."));

    let editor = state.stage().editor().expect("editor present");
    assert!(editor.draft().is_none());
    match editor.content() {
        EditorContent::RawFallback { raw, .. } => assert_eq!(raw, "The model replied in prose."),
        other => panic!("expected fallback, got {other:?}"),
    }
    let view = state.view().editor.expect("editor view");
    assert!(view.draft.is_none());
    let (raw, error) = view.raw_fallback.expect("fallback view");
    assert_eq!(raw, "The model replied in prose.");
    assert!(error.contains("malformed draft"));
}

#[test]
fn toggle_edit_flips_mode_without_touching_text() {
    init_logging();
    let state = at_step3(abc());
    let (state, effects) = update(state, Msg::ToggleEditClicked);

    assert!(effects.is_empty());
    assert!(state.stage().editor().unwrap().is_editing());
    assert_eq!(current_draft(&state), Draft::new("A", "B", "C"));

    let (state, _) = update(state, Msg::ToggleEditClicked);
    assert!(!state.stage().editor().unwrap().is_editing());
}

#[test]
fn section_edits_apply_even_outside_edit_mode() {
    init_logging();
    let state = at_step3(abc());
    let (state, _) = update(
        state,
        Msg::SectionEdited {
            section: Section::Academics,
            value: "B2".to_string(),
        },
    );

    assert_eq!(current_draft(&state), Draft::new("A", "B2", "C"));
}

#[test]
fn copy_all_joins_sections_with_blank_lines() {
    init_logging();
    let state = at_step3(abc());
    let (state, effects) = update(state, Msg::CopyAllClicked);

    assert_eq!(
        effects,
        vec![
            Effect::CopyToClipboard {
                text: "A\n\nB\n\nC".to_string()
            },
            Effect::ScheduleCopyAckReset {
                token: 1,
                after: COPY_ACK_DURATION,
            },
        ]
    );
    assert!(state.view().editor.unwrap().copied);
}

#[test]
fn only_latest_copy_ack_expires() {
    init_logging();
    let state = at_step3(abc());
    let (state, _) = update(state, Msg::CopyAllClicked);
    let (state, _) = update(state, Msg::CopyAllClicked);

    let (state, _) = update(state, Msg::CopyAckElapsed { token: 1 });
    assert!(state.stage().editor().unwrap().is_copied());

    let (state, _) = update(state, Msg::CopyAckElapsed { token: 2 });
    assert!(!state.stage().editor().unwrap().is_copied());
}

#[test]
fn copy_uses_edited_text() {
    init_logging();
    let state = at_step3(abc());
    let (state, _) = update(
        state,
        Msg::SectionEdited {
            section: Section::Activities,
            value: "C'".to_string(),
        },
    );
    let (_state, effects) = update(state, Msg::CopyAllClicked);
    assert_eq!(
        effects.first(),
        Some(&Effect::CopyToClipboard {
            text: "A\n\nB\n\nC'".to_string()
        })
    );
}

#[test]
fn export_sends_current_sections_once() {
    init_logging();
    let state = at_step3(abc());
    let (state, _) = update(
        state,
        Msg::SectionEdited {
            section: Section::Motivation,
            value: "A edited".to_string(),
        },
    );

    let (state, effects) = update(state, Msg::ExportClicked);
    assert_eq!(
        effects,
        vec![Effect::ExportDocument {
            ticket: 1,
            draft: Draft::new("A edited", "B", "C")
        }]
    );
    assert!(state.view().editor.unwrap().exporting);

    let (state, effects) = update(state, Msg::ExportClicked);
    assert!(effects.is_empty());

    let path = PathBuf::from("out/My_Personal_Statement.docx");
    let (state, _) = update(
        state,
        Msg::ExportFinished {
            ticket: 1,
            result: Ok(path),
        },
    );
    let view = state.view();
    assert!(!view.editor.as_ref().unwrap().exporting);
    assert_eq!(view.notice.unwrap().level, NoticeLevel::Info);
}

#[test]
fn export_failures_show_generic_notices() {
    init_logging();
    let state = at_step3(abc());
    let (state, _) = update(state, Msg::ExportClicked);
    let rejected = RemoteFailure::new(RemoteFailureKind::Rejected(500), "500")
        .with_detail("docx exploded");
    let (state, _) = update(
        state,
        Msg::ExportFinished {
            ticket: 1,
            result: Err(rejected),
        },
    );

    assert_eq!(state.notice().unwrap().text, "Failed to create Word doc");
    assert!(!state.stage().editor().unwrap().export_task().is_busy());

    let (state, _) = update(state, Msg::ExportClicked);
    let offline = RemoteFailure::new(RemoteFailureKind::Transport, "offline");
    let (state, _) = update(
        state,
        Msg::ExportFinished {
            ticket: 2,
            result: Err(offline),
        },
    );
    assert_eq!(state.notice().unwrap().text, "Error downloading file");
}

#[test]
fn export_is_unavailable_for_raw_fallback() {
    init_logging();
    let state = at_step3(json!(17));
    let (_state, effects) = update(state, Msg::ExportClicked);
    assert!(effects.is_empty());
}

#[test]
fn late_export_result_does_not_release_a_newer_draft() {
    init_logging();
    let state = at_step3(abc());
    let (state, effects) = update(state, Msg::ExportClicked);
    assert_eq!(effects.len(), 1);

    let (state, _) = update(state, Msg::RestartClicked);
    let (state, _) = update(state, Msg::NextClicked);
    let (state, _) = update(state, Msg::NextClicked);
    let (state, _) = update(state, Msg::GenerationFinished(Ok(abc())));
    let (mut state, effects) = update(state, Msg::ExportClicked);
    assert_eq!(
        effects,
        vec![Effect::ExportDocument {
            ticket: 2,
            draft: Draft::new("A", "B", "C")
        }]
    );
    state.consume_dirty();

    let (mut state, effects) = update(
        state,
        Msg::ExportFinished {
            ticket: 1,
            result: Ok(PathBuf::from("old.docx")),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert!(state.notice().is_none());
    assert!(state.stage().editor().unwrap().export_task().is_busy());

    let (state, effects) = update(state, Msg::ExportClicked);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::ExportFinished {
            ticket: 2,
            result: Ok(PathBuf::from("new.docx")),
        },
    );
    assert!(!state.stage().editor().unwrap().export_task().is_busy());
    assert_eq!(state.notice().unwrap().text, "Saved new.docx");
}
