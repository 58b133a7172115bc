use std::sync::Once;

use essay_core::{
    update, AppState, Draft, Effect, Msg, NoticeLevel, Profile, ProfileField, RemoteFailure,
    RemoteFailureKind, StepView, WizardStage,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(essay_logging::initialize_for_tests);
}

fn set(state: AppState, field: ProfileField, value: &str) -> AppState {
    update(
        state,
        Msg::FieldChanged {
            field,
            value: value.to_string(),
        },
    )
    .0
}

fn at_step2(course: &str) -> AppState {
    let state = set(AppState::new(), ProfileField::TargetCourse, course);
    let (state, effects) = update(state, Msg::NextClicked);
    assert!(effects.is_empty());
    assert_eq!(state.stage(), &WizardStage::Step2);
    state
}

fn generating(course: &str) -> AppState {
    let (state, _) = update(at_step2(course), Msg::NextClicked);
    assert!(state.stage().is_generating());
    state
}

#[test]
fn set_changes_exactly_one_field() {
    init_logging();
    for field in ProfileField::ALL {
        let mut before = Profile::new();
        for (i, other) in ProfileField::ALL.into_iter().enumerate() {
            before.set(other, format!("value {i}"));
        }
        let mut after = before.clone();
        after.set(field, "changed");

        for other in ProfileField::ALL {
            if other == field {
                assert_eq!(after.get(other), "changed");
            } else {
                assert_eq!(after.get(other), before.get(other), "{other} was touched");
            }
        }
    }
}

#[test]
fn field_changes_are_accepted_in_every_stage() {
    init_logging();
    let state = generating("Law");
    let state = set(state, ProfileField::Motivation, "late edit");

    assert!(state.stage().is_generating());
    assert_eq!(state.profile().motivation, "late edit");
}

#[test]
fn next_is_refused_without_target_course() {
    init_logging();
    for course in ["", "   ", "\t\n"] {
        let mut state = set(AppState::new(), ProfileField::TargetCourse, course);
        assert!(state.consume_dirty());
        assert!(!state.view().can_go_next);

        let (mut next, effects) = update(state, Msg::NextClicked);
        assert_eq!(next.stage(), &WizardStage::Step1);
        assert!(effects.is_empty());
        assert!(!next.consume_dirty());
    }
}

#[test]
fn next_with_course_moves_to_step2() {
    init_logging();
    let state = at_step2("Computer Science");
    let view = state.view();

    assert_eq!(view.step, StepView::Motivation);
    assert_eq!(view.step_number, 2);
    assert_eq!(view.progress_percent, 100);
    assert_eq!(view.next_label, "Generate Draft");
    assert!(view.can_go_back);
}

#[test]
fn back_from_step2_needs_no_validation() {
    init_logging();
    let state = at_step2("History");
    let state = set(state, ProfileField::TargetCourse, "");
    let (state, effects) = update(state, Msg::BackClicked);

    assert_eq!(state.stage(), &WizardStage::Step1);
    assert!(effects.is_empty());
    assert!(!state.view().can_go_back);
}

#[test]
fn generate_snapshots_the_full_profile() {
    init_logging();
    let state = at_step2("Economics");
    let state = set(state, ProfileField::Motivation, "It all started when...");
    let expected = state.profile().clone();

    let (state, effects) = update(state, Msg::NextClicked);

    assert!(state.stage().is_generating());
    assert_eq!(effects, vec![Effect::GenerateEssay { profile: expected }]);
    let view = state.view();
    assert_eq!(view.step, StepView::Generating);
    assert_eq!(
        view.generating_caption.as_deref(),
        Some("Analyzing Economics admissions patterns and structuring your narrative.")
    );
}

#[test]
fn next_while_generating_is_noop() {
    init_logging();
    let state = generating("Law");
    let (state, effects) = update(state, Msg::NextClicked);

    assert!(state.stage().is_generating());
    assert!(effects.is_empty());
}

#[test]
fn successful_generation_enters_step3_with_exact_sections() {
    init_logging();
    let state = generating("Law");
    let response = json!({"q1_motivation": "A", "q2_academics": "B", "q3_activities": "C"});

    let (state, effects) = update(state, Msg::GenerationFinished(Ok(response)));

    assert!(effects.is_empty());
    assert_eq!(state.stage().step_number(), 3);
    assert!(!state.stage().is_generating());
    let editor = state.stage().editor().expect("draft present at step 3");
    assert_eq!(editor.draft(), Some(&Draft::new("A", "B", "C")));
    assert!(!editor.is_editing());
}

#[test]
fn failed_generation_rolls_back_to_step2() {
    init_logging();
    let state = generating("Law");
    let failure = RemoteFailure::new(RemoteFailureKind::Rejected(400), "400 Bad Request")
        .with_detail("Brain is empty. Please upload essays first.");

    let (state, effects) = update(state, Msg::GenerationFinished(Err(failure)));

    assert!(effects.is_empty());
    assert_eq!(state.stage(), &WizardStage::Step2);
    assert!(state.stage().editor().is_none());
    assert!(!state.stage().is_generating());
    let notice = state.notice().expect("error surfaced");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(
        notice.text,
        "Error generating essay: Brain is empty. Please upload essays first."
    );
}

#[test]
fn failed_generation_without_detail_uses_fallback_text() {
    init_logging();
    let rejected = RemoteFailure::new(RemoteFailureKind::Rejected(500), "500");
    let (state, _) = update(generating("Law"), Msg::GenerationFinished(Err(rejected)));
    assert_eq!(
        state.notice().unwrap().text,
        "Error generating essay: Generation failed"
    );

    let offline = RemoteFailure::new(RemoteFailureKind::Transport, "connection refused");
    let (state, _) = update(generating("Law"), Msg::GenerationFinished(Err(offline)));
    assert_eq!(
        state.notice().unwrap().text,
        "Error generating essay: connection refused"
    );
}

#[test]
fn stale_generation_result_is_ignored() {
    init_logging();
    let state = at_step2("Law");
    let response = json!({"q1_motivation": "A", "q2_academics": "B", "q3_activities": "C"});
    let (state, effects) = update(state, Msg::GenerationFinished(Ok(response)));

    assert_eq!(state.stage(), &WizardStage::Step2);
    assert!(effects.is_empty());
}

#[test]
fn restart_clears_draft_but_keeps_profile() {
    init_logging();
    let state = generating("Medicine");
    let state = set(state, ProfileField::WorkExperience, "Hospital volunteer");
    let response = json!({"q1_motivation": "A", "q2_academics": "B", "q3_activities": "C"});
    let (state, _) = update(state, Msg::GenerationFinished(Ok(response)));
    let profile_before = state.profile().clone();

    let (state, effects) = update(state, Msg::RestartClicked);

    assert!(effects.is_empty());
    assert_eq!(state.stage(), &WizardStage::Step1);
    assert!(state.stage().editor().is_none());
    assert_eq!(state.profile(), &profile_before);
    assert_eq!(state.profile().target_course, "Medicine");
}

#[test]
fn restart_outside_step3_is_noop() {
    init_logging();
    let state = at_step2("Law");
    let (state, _) = update(state, Msg::RestartClicked);
    assert_eq!(state.stage(), &WizardStage::Step2);
}

#[test]
fn new_session_clears_profile() {
    init_logging();
    let state = at_step2("Law");
    let (state, _) = update(state, Msg::NewSessionRequested);

    assert_eq!(state.stage(), &WizardStage::Step1);
    assert_eq!(state.profile(), &Profile::new());
}

#[test]
fn new_session_is_refused_while_generating() {
    init_logging();
    let state = generating("Law");
    let (state, _) = update(state, Msg::NewSessionRequested);

    assert!(state.stage().is_generating());
    assert_eq!(state.profile().target_course, "Law");
}

#[test]
fn dismiss_notice_clears_it() {
    init_logging();
    let failure = RemoteFailure::new(RemoteFailureKind::Transport, "offline");
    let (state, _) = update(generating("Law"), Msg::GenerationFinished(Err(failure)));
    assert!(state.notice().is_some());

    let (mut state, _) = update(state, Msg::DismissNotice);
    assert!(state.notice().is_none());
    assert!(state.consume_dirty());
}
