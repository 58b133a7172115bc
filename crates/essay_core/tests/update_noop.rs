use essay_core::{update, AppState, Msg, Section};

#[test]
fn messages_for_other_screens_change_nothing() {
    let state = AppState::new();
    for msg in [
        Msg::BackClicked,
        Msg::RestartClicked,
        Msg::ToggleEditClicked,
        Msg::CopyAllClicked,
        Msg::CopyAckElapsed { token: 1 },
        Msg::ExportClicked,
        Msg::SectionEdited {
            section: Section::Academics,
            value: "ignored".to_string(),
        },
        Msg::DismissNotice,
    ] {
        let (mut next, effects) = update(state.clone(), msg.clone());
        assert!(effects.is_empty(), "{msg:?} emitted effects");
        assert!(!next.consume_dirty(), "{msg:?} marked the screen dirty");
        assert_eq!(next.view(), state.view(), "{msg:?} changed the view");
    }
}
