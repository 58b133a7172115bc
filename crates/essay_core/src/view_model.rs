use crate::{AnalysisOutcome, Draft, NoticeLevel, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepView {
    #[default]
    Profile,
    Motivation,
    Generating,
    Preview,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub step: StepView,
    pub step_number: u8,
    pub progress_percent: u8,
    pub can_go_next: bool,
    pub can_go_back: bool,
    pub next_label: String,
    pub profile: Profile,
    pub motivation_chars: usize,
    pub cv_uploading: bool,
    pub cv_button_label: String,
    pub generating_caption: Option<String>,
    pub editor: Option<EditorView>,
    pub notice: Option<NoticeView>,
    pub admin: AdminView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    pub draft: Option<Draft>,
    /// Raw response text and decode error, when the draft could not be decoded.
    pub raw_fallback: Option<(String, String)>,
    pub is_editing: bool,
    pub copied: bool,
    pub exporting: bool,
    pub export_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminView {
    pub essay_count_label: String,
    pub ingesting: bool,
    pub ingest_status: String,
    pub analyzing: bool,
    pub analysis: Option<AnalysisOutcome>,
}
