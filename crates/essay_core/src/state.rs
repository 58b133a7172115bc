use std::path::{Path, PathBuf};

use crate::view_model::{AdminView, AppViewModel, EditorView, NoticeView, StepView};
use crate::{AdminState, BusyTask, DraftEditor, EditorContent, Profile};

/// Where the wizard is. Generation in flight and the result screen are
/// distinct variants, so "generating at step 3" or "step 3 without a draft"
/// cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WizardStage {
    #[default]
    Step1,
    Step2,
    Generating,
    Step3(DraftEditor),
}

impl WizardStage {
    pub fn step_number(&self) -> u8 {
        match self {
            WizardStage::Step1 => 1,
            WizardStage::Step2 | WizardStage::Generating => 2,
            WizardStage::Step3(_) => 3,
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, WizardStage::Generating)
    }

    pub fn editor(&self) -> Option<&DraftEditor> {
        match self {
            WizardStage::Step3(editor) => Some(editor),
            _ => None,
        }
    }

    pub(crate) fn editor_mut(&mut self) -> Option<&mut DraftEditor> {
        match self {
            WizardStage::Step3(editor) => Some(editor),
            _ => None,
        }
    }
}

/// A file picked by the user, identified by its display name and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { name, path }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFailureKind {
    /// No response was received.
    Transport,
    /// The service answered with a non-success status.
    Rejected(u16),
    /// The response could not be decoded into the expected shape.
    Malformed,
    /// Reading the upload or saving the result on this machine failed.
    Local,
    /// The call ended without reporting a result.
    Aborted,
}

/// A failed remote call as seen by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub kind: RemoteFailureKind,
    pub message: String,
    /// Error detail taken from the response body, when there was one.
    pub detail: Option<String>,
}

impl RemoteFailure {
    pub fn new(kind: RemoteFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing alert, replaced by the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    profile: Profile,
    stage: WizardStage,
    cv_upload: BusyTask,
    notice: Option<Notice>,
    admin: AdminState,
    copy_token: u64,
    export_ticket: u64,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn stage(&self) -> &WizardStage {
        &self.stage
    }

    pub fn cv_upload(&self) -> &BusyTask {
        &self.cv_upload
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn admin(&self) -> &AdminState {
        &self.admin
    }

    pub fn view(&self) -> AppViewModel {
        let step = self.stage.step_number();
        let next_label = if step == 2 { "Generate Draft" } else { "Next Step" };
        let cv_button_label = if self.cv_upload.is_busy() {
            "Parsing..."
        } else if self.profile.has_cv() {
            "Replace File"
        } else {
            "Choose File"
        };

        AppViewModel {
            step: match &self.stage {
                WizardStage::Step1 => StepView::Profile,
                WizardStage::Step2 => StepView::Motivation,
                WizardStage::Generating => StepView::Generating,
                WizardStage::Step3(_) => StepView::Preview,
            },
            step_number: step,
            progress_percent: (u32::from(step) * 100 / 2).min(100) as u8,
            can_go_next: self.can_go_next(),
            can_go_back: matches!(self.stage, WizardStage::Step2),
            next_label: next_label.to_string(),
            profile: self.profile.clone(),
            motivation_chars: self.profile.motivation_chars(),
            cv_uploading: self.cv_upload.is_busy(),
            cv_button_label: cv_button_label.to_string(),
            generating_caption: self.stage.is_generating().then(|| {
                format!(
                    "Analyzing {} admissions patterns and structuring your narrative.",
                    self.profile.target_course
                )
            }),
            editor: self.stage.editor().map(editor_view),
            notice: self.notice.as_ref().map(|notice| NoticeView {
                level: notice.level,
                text: notice.text.clone(),
            }),
            admin: admin_view(&self.admin),
        }
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn can_go_next(&self) -> bool {
        match self.stage {
            WizardStage::Step1 => self.profile.has_target_course(),
            WizardStage::Step2 => true,
            WizardStage::Generating | WizardStage::Step3(_) => false,
        }
    }

    pub(crate) fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    pub(crate) fn stage_mut(&mut self) -> &mut WizardStage {
        &mut self.stage
    }

    pub(crate) fn set_stage(&mut self, stage: WizardStage) {
        self.stage = stage;
    }

    pub(crate) fn cv_upload_mut(&mut self) -> &mut BusyTask {
        &mut self.cv_upload
    }

    pub(crate) fn admin_mut(&mut self) -> &mut AdminState {
        &mut self.admin
    }

    pub(crate) fn raise(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            text: text.into(),
        });
    }

    pub(crate) fn clear_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    pub(crate) fn next_copy_token(&mut self) -> u64 {
        self.copy_token += 1;
        self.copy_token
    }

    pub(crate) fn next_export_ticket(&mut self) -> u64 {
        self.export_ticket += 1;
        self.export_ticket
    }

    /// Back to a fresh wizard, keeping corpus state and the ticket counters.
    pub(crate) fn reset_session(&mut self) {
        self.profile = Profile::new();
        self.stage = WizardStage::Step1;
        self.cv_upload = BusyTask::new();
        self.notice = None;
    }
}

fn editor_view(editor: &DraftEditor) -> EditorView {
    let (draft, raw_fallback) = match editor.content() {
        EditorContent::Draft(draft) => (Some(draft.clone()), None),
        EditorContent::RawFallback { raw, error } => (None, Some((raw.clone(), error.to_string()))),
    };
    EditorView {
        draft,
        raw_fallback,
        is_editing: editor.is_editing(),
        copied: editor.is_copied(),
        exporting: editor.export_task().is_busy(),
        export_status: editor.export_task().status_message().to_string(),
    }
}

fn admin_view(admin: &AdminState) -> AdminView {
    AdminView {
        essay_count_label: admin
            .essay_count()
            .map(|count| count.to_string())
            .unwrap_or_else(|| "Loading...".to_string()),
        ingesting: admin.ingest().is_busy(),
        ingest_status: admin.ingest().status_message().to_string(),
        analyzing: admin.analysis_task().is_busy(),
        analysis: admin.analysis().cloned(),
    }
}
