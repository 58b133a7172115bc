//! Essay wizard core: pure state machine and view-model helpers.
mod admin;
mod busy;
mod draft;
mod editor;
mod effect;
mod msg;
mod profile;
mod state;
mod update;
mod view_model;

pub use admin::{AdminState, AnalysisOutcome, AnalysisReport, StructureBlueprint};
pub use busy::BusyTask;
pub use draft::{decode_draft, Draft, MalformedDraftError, Section};
pub use editor::{DraftEditor, EditorContent};
pub use effect::{Effect, COPY_ACK_DURATION};
pub use msg::Msg;
pub use profile::{Profile, ProfileField, UnknownFieldError};
pub use state::{
    AppState, Notice, NoticeLevel, RemoteFailure, RemoteFailureKind, SelectedFile, WizardStage,
};
pub use update::update;
pub use view_model::{AdminView, AppViewModel, EditorView, NoticeView, StepView};
