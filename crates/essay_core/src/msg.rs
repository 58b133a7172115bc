use std::path::PathBuf;

use serde_json::Value;

use crate::{AnalysisReport, ProfileField, RemoteFailure, Section, SelectedFile};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited one profile input.
    FieldChanged { field: ProfileField, value: String },
    /// "Next Step" at step 1, "Generate Draft" at step 2.
    NextClicked,
    BackClicked,
    /// Leave the result screen; the profile is kept.
    RestartClicked,
    /// Start over with an empty profile.
    NewSessionRequested,
    /// Generation call settled. The payload is the undecoded response body.
    GenerationFinished(Result<Value, RemoteFailure>),
    /// User picked a CV file to parse.
    CvFileChosen(SelectedFile),
    CvParsed {
        filename: String,
        result: Result<String, RemoteFailure>,
    },
    ToggleEditClicked,
    SectionEdited { section: Section, value: String },
    CopyAllClicked,
    /// The "copied" acknowledgement for copy `token` has been shown long enough.
    CopyAckElapsed { token: u64 },
    ExportClicked,
    /// Export `ticket` settled; on success carries where the document was saved.
    ExportFinished {
        ticket: u64,
        result: Result<PathBuf, RemoteFailure>,
    },
    /// Admin picked exemplar essays for bulk ingestion.
    ExemplarFilesChosen(Vec<SelectedFile>),
    /// Every file of the batch has settled.
    ExemplarsIngested { attempted: usize, succeeded: usize },
    StatsRequested,
    StatsLoaded(Result<u64, RemoteFailure>),
    AnalyzeClicked,
    AnalysisFinished(Result<AnalysisReport, RemoteFailure>),
    DismissNotice,
}
