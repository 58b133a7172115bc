use std::time::Duration;

use crate::{Draft, Profile, SelectedFile};

/// How long the "copied" acknowledgement stays visible.
pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ParseCv { file: SelectedFile },
    GenerateEssay { profile: Profile },
    CopyToClipboard { text: String },
    /// Deliver `Msg::CopyAckElapsed { token }` after `after`.
    ScheduleCopyAckReset { token: u64, after: Duration },
    /// Export `draft`; the completion carries `ticket` back.
    ExportDocument { ticket: u64, draft: Draft },
    IngestExemplars { files: Vec<SelectedFile> },
    FetchStats,
    AnalyzeCorpus,
}
