use serde_json::Value;

use crate::{decode_draft, BusyTask, Draft, MalformedDraftError, Section};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorContent {
    Draft(Draft),
    /// The generation response could not be decoded; shown verbatim.
    RawFallback {
        raw: String,
        error: MalformedDraftError,
    },
}

/// Working copy of a generated draft and its view-level toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEditor {
    content: EditorContent,
    is_editing: bool,
    copy_ack: Option<u64>,
    export: BusyTask,
    pending_export: Option<u64>,
}

impl DraftEditor {
    pub fn new(draft: Draft) -> Self {
        Self::with_content(EditorContent::Draft(draft))
    }

    /// Build the editor from a raw generation response.
    pub fn from_response(value: &Value) -> Self {
        match decode_draft(value) {
            Ok(draft) => Self::new(draft),
            Err(error) => {
                let raw = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                Self::with_content(EditorContent::RawFallback { raw, error })
            }
        }
    }

    fn with_content(content: EditorContent) -> Self {
        Self {
            content,
            is_editing: false,
            copy_ack: None,
            export: BusyTask::new(),
            pending_export: None,
        }
    }

    pub fn content(&self) -> &EditorContent {
        &self.content
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.content {
            EditorContent::Draft(draft) => Some(draft),
            EditorContent::RawFallback { .. } => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn toggle_edit(&mut self) {
        self.is_editing = !self.is_editing;
    }

    /// Replace one section. Accepted whether or not edit mode is on.
    ///
    /// Returns `false` when there is no structured draft to edit.
    pub fn update_section(&mut self, section: Section, value: impl Into<String>) -> bool {
        match &mut self.content {
            EditorContent::Draft(draft) => {
                draft.set_section(section, value);
                true
            }
            EditorContent::RawFallback { .. } => false,
        }
    }

    pub fn copy_text(&self) -> String {
        match &self.content {
            EditorContent::Draft(draft) => draft.copy_text(),
            EditorContent::RawFallback { raw, .. } => raw.clone(),
        }
    }

    pub(crate) fn acknowledge_copy(&mut self, token: u64) {
        self.copy_ack = Some(token);
    }

    /// Clears the acknowledgement only if `token` is the most recent copy.
    pub(crate) fn expire_copy_ack(&mut self, token: u64) -> bool {
        if self.copy_ack == Some(token) {
            self.copy_ack = None;
            true
        } else {
            false
        }
    }

    pub fn is_copied(&self) -> bool {
        self.copy_ack.is_some()
    }

    pub fn export_task(&self) -> &BusyTask {
        &self.export
    }

    /// Start export `ticket`. Refused while another export is in flight.
    pub(crate) fn begin_export(&mut self, ticket: u64) -> bool {
        if !self.export.try_begin("Exporting...") {
            return false;
        }
        self.pending_export = Some(ticket);
        true
    }

    /// Settles the export only if `ticket` is the one in flight.
    pub(crate) fn finish_export(&mut self, ticket: u64, status: impl Into<String>) -> bool {
        if self.pending_export != Some(ticket) {
            return false;
        }
        self.pending_export = None;
        self.export.settle(status);
        true
    }
}
