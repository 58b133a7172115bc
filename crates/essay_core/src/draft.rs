use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three-section generated essay.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Draft {
    pub q1_motivation: String,
    pub q2_academics: String,
    pub q3_activities: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Motivation,
    Academics,
    Activities,
}

impl Section {
    /// Fixed output order for copying and export.
    pub const ALL: [Section; 3] = [Section::Motivation, Section::Academics, Section::Activities];

    pub fn heading(self) -> &'static str {
        match self {
            Section::Motivation => "1. Why do you want to study this course or subject?",
            Section::Academics => "2. How have your qualifications and studies prepared you?",
            Section::Activities => "3. What else have you done to prepare for this course?",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Section::Motivation => "q1",
            Section::Academics => "q2",
            Section::Activities => "q3",
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "q1" | "q1_motivation" | "motivation" => Ok(Section::Motivation),
            "q2" | "q2_academics" | "academics" => Ok(Section::Academics),
            "q3" | "q3_activities" | "activities" => Ok(Section::Activities),
            other => Err(format!("unknown section: {other}")),
        }
    }
}

impl Draft {
    pub fn new(
        q1_motivation: impl Into<String>,
        q2_academics: impl Into<String>,
        q3_activities: impl Into<String>,
    ) -> Self {
        Self {
            q1_motivation: q1_motivation.into(),
            q2_academics: q2_academics.into(),
            q3_activities: q3_activities.into(),
        }
    }

    pub fn section(&self, section: Section) -> &str {
        match section {
            Section::Motivation => &self.q1_motivation,
            Section::Academics => &self.q2_academics,
            Section::Activities => &self.q3_activities,
        }
    }

    pub fn set_section(&mut self, section: Section, value: impl Into<String>) {
        let slot = match section {
            Section::Motivation => &mut self.q1_motivation,
            Section::Academics => &mut self.q2_academics,
            Section::Activities => &mut self.q3_activities,
        };
        *slot = value.into();
    }

    /// All sections joined by a blank line, q1 then q2 then q3.
    pub fn copy_text(&self) -> String {
        Section::ALL
            .iter()
            .map(|section| self.section(*section))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed draft: {reason}")]
pub struct MalformedDraftError {
    pub reason: String,
}

impl MalformedDraftError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Normalize a generation response into a [`Draft`].
///
/// Accepts either a JSON object or a string holding a serialized object.
pub fn decode_draft(value: &Value) -> Result<Draft, MalformedDraftError> {
    match value {
        Value::Object(_) => draft_from_object(value),
        Value::String(raw) if raw.trim_start().starts_with('{') => {
            let parsed: Value = serde_json::from_str(raw)
                .map_err(|err| MalformedDraftError::new(format!("invalid json: {err}")))?;
            if !parsed.is_object() {
                return Err(MalformedDraftError::new("serialized value is not an object"));
            }
            draft_from_object(&parsed)
        }
        Value::String(_) => Err(MalformedDraftError::new("string is not a serialized object")),
        other => Err(MalformedDraftError::new(format!(
            "expected an object, got {}",
            json_kind(other)
        ))),
    }
}

fn draft_from_object(value: &Value) -> Result<Draft, MalformedDraftError> {
    let mut draft = Draft::default();
    for (section, key) in [
        (Section::Motivation, "q1_motivation"),
        (Section::Academics, "q2_academics"),
        (Section::Activities, "q3_activities"),
    ] {
        let text = value
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| MalformedDraftError::new(format!("missing text section {key}")))?;
        draft.set_section(section, text);
    }
    Ok(draft)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
