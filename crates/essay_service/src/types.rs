use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// No response was received.
    Network,
    /// The service answered with a non-success status.
    HttpStatus(u16),
    /// The response body did not have the expected shape.
    MalformedResponse,
    /// Reading an upload or writing the export on this machine failed.
    LocalIo,
    /// The task ended without reporting a result.
    Aborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::LocalIo => write!(f, "local io error"),
            FailureKind::Aborted => write!(f, "aborted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
    /// `detail` (or `error`) field of a JSON error body, when present.
    pub detail: Option<String>,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    pub fn aborted() -> Self {
        Self::new(FailureKind::Aborted, "task ended without a result")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParsedDocument {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CorpusStats {
    pub essay_count: u64,
}

/// Section weights as written by the analysis model. Each percentage may arrive
/// as a number or a numeric string; anything else decodes as `None`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Blueprint {
    #[serde(rename = "Q1_percentage", default, deserialize_with = "lenient_percentage")]
    pub q1_percentage: Option<f64>,
    #[serde(rename = "Q2_percentage", default, deserialize_with = "lenient_percentage")]
    pub q2_percentage: Option<f64>,
    #[serde(rename = "Q3_percentage", default, deserialize_with = "lenient_percentage")]
    pub q3_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CorpusAnalysis {
    /// `None` when the body has no blueprint object.
    #[serde(
        rename = "Structure_Blueprint",
        default,
        deserialize_with = "lenient_blueprint"
    )]
    pub structure_blueprint: Option<Blueprint>,
    #[serde(default)]
    pub error: Option<String>,
}

fn lenient_percentage<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().trim_end_matches('%').trim_end().parse().ok(),
        _ => None,
    })
}

fn lenient_blueprint<'de, D>(deserializer: D) -> Result<Option<Blueprint>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// Section texts sent to the document export endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSections {
    pub q1: String,
    pub q2: String,
    pub q3: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
}

/// Completion events, exactly one per command sent to the service handle.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEvent {
    CvParsed {
        filename: String,
        result: Result<String, ServiceError>,
    },
    GenerationFinished(Result<serde_json::Value, ServiceError>),
    ExportFinished {
        ticket: u64,
        result: Result<PathBuf, ServiceError>,
    },
    ExemplarsIngested(BatchSummary),
    StatsLoaded(Result<u64, ServiceError>),
    AnalysisFinished(Result<CorpusAnalysis, ServiceError>),
}
