use std::path::Path;

use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;

use crate::{FailureKind, ServiceError};

/// Endpoints of the remote generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ParseDocument,
    IngestExemplar,
    Stats,
    AnalyzeCorpus,
    GenerateEssay,
    ExportDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Json,
    Binary,
    /// Only the status matters.
    StatusOnly,
}

impl Operation {
    pub fn path(self) -> &'static str {
        match self {
            Operation::ParseDocument => "/parse-cv",
            Operation::IngestExemplar => "/ingest",
            Operation::Stats => "/stats",
            Operation::AnalyzeCorpus => "/analyze",
            Operation::GenerateEssay => "/generate",
            Operation::ExportDocument => "/download-docx",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Operation::Stats => Method::GET,
            _ => Method::POST,
        }
    }

    pub fn response_kind(self) -> ResponseKind {
        match self {
            Operation::ExportDocument => ResponseKind::Binary,
            Operation::IngestExemplar => ResponseKind::StatusOnly,
            _ => ResponseKind::Json,
        }
    }
}

/// A file to be sent as the multipart `file` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, naming the upload after the file.
    pub async fn read(path: &Path) -> Result<Self, ServiceError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            ServiceError::new(FailureKind::LocalIo, format!("{}: {err}", path.display()))
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { name, bytes })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    Json(Value),
    File(UploadFile),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Json(Value),
    Binary(Bytes),
    Empty,
}

impl Reply {
    pub(crate) fn into_json(self) -> Result<Value, ServiceError> {
        match self {
            Reply::Json(value) => Ok(value),
            _ => Err(ServiceError::new(
                FailureKind::MalformedResponse,
                "expected a json body",
            )),
        }
    }

    pub(crate) fn into_binary(self) -> Result<Bytes, ServiceError> {
        match self {
            Reply::Binary(bytes) => Ok(bytes),
            _ => Err(ServiceError::new(
                FailureKind::MalformedResponse,
                "expected a binary body",
            )),
        }
    }
}
