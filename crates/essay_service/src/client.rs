use std::time::Duration;

use bytes::Bytes;
use essay_logging::{essay_debug, essay_warn};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::operation::{Operation, Payload, Reply, ResponseKind, UploadFile};
use crate::{
    CorpusAnalysis, CorpusStats, ExportSections, FailureKind, ParsedDocument, ServiceError,
};

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request deadline. `None` waits for as long as the service takes.
    pub request_timeout: Option<Duration>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// One request per call, no retries, no caching.
#[async_trait::async_trait]
pub trait RemoteService: Send + Sync {
    async fn call(&self, operation: Operation, payload: Payload) -> Result<Reply, ServiceError>;

    async fn parse_document(&self, file: UploadFile) -> Result<ParsedDocument, ServiceError> {
        let reply = self.call(Operation::ParseDocument, Payload::File(file)).await?;
        decode(reply.into_json()?)
    }

    async fn ingest_exemplar(&self, file: UploadFile) -> Result<(), ServiceError> {
        self.call(Operation::IngestExemplar, Payload::File(file))
            .await
            .map(|_| ())
    }

    async fn stats(&self) -> Result<CorpusStats, ServiceError> {
        let reply = self.call(Operation::Stats, Payload::None).await?;
        decode(reply.into_json()?)
    }

    async fn analyze_corpus(&self) -> Result<CorpusAnalysis, ServiceError> {
        let reply = self.call(Operation::AnalyzeCorpus, Payload::None).await?;
        decode(reply.into_json()?)
    }

    /// Returns the undecoded draft body; callers normalize it.
    async fn generate_essay(&self, profile: Value) -> Result<Value, ServiceError> {
        let body = json!({ "profile": profile });
        let reply = self.call(Operation::GenerateEssay, Payload::Json(body)).await?;
        reply.into_json()
    }

    async fn export_document(&self, sections: &ExportSections) -> Result<Bytes, ServiceError> {
        let body = serde_json::to_value(sections).map_err(|err| {
            ServiceError::new(FailureKind::MalformedResponse, err.to_string())
        })?;
        let reply = self.call(Operation::ExportDocument, Payload::Json(body)).await?;
        reply.into_binary()
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ServiceError> {
    serde_json::from_value(value)
        .map_err(|err| ServiceError::new(FailureKind::MalformedResponse, err.to_string()))
}

#[derive(Debug, Clone)]
pub struct ReqwestService {
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl ReqwestService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    fn endpoint(&self, operation: Operation) -> Result<reqwest::Url, ServiceError> {
        let raw = format!(
            "{}{}",
            self.settings.base_url.trim_end_matches('/'),
            operation.path()
        );
        reqwest::Url::parse(&raw)
            .map_err(|err| ServiceError::new(FailureKind::Network, format!("{raw}: {err}")))
    }
}

#[async_trait::async_trait]
impl RemoteService for ReqwestService {
    async fn call(&self, operation: Operation, payload: Payload) -> Result<Reply, ServiceError> {
        let url = self.endpoint(operation)?;
        essay_debug!("{} {}", operation.method(), url);

        let mut request = self.client.request(operation.method(), url);
        if let Some(timeout) = self.settings.request_timeout {
            request = request.timeout(timeout);
        }
        request = match payload {
            Payload::None => request,
            Payload::Json(body) => request.json(&body),
            Payload::File(file) => {
                let part = Part::bytes(file.bytes).file_name(file.name);
                request.multipart(Form::new().part("file", part))
            }
        };

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let detail = error_detail(&body);
            essay_warn!("{:?} rejected with {}", operation, status);
            return Err(ServiceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            )
            .with_detail(detail));
        }

        match operation.response_kind() {
            ResponseKind::StatusOnly => Ok(Reply::Empty),
            ResponseKind::Binary => {
                let body = response.bytes().await.map_err(map_reqwest_error)?;
                Ok(Reply::Binary(body))
            }
            ResponseKind::Json => {
                let body = response.bytes().await.map_err(map_reqwest_error)?;
                serde_json::from_slice(&body).map(Reply::Json).map_err(|err| {
                    ServiceError::new(FailureKind::MalformedResponse, err.to_string())
                })
            }
        }
    }
}

/// Pull a human-readable message out of a JSON error body.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["detail", "error"]
        .iter()
        .find_map(|key| value.get(key))
        .map(|detail| match detail {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_decode() {
        return ServiceError::new(FailureKind::MalformedResponse, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
