//! Essay service: remote client and background execution of wizard effects.
mod batch;
mod client;
mod handle;
mod operation;
mod persist;
mod types;

pub use batch::ingest_sequentially;
pub use client::{RemoteService, ReqwestService, ServiceSettings};
pub use handle::{ServiceCommand, ServiceHandle};
pub use operation::{Operation, Payload, Reply, ResponseKind, UploadFile};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError, EXPORT_FILENAME};
pub use types::{
    BatchSummary, Blueprint, CorpusAnalysis, CorpusStats, ExportSections, FailureKind,
    ParsedDocument, ServiceError, ServiceEvent,
};
