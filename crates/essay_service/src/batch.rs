use std::path::PathBuf;

use essay_logging::{essay_debug, essay_warn};

use crate::{BatchSummary, RemoteService, UploadFile};

/// Submit files one after another and count the ones the service accepted.
///
/// Individual failures (unreadable file, rejection, network) are logged and
/// only show up in the aggregate count.
pub async fn ingest_sequentially(service: &dyn RemoteService, paths: &[PathBuf]) -> BatchSummary {
    let mut succeeded = 0;
    for path in paths {
        let result = match UploadFile::read(path).await {
            Ok(file) => service.ingest_exemplar(file).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => {
                succeeded += 1;
                essay_debug!("Ingested {:?}", path);
            }
            Err(err) => essay_warn!("Ingest of {:?} failed: {}", path, err),
        }
    }
    BatchSummary {
        attempted: paths.len(),
        succeeded,
    }
}
