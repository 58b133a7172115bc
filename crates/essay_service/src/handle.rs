use std::io;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;

use essay_logging::{essay_info, essay_warn};
use serde_json::Value;

use crate::batch::ingest_sequentially;
use crate::persist::{AtomicFileWriter, EXPORT_FILENAME};
use crate::{
    BatchSummary, ExportSections, FailureKind, RemoteService, ServiceError, ServiceEvent,
    UploadFile,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCommand {
    ParseCv { filename: String, path: PathBuf },
    Generate { profile: Value },
    Export { ticket: u64, sections: ExportSections },
    IngestExemplars { paths: Vec<PathBuf> },
    FetchStats,
    Analyze,
}

impl ServiceCommand {
    /// The event reported when this command cannot deliver a real result.
    pub fn aborted_event(&self) -> ServiceEvent {
        let aborted = ServiceError::aborted();
        match self {
            ServiceCommand::ParseCv { filename, .. } => ServiceEvent::CvParsed {
                filename: filename.clone(),
                result: Err(aborted),
            },
            ServiceCommand::Generate { .. } => ServiceEvent::GenerationFinished(Err(aborted)),
            ServiceCommand::Export { ticket, .. } => ServiceEvent::ExportFinished {
                ticket: *ticket,
                result: Err(aborted),
            },
            ServiceCommand::IngestExemplars { paths } => {
                ServiceEvent::ExemplarsIngested(BatchSummary {
                    attempted: paths.len(),
                    succeeded: 0,
                })
            }
            ServiceCommand::FetchStats => ServiceEvent::StatsLoaded(Err(aborted)),
            ServiceCommand::Analyze => ServiceEvent::AnalysisFinished(Err(aborted)),
        }
    }
}

/// Runs remote calls on a background runtime; results come back as events.
#[derive(Clone)]
pub struct ServiceHandle {
    cmd_tx: mpsc::Sender<ServiceCommand>,
}

impl ServiceHandle {
    /// Start the background runtime. Every command produces exactly one event.
    pub fn spawn(
        service: Arc<dyn RemoteService>,
        output_dir: PathBuf,
    ) -> io::Result<(Self, mpsc::Receiver<ServiceEvent>)> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ServiceCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let output_dir = Arc::new(output_dir);

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let service = service.clone();
                let output_dir = output_dir.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(service.as_ref(), &output_dir, command, event_tx).await;
                });
            }
        });

        Ok((Self { cmd_tx }, event_rx))
    }

    /// Hands the command back if the background runtime has gone away.
    pub fn send(&self, command: ServiceCommand) -> Result<(), ServiceCommand> {
        self.cmd_tx.send(command).map_err(|err| err.0)
    }
}

/// Sends the fallback event on drop unless a real result was delivered.
struct SettleGuard {
    tx: mpsc::Sender<ServiceEvent>,
    fallback: Option<ServiceEvent>,
}

impl SettleGuard {
    fn new(tx: mpsc::Sender<ServiceEvent>, fallback: ServiceEvent) -> Self {
        Self {
            tx,
            fallback: Some(fallback),
        }
    }

    fn settle(mut self, event: ServiceEvent) {
        self.fallback = None;
        let _ = self.tx.send(event);
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if let Some(event) = self.fallback.take() {
            essay_warn!("Service task ended without a result; releasing caller");
            let _ = self.tx.send(event);
        }
    }
}

pub(crate) async fn handle_command(
    service: &dyn RemoteService,
    output_dir: &Path,
    command: ServiceCommand,
    event_tx: mpsc::Sender<ServiceEvent>,
) {
    let guard = SettleGuard::new(event_tx, command.aborted_event());
    let event = match command {
        ServiceCommand::ParseCv { filename, path } => {
            let result = match UploadFile::read(&path).await {
                Ok(file) => service.parse_document(file).await.map(|doc| doc.text),
                Err(err) => Err(err),
            };
            ServiceEvent::CvParsed { filename, result }
        }
        ServiceCommand::Generate { profile } => {
            ServiceEvent::GenerationFinished(service.generate_essay(profile).await)
        }
        ServiceCommand::Export { ticket, sections } => {
            let result = match service.export_document(&sections).await {
                Ok(bytes) => save_export(output_dir.to_path_buf(), bytes.to_vec()).await,
                Err(err) => Err(err),
            };
            ServiceEvent::ExportFinished { ticket, result }
        }
        ServiceCommand::IngestExemplars { paths } => {
            ServiceEvent::ExemplarsIngested(ingest_sequentially(service, &paths).await)
        }
        ServiceCommand::FetchStats => {
            ServiceEvent::StatsLoaded(service.stats().await.map(|stats| stats.essay_count))
        }
        ServiceCommand::Analyze => ServiceEvent::AnalysisFinished(service.analyze_corpus().await),
    };
    guard.settle(event);
}

async fn save_export(output_dir: PathBuf, bytes: Vec<u8>) -> Result<PathBuf, ServiceError> {
    let saved = tokio::task::spawn_blocking(move || {
        AtomicFileWriter::new(output_dir).write(EXPORT_FILENAME, &bytes)
    })
    .await
    .map_err(|_| ServiceError::aborted())?;
    let path = saved.map_err(|err| ServiceError::new(FailureKind::LocalIo, err.to_string()))?;
    essay_info!("Saved export to {:?}", path);
    Ok(path)
}
