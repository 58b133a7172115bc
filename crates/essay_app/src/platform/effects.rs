use std::sync::mpsc;
use std::thread;

use essay_core::{
    AnalysisReport, Effect, Msg, RemoteFailure, RemoteFailureKind, StructureBlueprint,
};
use essay_logging::{essay_debug, essay_info, essay_warn};
use essay_service::{
    CorpusAnalysis, ExportSections, FailureKind, ServiceCommand, ServiceError, ServiceEvent,
    ServiceHandle,
};

use super::clipboard::Clipboard;
use super::ui::commands::Command;

pub struct EffectRunner {
    service: ServiceHandle,
    msg_tx: mpsc::Sender<Command>,
    clipboard: Clipboard,
}

impl EffectRunner {
    pub fn new(service: ServiceHandle, msg_tx: mpsc::Sender<Command>) -> Self {
        Self {
            service,
            msg_tx,
            clipboard: Clipboard::open(),
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ParseCv { file } => {
                    essay_info!("ParseCv file={}", file.name);
                    self.send(ServiceCommand::ParseCv {
                        filename: file.name,
                        path: file.path,
                    });
                }
                Effect::GenerateEssay { profile } => match serde_json::to_value(&profile) {
                    Ok(profile) => self.send(ServiceCommand::Generate { profile }),
                    Err(err) => {
                        let failure = RemoteFailure::new(RemoteFailureKind::Local, err.to_string());
                        self.deliver(Msg::GenerationFinished(Err(failure)));
                    }
                },
                Effect::CopyToClipboard { text } => {
                    // The acknowledgement is shown regardless of the outcome.
                    match self.clipboard.copy(&text) {
                        Ok(route) => essay_debug!("Copied draft via {:?}", route),
                        Err(err) => essay_warn!("Clipboard write failed: {}", err),
                    }
                }
                Effect::ScheduleCopyAckReset { token, after } => {
                    let msg_tx = self.msg_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        let _ = msg_tx.send(Command::Dispatch(Msg::CopyAckElapsed { token }));
                    });
                }
                Effect::ExportDocument { ticket, draft } => {
                    self.send(ServiceCommand::Export {
                        ticket,
                        sections: ExportSections {
                            q1: draft.q1_motivation,
                            q2: draft.q2_academics,
                            q3: draft.q3_activities,
                        },
                    });
                }
                Effect::IngestExemplars { files } => {
                    self.send(ServiceCommand::IngestExemplars {
                        paths: files.into_iter().map(|file| file.path).collect(),
                    });
                }
                Effect::FetchStats => self.send(ServiceCommand::FetchStats),
                Effect::AnalyzeCorpus => self.send(ServiceCommand::Analyze),
            }
        }
    }

    /// Forward service completions to the message loop.
    pub fn spawn_event_loop(&self, events: mpsc::Receiver<ServiceEvent>) {
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || {
            for event in events {
                if msg_tx.send(Command::Dispatch(map_event(event))).is_err() {
                    break;
                }
            }
        });
    }

    fn send(&self, command: ServiceCommand) {
        if let Err(command) = self.service.send(command) {
            essay_warn!("Service runtime unavailable; failing {:?}", command);
            self.deliver(map_event(command.aborted_event()));
        }
    }

    fn deliver(&self, msg: Msg) {
        essay_debug!("Delivering local completion");
        let _ = self.msg_tx.send(Command::Dispatch(msg));
    }
}

pub(crate) fn map_event(event: ServiceEvent) -> Msg {
    match event {
        ServiceEvent::CvParsed { filename, result } => Msg::CvParsed {
            filename,
            result: result.map_err(map_failure),
        },
        ServiceEvent::GenerationFinished(result) => {
            Msg::GenerationFinished(result.map_err(map_failure))
        }
        ServiceEvent::ExportFinished { ticket, result } => Msg::ExportFinished {
            ticket,
            result: result.map_err(map_failure),
        },
        ServiceEvent::ExemplarsIngested(summary) => Msg::ExemplarsIngested {
            attempted: summary.attempted,
            succeeded: summary.succeeded,
        },
        ServiceEvent::StatsLoaded(result) => Msg::StatsLoaded(result.map_err(map_failure)),
        ServiceEvent::AnalysisFinished(result) => {
            Msg::AnalysisFinished(result.map(map_analysis).map_err(map_failure))
        }
    }
}

fn map_failure(err: ServiceError) -> RemoteFailure {
    let kind = match err.kind {
        FailureKind::Network => RemoteFailureKind::Transport,
        FailureKind::HttpStatus(code) => RemoteFailureKind::Rejected(code),
        FailureKind::MalformedResponse => RemoteFailureKind::Malformed,
        FailureKind::LocalIo => RemoteFailureKind::Local,
        FailureKind::Aborted => RemoteFailureKind::Aborted,
    };
    RemoteFailure {
        kind,
        message: err.message,
        detail: err.detail,
    }
}

fn map_analysis(analysis: CorpusAnalysis) -> AnalysisReport {
    AnalysisReport {
        blueprint: analysis
            .structure_blueprint
            .map(|blueprint| StructureBlueprint {
                q1_percentage: blueprint.q1_percentage,
                q2_percentage: blueprint.q2_percentage,
                q3_percentage: blueprint.q3_percentage,
            }),
        error: analysis.error,
    }
}
