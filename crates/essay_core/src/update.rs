use essay_logging::{essay_debug, essay_info, essay_warn, redacted};

use crate::{
    AnalysisOutcome, AppState, DraftEditor, Effect, Msg, NoticeLevel, ProfileField,
    RemoteFailure, RemoteFailureKind, WizardStage, COPY_ACK_DURATION,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FieldChanged { field, value } => {
            essay_debug!("FieldChanged field={} value={}", field, redacted(&value));
            state.profile_mut().set(field, value);
            state.mark_dirty();
            Vec::new()
        }
        Msg::NextClicked => next_clicked(&mut state),
        Msg::BackClicked => {
            if matches!(state.stage(), WizardStage::Step2) {
                state.set_stage(WizardStage::Step1);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RestartClicked => {
            if matches!(state.stage(), WizardStage::Step3(_)) {
                essay_info!("Restart: draft discarded, profile kept");
                state.set_stage(WizardStage::Step1);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NewSessionRequested => {
            if !state.stage().is_generating() && !state.cv_upload().is_busy() {
                essay_info!("New session: profile and draft cleared");
                state.reset_session();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::GenerationFinished(result) => {
            if !state.stage().is_generating() {
                essay_warn!("Ignoring stale generation result");
                return (state, Vec::new());
            }
            match result {
                Ok(value) => {
                    let editor = DraftEditor::from_response(&value);
                    if editor.draft().is_none() {
                        essay_warn!("Generation response could not be decoded; showing raw text");
                    } else {
                        essay_info!("Generation succeeded");
                    }
                    state.set_stage(WizardStage::Step3(editor));
                }
                Err(failure) => {
                    essay_warn!("Generation failed: {:?} {}", failure.kind, failure.message);
                    state.set_stage(WizardStage::Step2);
                    state.raise(
                        NoticeLevel::Error,
                        format!("Error generating essay: {}", generation_detail(&failure)),
                    );
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::CvFileChosen(file) => {
            if !matches!(state.stage(), WizardStage::Step1) {
                return (state, Vec::new());
            }
            if !state.cv_upload_mut().try_begin("Parsing...") {
                essay_debug!("CV upload already in progress; ignoring {}", file.name);
                return (state, Vec::new());
            }
            essay_info!("Parsing CV {}", file.name);
            state.mark_dirty();
            vec![Effect::ParseCv { file }]
        }
        Msg::CvParsed { filename, result } => {
            match result {
                Ok(text) => {
                    essay_info!("CV parsed file={} text={}", filename, redacted(&text));
                    let profile = state.profile_mut();
                    profile.set(ProfileField::CvText, text);
                    profile.set(ProfileField::CvFilename, filename);
                    state.cv_upload_mut().settle("CV Uploaded");
                }
                Err(failure) => {
                    essay_warn!("CV parse failed file={}: {}", filename, failure.message);
                    state.cv_upload_mut().settle("");
                    state.raise(NoticeLevel::Error, "Failed to parse CV");
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::ToggleEditClicked => {
            if let Some(editor) = state.stage_mut().editor_mut() {
                editor.toggle_edit();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SectionEdited { section, value } => {
            let updated = state
                .stage_mut()
                .editor_mut()
                .is_some_and(|editor| editor.update_section(section, value));
            if updated {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::CopyAllClicked => {
            let token = state.next_copy_token();
            match state.stage_mut().editor_mut() {
                Some(editor) => {
                    let text = editor.copy_text();
                    editor.acknowledge_copy(token);
                    state.mark_dirty();
                    vec![
                        Effect::CopyToClipboard { text },
                        Effect::ScheduleCopyAckReset {
                            token,
                            after: COPY_ACK_DURATION,
                        },
                    ]
                }
                None => Vec::new(),
            }
        }
        Msg::CopyAckElapsed { token } => {
            let expired = state
                .stage_mut()
                .editor_mut()
                .is_some_and(|editor| editor.expire_copy_ack(token));
            if expired {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ExportClicked => {
            let ticket = state.next_export_ticket();
            let Some(editor) = state.stage_mut().editor_mut() else {
                return (state, Vec::new());
            };
            let Some(draft) = editor.draft().cloned() else {
                return (state, Vec::new());
            };
            if !editor.begin_export(ticket) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            vec![Effect::ExportDocument { ticket, draft }]
        }
        Msg::ExportFinished { ticket, result } => {
            let status = match &result {
                Ok(path) => format!("Saved {}", path.display()),
                Err(_) => String::new(),
            };
            let settled = state
                .stage_mut()
                .editor_mut()
                .is_some_and(|editor| editor.finish_export(ticket, status.clone()));
            if !settled {
                essay_warn!("Ignoring stale export result ticket={}", ticket);
                return (state, Vec::new());
            }
            match result {
                Ok(path) => {
                    essay_info!("Export saved to {:?}", path);
                    state.raise(NoticeLevel::Info, status);
                }
                Err(failure) => {
                    essay_warn!("Export failed: {:?} {}", failure.kind, failure.message);
                    let text = match failure.kind {
                        RemoteFailureKind::Rejected(_) | RemoteFailureKind::Malformed => {
                            "Failed to create Word doc"
                        }
                        _ => "Error downloading file",
                    };
                    state.raise(NoticeLevel::Error, text);
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::ExemplarFilesChosen(files) => {
            if files.is_empty() || !state.admin_mut().ingest.try_begin("Uploading...") {
                return (state, Vec::new());
            }
            essay_info!("Ingesting {} exemplar files", files.len());
            state.mark_dirty();
            vec![Effect::IngestExemplars { files }]
        }
        Msg::ExemplarsIngested {
            attempted,
            succeeded,
        } => {
            essay_info!("Exemplar batch settled: {}/{} succeeded", succeeded, attempted);
            state
                .admin_mut()
                .ingest
                .settle(format!("Successfully uploaded {succeeded} files."));
            state.mark_dirty();
            vec![Effect::FetchStats]
        }
        Msg::StatsRequested => vec![Effect::FetchStats],
        Msg::StatsLoaded(result) => {
            match result {
                Ok(count) => {
                    state.admin_mut().essay_count = Some(count);
                    state.mark_dirty();
                }
                Err(failure) => {
                    essay_debug!("Stats unavailable: {}", failure.message);
                }
            }
            Vec::new()
        }
        Msg::AnalyzeClicked => {
            let admin = state.admin_mut();
            if !admin.analysis_task.try_begin("Analyzing...") {
                return (state, Vec::new());
            }
            admin.analysis = None;
            state.mark_dirty();
            vec![Effect::AnalyzeCorpus]
        }
        Msg::AnalysisFinished(result) => {
            let outcome = match result {
                Ok(report) => match report.error {
                    Some(error) => AnalysisOutcome::Failed(error),
                    None => AnalysisOutcome::Blueprint(report.blueprint),
                },
                Err(failure) => AnalysisOutcome::Failed(
                    failure
                        .detail
                        .unwrap_or_else(|| "Failed to trigger analysis.".to_string()),
                ),
            };
            let admin = state.admin_mut();
            admin.analysis_task.settle("");
            admin.analysis = Some(outcome);
            state.mark_dirty();
            Vec::new()
        }
        Msg::DismissNotice => {
            if state.clear_notice() {
                state.mark_dirty();
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn next_clicked(state: &mut AppState) -> Vec<Effect> {
    if !state.can_go_next() {
        return Vec::new();
    }
    match state.stage() {
        WizardStage::Step1 => {
            state.set_stage(WizardStage::Step2);
            state.mark_dirty();
            Vec::new()
        }
        WizardStage::Step2 => {
            essay_info!(
                "Generating draft for course={}",
                state.profile().target_course
            );
            state.set_stage(WizardStage::Generating);
            state.mark_dirty();
            vec![Effect::GenerateEssay {
                profile: state.profile().clone(),
            }]
        }
        WizardStage::Generating | WizardStage::Step3(_) => Vec::new(),
    }
}

fn generation_detail(failure: &RemoteFailure) -> String {
    if let Some(detail) = &failure.detail {
        return detail.clone();
    }
    match failure.kind {
        RemoteFailureKind::Rejected(_) => "Generation failed".to_string(),
        _ => failure.message.clone(),
    }
}
