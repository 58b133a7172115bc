use std::fmt::Write as _;

use essay_core::{AnalysisOutcome, AppViewModel, EditorView, NoticeLevel, Section, StepView};

const RULE: &str = "------------------------------------------------------------";

/// Render the whole screen as plain text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    match view.step {
        StepView::Profile => render_profile(&mut out, view),
        StepView::Motivation => render_motivation(&mut out, view),
        StepView::Generating => {
            let _ = writeln!(out, "Generating your draft...");
            if let Some(caption) = &view.generating_caption {
                let _ = writeln!(out, "{caption}");
            }
        }
        StepView::Preview => {
            if let Some(editor) = &view.editor {
                render_preview(&mut out, editor);
            }
        }
    }
    render_admin(&mut out, view);
    if let Some(notice) = &view.notice {
        let marker = match notice.level {
            NoticeLevel::Info => "[info]",
            NoticeLevel::Error => "[error]",
        };
        let _ = writeln!(out, "{marker} {} (dismiss to hide)", notice.text);
    }
    out
}

fn render_profile(out: &mut String, view: &AppViewModel) {
    let profile = &view.profile;
    let _ = writeln!(
        out,
        "Step {} of 2: Academic Profile [{}%]",
        view.step_number, view.progress_percent
    );
    let _ = writeln!(out, "  Target course:     {}", or_dash(&profile.target_course));
    let _ = writeln!(out, "  Super-curriculars: {}", or_dash(&profile.super_curriculars));
    let _ = writeln!(out, "  Work experience:   {}", or_dash(&profile.work_experience));
    if profile.cv_filename.is_empty() {
        let _ = writeln!(out, "  Upload CV / Resume [{}]", view.cv_button_label);
    } else {
        let _ = writeln!(
            out,
            "  CV Uploaded: {} [{}]",
            profile.cv_filename, view.cv_button_label
        );
    }
    render_nav(out, view);
}

fn render_motivation(out: &mut String, view: &AppViewModel) {
    let _ = writeln!(
        out,
        "Step {} of 2: The Spark [{}%]",
        view.step_number, view.progress_percent
    );
    let _ = writeln!(out, "  Why this subject? Tell us the moment you knew.");
    for line in view.profile.motivation.lines() {
        let _ = writeln!(out, "  | {line}");
    }
    let _ = writeln!(out, "  {} chars", view.motivation_chars);
    render_nav(out, view);
}

fn render_nav(out: &mut String, view: &AppViewModel) {
    let back = if view.can_go_back { "back" } else { "(back)" };
    let next = if view.can_go_next {
        format!("next: {}", view.next_label)
    } else {
        format!("(next: {} - set a target course first)", view.next_label)
    };
    let _ = writeln!(out, "  {back} | {next}");
}

fn render_preview(out: &mut String, editor: &EditorView) {
    let mode = if editor.is_editing {
        "Editing Mode On"
    } else {
        "Edit Text"
    };
    let copy = if editor.copied { "Copied!" } else { "copy" };
    let _ = writeln!(out, "Your Draft  [edit: {mode}] [{copy}] [export] [restart]");

    match (&editor.draft, &editor.raw_fallback) {
        (Some(draft), _) => {
            for section in Section::ALL {
                let _ = writeln!(out);
                let _ = writeln!(out, "{} ({})", section.heading(), section.short_name());
                for line in draft.section(section).lines() {
                    let _ = writeln!(out, "  {line}");
                }
            }
        }
        (None, Some((raw, error))) => {
            let _ = writeln!(out, "The draft could not be structured ({error}). Raw text:");
            let _ = writeln!(out, "{raw}");
        }
        (None, None) => {}
    }
    if editor.exporting {
        let _ = writeln!(out, "Exporting...");
    } else if !editor.export_status.is_empty() {
        let _ = writeln!(out, "{}", editor.export_status);
    }
}

fn render_admin(out: &mut String, view: &AppViewModel) {
    let admin = &view.admin;
    let _ = writeln!(out, "{RULE}");
    let _ = write!(out, "Corpus essays: {}", admin.essay_count_label);
    if admin.ingesting {
        let _ = write!(out, " | Ingesting...");
    } else if !admin.ingest_status.is_empty() {
        let _ = write!(out, " | {}", admin.ingest_status);
    }
    if admin.analyzing {
        let _ = write!(out, " | Analyzing...");
    }
    let _ = writeln!(out);
    match &admin.analysis {
        Some(AnalysisOutcome::Blueprint(Some(blueprint))) => {
            let _ = writeln!(
                out,
                "Blueprint Updated! Q1 {} | Q2 {} | Q3 {}",
                percent(blueprint.q1_percentage),
                percent(blueprint.q2_percentage),
                percent(blueprint.q3_percentage)
            );
        }
        Some(AnalysisOutcome::Blueprint(None)) => {
            let _ = writeln!(out, "Blueprint Updated!");
        }
        Some(AnalysisOutcome::Failed(message)) => {
            let _ = writeln!(out, "Analysis failed: {message}");
        }
        None => {}
    }
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value}%"),
        None => "?".to_string(),
    }
}

fn or_dash(text: &str) -> &str {
    if text.trim().is_empty() {
        "-"
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::render;
    use essay_core::{update, AnalysisReport, AppState, Msg, ProfileField, StructureBlueprint};
    use serde_json::json;

    fn state_with_course(course: &str) -> AppState {
        update(
            AppState::new(),
            Msg::FieldChanged {
                field: ProfileField::TargetCourse,
                value: course.to_string(),
            },
        )
        .0
    }

    #[test]
    fn step1_shows_disabled_next_without_course() {
        let screen = render(&AppState::new().view());
        assert!(screen.contains("Step 1 of 2"));
        assert!(screen.contains("(next: Next Step - set a target course first)"));
        assert!(screen.contains("Corpus essays: Loading..."));
    }

    #[test]
    fn step2_counts_motivation_characters() {
        let (state, _) = update(state_with_course("Law"), Msg::NextClicked);
        let (state, _) = update(
            state,
            Msg::FieldChanged {
                field: ProfileField::Motivation,
                value: "Justice".to_string(),
            },
        );
        let screen = render(&state.view());
        assert!(screen.contains("7 chars"));
        assert!(screen.contains("next: Generate Draft"));
    }

    #[test]
    fn preview_lists_sections_in_order() {
        let (state, _) = update(state_with_course("Law"), Msg::NextClicked);
        let (state, _) = update(state, Msg::NextClicked);
        let (state, _) = update(
            state,
            Msg::GenerationFinished(Ok(json!({
                "q1_motivation": "First",
                "q2_academics": "Second",
                "q3_activities": "Third"
            }))),
        );
        let screen = render(&state.view());
        let first = screen.find("First").unwrap();
        let second = screen.find("Second").unwrap();
        let third = screen.find("Third").unwrap();
        assert!(first < second && second < third);
        assert!(screen.contains("Edit Text"));
    }

    #[test]
    fn partial_blueprint_is_reported_as_updated() {
        let report = AnalysisReport {
            blueprint: Some(StructureBlueprint {
                q1_percentage: Some(30.0),
                q2_percentage: None,
                q3_percentage: Some(25.5),
            }),
            error: None,
        };
        let (state, _) = update(AppState::new(), Msg::AnalysisFinished(Ok(report)));
        let screen = render(&state.view());
        assert!(screen.contains("Blueprint Updated! Q1 30% | Q2 ? | Q3 25.5%"));
    }
}
