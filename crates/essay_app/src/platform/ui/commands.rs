use essay_core::{Msg, ProfileField, Section, SelectedFile};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  set <field> <text>      target_course | super_curriculars | work_experience | motivation
  cv <path>               upload a CV (PDF or DOCX) for parsing
  next | back             move between steps (next at step 2 generates the draft)
  edit                    toggle edit mode on the draft
  section <q1|q2|q3> <text>
                          replace one draft section
  copy | export           copy the draft to the clipboard / save it as a Word document
  restart                 back to step 1, keeping your answers
  new                     start over with an empty profile
  ingest <path>...        upload exemplar essays to the corpus
  stats | analyze         refresh the corpus count / run corpus analysis
  dismiss | help | quit
Write \\n inside text for a line break.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0}")]
    Invalid(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line, ""),
    };

    let msg = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "set" => {
            let (name, value) = split_arg(rest).ok_or(ParseError::Usage("set <field> <text>"))?;
            let field = name
                .parse::<ProfileField>()
                .map_err(|err| ParseError::Invalid(err.to_string()))?;
            if matches!(field, ProfileField::CvText | ProfileField::CvFilename) {
                return Err(ParseError::Invalid(
                    "CV fields are filled by `cv <path>`".to_string(),
                ));
            }
            Msg::FieldChanged {
                field,
                value: unescape(value),
            }
        }
        "cv" => {
            if rest.is_empty() {
                return Err(ParseError::Usage("cv <path>"));
            }
            Msg::CvFileChosen(SelectedFile::from_path(rest))
        }
        "next" => Msg::NextClicked,
        "back" => Msg::BackClicked,
        "restart" => Msg::RestartClicked,
        "new" => Msg::NewSessionRequested,
        "edit" => Msg::ToggleEditClicked,
        "section" => {
            let (name, value) =
                split_arg(rest).ok_or(ParseError::Usage("section <q1|q2|q3> <text>"))?;
            let section = name.parse::<Section>().map_err(ParseError::Invalid)?;
            Msg::SectionEdited {
                section,
                value: unescape(value),
            }
        }
        "copy" => Msg::CopyAllClicked,
        "export" => Msg::ExportClicked,
        "ingest" => {
            let files: Vec<_> = rest.split_whitespace().map(SelectedFile::from_path).collect();
            if files.is_empty() {
                return Err(ParseError::Usage("ingest <path>..."));
            }
            Msg::ExemplarFilesChosen(files)
        }
        "stats" => Msg::StatsRequested,
        "analyze" => Msg::AnalyzeClicked,
        "dismiss" => Msg::DismissNotice,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(Command::Dispatch(msg)))
}

/// First word and the remaining text (possibly empty).
fn split_arg(rest: &str) -> Option<(&str, &str)> {
    if rest.is_empty() {
        return None;
    }
    Some(match rest.split_once(char::is_whitespace) {
        Some((name, value)) => (name, value.trim_start()),
        None => (rest, ""),
    })
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}
