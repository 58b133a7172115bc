use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use essay_logging::{essay_debug, essay_warn};

/// Which path the copied text took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyRoute {
    System,
    /// OSC 52 escape; whether the terminal honoured it is not observable.
    Terminal,
}

/// System clipboard with an OSC 52 fallback for headless or remote sessions.
///
/// The system handle stays open for the whole session; on X11 the copied text
/// is only served while it is alive.
pub struct Clipboard {
    system: Option<arboard::Clipboard>,
}

impl Clipboard {
    pub fn open() -> Self {
        let system = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                essay_warn!("System clipboard unavailable, using terminal escapes: {}", err);
                None
            }
        };
        Self { system }
    }

    pub fn copy(&mut self, text: &str) -> io::Result<CopyRoute> {
        if let Some(system) = self.system.as_mut() {
            match system.set_text(text) {
                Ok(()) => return Ok(CopyRoute::System),
                Err(err) => essay_debug!("System clipboard write failed: {}", err),
            }
        }
        // stdout carries the rendered screens.
        let mut stderr = io::stderr().lock();
        stderr.write_all(osc52_sequence(text).as_bytes())?;
        stderr.flush()?;
        Ok(CopyRoute::Terminal)
    }
}

fn osc52_sequence(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}
