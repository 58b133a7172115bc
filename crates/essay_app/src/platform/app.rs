use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use essay_core::{update, AppState, Msg};
use essay_logging::essay_info;
use essay_service::{ReqwestService, ServiceHandle};

use super::config::WizardConfig;
use super::effects::EffectRunner;
use super::ui::commands::{self, Command};
use super::ui::render;

pub fn run(config: &WizardConfig) -> anyhow::Result<()> {
    let service = ReqwestService::new(config.service_settings())
        .context("building the service client")?;
    let (handle, events) = ServiceHandle::spawn(Arc::new(service), config.output_dir.clone())
        .context("starting the service runtime")?;

    let (msg_tx, msg_rx) = mpsc::channel::<Command>();
    let runner = EffectRunner::new(handle, msg_tx.clone());
    runner.spawn_event_loop(events);
    spawn_input_reader(msg_tx);

    let mut app = App {
        state: AppState::new(),
        runner,
    };
    app.show(&render::render(&app.state.view()));
    app.show(commands::HELP);
    app.dispatch(Msg::StatsRequested);

    while let Ok(command) = msg_rx.recv() {
        match command {
            Command::Dispatch(msg) => app.dispatch(msg),
            Command::Help => app.show(commands::HELP),
            Command::Quit => break,
        }
    }
    essay_info!("Session ended");
    Ok(())
}

/// Read stdin line by line on a background thread; end of input quits.
fn spawn_input_reader(msg_tx: mpsc::Sender<Command>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match commands::parse(&line) {
                Ok(Some(command)) => {
                    if msg_tx.send(command).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => println!("{err}"),
            }
        }
        let _ = msg_tx.send(Command::Quit);
    });
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = was_dirty.then(|| state.view());
        self.state = state;
        self.runner.enqueue(effects);
        if let Some(view) = view {
            self.show(&render::render(&view));
        }
    }

    fn show(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{text}");
        let _ = stdout.flush();
    }
}
