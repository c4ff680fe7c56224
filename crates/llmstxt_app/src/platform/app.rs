use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use llmstxt_core::{update, AppState, Effect, Msg};
use llmstxt_logging::{
    clear_current_session, llms_debug, llms_info, llms_warn, set_current_session,
};

use super::config::AppConfig;
use super::effects::{EffectRunner, Notice};
use super::intent::{parse_line, Intent};
use super::logging::{self, LogDestination};
use super::ui;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Core(Msg),
    Line(String),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::File);

    let config = AppConfig::from_env()?;
    llms_info!(
        "Starting client against {} (output {:?})",
        config.stream.base_url,
        config.output_dir
    );

    let (inbox_tx, inbox_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(&config, inbox_tx.clone());

    let mut out = io::stdout().lock();
    print_lines(&mut out, &ui::render::banner(&config.stream.base_url))?;
    if let Err(err) = runner.check_health() {
        llms_warn!("Health check failed: {}", err);
        writeln!(out, "! service at {} is not reachable ({err})", config.stream.base_url)?;
    }
    drop(out);

    spawn_stdin_reader(inbox_tx);

    let mut app = App {
        state: AppState::new(),
        runner,
    };
    app.render_all()?;

    let mut input_closed = false;
    while let Ok(event) = inbox_rx.recv() {
        match event {
            AppEvent::Core(msg) => app.dispatch(vec![msg])?,
            AppEvent::Line(line) => match parse_line(&line) {
                Intent::Dispatch(msgs) => app.dispatch(msgs)?,
                Intent::Help => print_lines(&mut io::stdout().lock(), &ui::render::help())?,
                Intent::Quit => break,
                Intent::Invalid(reason) => println!("! {reason}"),
            },
            AppEvent::InputClosed => input_closed = true,
        }

        // Piped input: let the last generation finish before exiting.
        if input_closed && app.state.active_session().is_none() {
            break;
        }
    }

    app.shutdown();
    llms_info!("Client exiting");
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    /// Apply a batch of messages, then render at most once.
    fn dispatch(&mut self, msgs: Vec<Msg>) -> io::Result<()> {
        let mut notices = Vec::new();
        for msg in msgs {
            if let Msg::StreamEvent { session_id, .. } = &msg {
                set_current_session(*session_id);
            }

            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            notices.extend(self.runner.run(effects));
            clear_current_session();
        }

        if self.state.consume_dirty() {
            self.render_all()?;
        }
        self.render_notices(&notices)
    }

    fn render_all(&self) -> io::Result<()> {
        print_lines(&mut io::stdout().lock(), &ui::render::render(&self.state.view()))
    }

    fn render_notices(&self, notices: &[Notice]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        for notice in notices {
            print_lines(&mut out, &ui::render::render_notice(notice))?;
        }
        Ok(())
    }

    /// Close any stream still open so the engine thread can wind down.
    fn shutdown(&self) {
        if let Some(session_id) = self.state.active_session() {
            llms_debug!("Closing session {} on exit", session_id);
            self.runner.run(vec![Effect::CloseStream { session_id }]);
        }
    }
}

fn spawn_stdin_reader(inbox: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if inbox.send(AppEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    llms_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
        let _ = inbox.send(AppEvent::InputClosed);
    });
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
