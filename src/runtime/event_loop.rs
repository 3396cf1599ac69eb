use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::App;
use crate::config;
use crate::metadata::{LoftyReader, MetadataReader};
use crate::mpris::ControlCmd;
use crate::picker::PickOutcome;
use crate::service::{ServiceCmd, ServiceError, ServiceStatus, Supervisor};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Status subscription, held only while the terminal has focus.
    pub statuses: Option<Receiver<ServiceStatus>>,
}

/// Main terminal event loop: handles input, focus, drawing and MPRIS
/// requests. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    supervisor: &mut Supervisor,
    control_rx: &Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    loop {
        let now = Instant::now();
        drain_statuses(state, app, now);
        app.expire_toast(now);

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, supervisor) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, settings, app, supervisor, &LoftyReader) {
                        return Ok(());
                    }
                }
                other => handle_focus(&other, state, supervisor, app),
            }
        }
    }
}

/// Apply the statuses received since the last call, if subscribed.
fn drain_statuses(state: &EventLoopState, app: &mut App, now: Instant) {
    let Some(rx) = &state.statuses else {
        return;
    };
    for status in rx.try_iter() {
        debug!(?status, "service status");
        app.apply_status(status, now);
    }
}

/// Statuses are followed only while the terminal has focus.
fn handle_focus(event: &Event, state: &mut EventLoopState, supervisor: &Supervisor, app: &mut App) {
    match event {
        Event::FocusLost => {
            debug!("focus lost, dropping status subscription");
            state.statuses = None;
        }
        Event::FocusGained => {
            if state.statuses.is_none() {
                state.statuses = Some(supervisor.subscribe());
            }
            if !supervisor.is_running() {
                app.session_gone();
            }
        }
        _ => {}
    }
}

/// Forward a command to the session; a missing or ending session is not an error.
fn forward(supervisor: &Supervisor, cmd: ServiceCmd) {
    match supervisor.send(cmd) {
        Ok(()) | Err(ServiceError::NotRunning | ServiceError::Disconnected) => {}
        Err(e) => warn!("{e}"),
    }
}

/// Returns true when the app should exit.
fn handle_control_cmd(cmd: ControlCmd, supervisor: &mut Supervisor) -> bool {
    match cmd {
        ControlCmd::Quit => {
            supervisor.stop();
            return true;
        }
        ControlCmd::Play => forward(supervisor, ServiceCmd::Play),
        ControlCmd::Pause => forward(supervisor, ServiceCmd::Pause),
        ControlCmd::PlayPause => forward(supervisor, ServiceCmd::PlayOrPause),
        ControlCmd::Stop => supervisor.stop(),
        ControlCmd::SeekTo(pos) => forward(supervisor, ServiceCmd::SeekTo(pos)),
    }
    false
}

/// Returns true when the app should exit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    supervisor: &mut Supervisor,
    reader: &dyn MetadataReader,
) -> bool {
    let now = Instant::now();

    if let Some(picker) = app.picker.as_mut() {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let outcome = match key.code {
            KeyCode::Esc if picker.query.is_empty() => Some(PickOutcome::Cancelled),
            KeyCode::Esc => {
                picker.clear_query();
                None
            }
            KeyCode::Enter => Some(picker.pick()),
            KeyCode::Backspace => {
                picker.pop_char();
                None
            }
            KeyCode::Down => {
                picker.next();
                None
            }
            KeyCode::Up => {
                picker.prev();
                None
            }
            KeyCode::Char('j' | 'n') if ctrl => {
                picker.next();
                None
            }
            KeyCode::Char('k' | 'p') if ctrl => {
                picker.prev();
                None
            }
            KeyCode::Char(c) if !c.is_control() && !ctrl => {
                picker.push_char(c);
                None
            }
            _ => None,
        };
        if let Some(outcome) = outcome {
            app.finish_pick(outcome, reader, supervisor, now);
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            supervisor.stop();
            return true;
        }
        KeyCode::Char('o') => app.start_pick(&settings.picker, now),
        KeyCode::Char('p') | KeyCode::Char(' ') => forward(supervisor, ServiceCmd::PlayOrPause),
        KeyCode::Char('s') => supervisor.stop(),
        _ => {}
    }

    false
}
