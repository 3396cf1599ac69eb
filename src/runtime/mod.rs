use std::env;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{DisableFocusChange, EnableFocusChange};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::locator::ContentLocator;
use crate::metadata::LoftyReader;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::service::{NowPlaying, Silent, Supervisor, rodio_factory};

mod event_loop;
mod logging;
mod settings;

pub fn run() -> anyhow::Result<()> {
    let settings = settings::load_settings();
    logging::init(&settings.log);
    info!("onetrack starting");

    let (picker_root, initial) = startup_target(env::args_os().nth(1).map(PathBuf::from))?;

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let now_playing: Arc<dyn NowPlaying> = if settings.service.publish_now_playing {
        Arc::new(MprisHandle::new(control_tx))
    } else {
        Arc::new(Silent)
    };
    let mut supervisor = Supervisor::new(
        rodio_factory(),
        now_playing,
        Duration::from_millis(settings.service.poll_interval_ms),
    );
    let mut app = App::new(picker_root, Duration::from_millis(settings.ui.toast_ms));
    let mut state = event_loop::EventLoopState {
        statuses: Some(supervisor.subscribe()),
    };

    if let Some(locator) = initial {
        app.play_locator(locator, &LoftyReader, &mut supervisor, Instant::now());
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut supervisor,
        &control_rx,
        &mut state,
    );

    // The session is joined before the terminal is handed back.
    supervisor.stop();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("onetrack exiting");
    run_result
}

/// Split the CLI argument into the picker root and an optional initial pick.
fn startup_target(arg: Option<PathBuf>) -> anyhow::Result<(PathBuf, Option<ContentLocator>)> {
    let path = match arg {
        Some(p) => p,
        None => env::current_dir().context("cannot determine the current directory")?,
    };

    if path.is_file() {
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let locator = ContentLocator::new(path)?;
        return Ok((root, Some(locator)));
    }

    Ok((path, None))
}
