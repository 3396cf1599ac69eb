//! Ownership of the playback session.
//!
//! The `Supervisor` is the only holder of the session's thread handle and
//! command sender, so "is a session running?" is answered from the thread
//! itself rather than from a separately maintained flag.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::locator::ContentLocator;
use crate::song::SongModel;

use super::backend::BackendFactory;
use super::bus::StatusBus;
use super::now_playing::NowPlaying;
use super::thread::{Intake, spawn_session_thread};
use super::types::{ServiceCmd, ServiceError, ServiceStatus};

struct Session {
    tx: Sender<ServiceCmd>,
    intake: Arc<Intake>,
    join: JoinHandle<()>,
}

pub struct Supervisor {
    factory: BackendFactory,
    now_playing: Arc<dyn NowPlaying>,
    bus: StatusBus,
    poll_interval: Duration,
    session: Option<Session>,
}

impl Supervisor {
    pub fn new(
        factory: BackendFactory,
        now_playing: Arc<dyn NowPlaying>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            factory,
            now_playing,
            bus: StatusBus::default(),
            poll_interval,
            session: None,
        }
    }

    pub fn subscribe(&self) -> Receiver<ServiceStatus> {
        self.bus.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| !s.join.is_finished())
    }

    /// Start a session on `locator`, or retarget the running one.
    pub fn dispatch(&mut self, locator: ContentLocator, song: SongModel) -> Result<(), ServiceError> {
        locator.ensure_resolvable()?;

        if self.is_running() {
            let cmd = ServiceCmd::SetSource {
                locator: locator.clone(),
                song: song.clone(),
            };
            match self.send(cmd) {
                Ok(()) => return Ok(()),
                // The session is winding down or already gone.
                Err(ServiceError::Disconnected) => debug!("session gone, starting a new one"),
                Err(e) => return Err(e),
            }
        }

        self.start(locator, song)
    }

    pub fn send(&self, cmd: ServiceCmd) -> Result<(), ServiceError> {
        let session = self
            .session
            .as_ref()
            .filter(|s| !s.join.is_finished())
            .ok_or(ServiceError::NotRunning)?;
        session.intake.send(&session.tx, cmd)
    }

    /// Stop the running session, if any, and wait for its teardown.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let _ = session.intake.send(&session.tx, ServiceCmd::Stop);
        drop(session.tx);
        join(session.join);
    }

    fn start(&mut self, locator: ContentLocator, song: SongModel) -> Result<(), ServiceError> {
        self.reap();

        let (tx, rx) = mpsc::channel::<ServiceCmd>();
        let intake = Intake::new();
        // First command of a new session, queued before the thread starts.
        intake.send(&tx, ServiceCmd::SetSource { locator, song })?;

        let join = spawn_session_thread(
            self.factory.clone(),
            self.now_playing.clone(),
            self.bus.clone(),
            intake.clone(),
            rx,
            self.poll_interval,
        )?;
        info!("playback session started");
        self.session = Some(Session { tx, intake, join });
        Ok(())
    }

    /// Join a session thread that already ended on its own.
    fn reap(&mut self) {
        if let Some(session) = self.session.take() {
            drop(session.tx);
            join(session.join);
        }
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn join(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        error!("playback thread panicked");
    }
}
