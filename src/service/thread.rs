use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error};

use super::backend::BackendFactory;
use super::bus::StatusBus;
use super::now_playing::NowPlaying;
use super::session::PlaybackService;
use super::types::{Flow, ServiceCmd, ServiceError, ServiceStatus};

/// Whether a session still accepts commands.
///
/// Sends happen under the lock, so once the session closes the intake every
/// accepted command is already in its queue.
pub(super) struct Intake {
    open: Mutex<bool>,
}

impl Intake {
    pub(super) fn new() -> Arc<Self> {
        Arc::new(Self {
            open: Mutex::new(true),
        })
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn send(&self, tx: &Sender<ServiceCmd>, cmd: ServiceCmd) -> Result<(), ServiceError> {
        let open = self.lock();
        if !*open {
            return Err(ServiceError::Disconnected);
        }
        tx.send(cmd).map_err(|_| ServiceError::Disconnected)
    }

    /// Stop accepting commands and take those already queued.
    pub(super) fn close(&self, rx: &Receiver<ServiceCmd>) -> Vec<ServiceCmd> {
        let mut open = self.lock();
        *open = false;
        rx.try_iter().collect()
    }

    pub(super) fn reopen(&self) {
        *self.lock() = true;
    }
}

/// The source drained: end the session, unless a command was queued in the
/// meantime, in which case the session carries on with it.
pub(super) fn wind_down(
    service: &mut PlaybackService,
    intake: &Intake,
    rx: &Receiver<ServiceCmd>,
) -> Flow {
    let pending = intake.close(rx);
    if pending.is_empty() {
        return service.poll_completion();
    }

    debug!(count = pending.len(), "commands queued at completion");
    intake.reopen();
    for cmd in pending {
        if service.handle(cmd) == Flow::Terminate {
            return Flow::Terminate;
        }
    }
    Flow::Continue
}

/// Run one playback session on its own thread until it stops, finishes, or
/// its command channel closes.
pub(super) fn spawn_session_thread(
    factory: BackendFactory,
    now_playing: Arc<dyn NowPlaying>,
    bus: StatusBus,
    intake: Arc<Intake>,
    rx: Receiver<ServiceCmd>,
    poll_interval: Duration,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("playback".to_string())
        .spawn(move || {
            let backend = match factory() {
                Ok(b) => b,
                Err(e) => {
                    error!("{e}");
                    intake.close(&rx);
                    bus.publish(ServiceStatus::Failed(e.to_string()));
                    return;
                }
            };

            let mut service = PlaybackService::new(backend, now_playing, bus);

            loop {
                let flow = match rx.recv_timeout(poll_interval) {
                    Ok(cmd) => {
                        debug!(?cmd, "session command");
                        service.handle(cmd)
                    }
                    Err(RecvTimeoutError::Timeout) if service.source_finished() => {
                        wind_down(&mut service, &intake, &rx)
                    }
                    Err(RecvTimeoutError::Timeout) => Flow::Continue,
                    Err(RecvTimeoutError::Disconnected) => Flow::Terminate,
                };
                if flow == Flow::Terminate {
                    break;
                }
            }

            // Late senders see a disconnect instead of a queue nobody reads.
            intake.close(&rx);
            drop(rx);
            drop(service);
        })
}
