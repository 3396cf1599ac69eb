//! Playback service.
//!
//! One session at a time runs on a dedicated thread and owns the only
//! player resource. The UI reaches it through the `Supervisor` with typed
//! `ServiceCmd`s and hears back through `ServiceStatus`es on the `StatusBus`.

mod backend;
mod bus;
mod now_playing;
mod session;
mod supervisor;
mod thread;
mod types;

pub use backend::{AudioBackend, BackendFactory, PlayerResource, rodio_factory};
pub use bus::StatusBus;
pub use now_playing::{NowPlaying, Silent};
pub use session::PlaybackService;
pub use supervisor::Supervisor;
pub use types::{Flow, PlaybackError, PlayerState, ServiceCmd, ServiceError, ServiceStatus};

#[cfg(test)]
pub(crate) mod testing;
