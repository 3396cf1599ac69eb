//! Commands, statuses and errors of the playback service.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::locator::{ContentLocator, LocatorError};
use crate::song::SongModel;

/// Control messages accepted by a running session.
#[derive(Debug, Clone)]
pub enum ServiceCmd {
    /// Replace the current player with one bound to `locator`.
    SetSource {
        locator: ContentLocator,
        song: SongModel,
    },
    Play,
    Pause,
    PlayOrPause,
    /// Seek to an absolute position.
    SeekTo(Duration),
    /// Release the player and end the session.
    Stop,
}

/// Status messages published by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    /// A new source is loaded and waiting for `Play`.
    Ready,
    Playing,
    Paused,
    Stopped,
    /// Position after an explicit seek.
    SeekUpdate(Duration),
    /// The session could not open the output device or the source.
    Failed(String),
}

/// State of the session's player resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// No player yet.
    #[default]
    Idle,
    /// A source is loaded but has not started.
    Ready,
    Playing,
    Paused,
    /// Player released; the session is ending.
    Stopped,
}

/// What the session loop does after handling a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Terminate,
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    DeviceUnavailable(String),
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("seek failed: {0}")]
    Seek(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("playback service is not running")]
    NotRunning,
    #[error("playback service stopped listening")]
    Disconnected,
    #[error("failed to spawn playback thread: {0}")]
    Spawn(#[from] io::Error),
    #[error("invalid source: {0}")]
    InvalidSource(#[from] LocatorError),
}
