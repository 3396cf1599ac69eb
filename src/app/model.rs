//! Controller model types: `App`, `ControlState` and `Toast`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::picker::Picker;
use crate::service::ServiceStatus;
use crate::song::SongModel;

/// Visibility and label of the play/pause control.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ControlState {
    #[default]
    Hidden,
    /// Visible, offering to start playback.
    Play,
    /// Visible, offering to pause playback.
    Pause,
}

impl ControlState {
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Hidden => None,
            Self::Play => Some("Play"),
            Self::Pause => Some("Pause"),
        }
    }
}

/// A short message that disappears on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub expires_at: Instant,
}

/// The controller state.
pub struct App {
    pub song: Option<SongModel>,
    pub control: ControlState,
    pub toast: Option<Toast>,
    pub picker: Option<Picker>,
    pub picker_root: PathBuf,
    /// Last position reported after a seek.
    pub position: Option<Duration>,
    toast_ttl: Duration,
}

impl App {
    pub fn new(picker_root: PathBuf, toast_ttl: Duration) -> Self {
        Self {
            song: None,
            control: ControlState::Hidden,
            toast: None,
            picker: None,
            picker_root,
            position: None,
            toast_ttl,
        }
    }

    /// Show a freshly picked song. A new source is never playing yet.
    pub fn show_song(&mut self, song: SongModel) {
        self.song = Some(song);
        self.control = ControlState::Play;
        self.position = None;
    }

    /// Reflect a status published by the playback session.
    pub fn apply_status(&mut self, status: ServiceStatus, now: Instant) {
        match status {
            ServiceStatus::Ready | ServiceStatus::Paused => self.control = ControlState::Play,
            ServiceStatus::Playing => self.control = ControlState::Pause,
            ServiceStatus::Stopped => self.control = ControlState::Hidden,
            ServiceStatus::Failed(reason) => {
                self.control = ControlState::Hidden;
                self.show_toast(reason, now);
            }
            ServiceStatus::SeekUpdate(pos) => self.position = Some(pos),
        }
    }

    /// Hide the control when no session is left to control.
    pub fn session_gone(&mut self) {
        self.control = ControlState::Hidden;
    }

    pub fn show_toast(&mut self, text: impl Into<String>, now: Instant) {
        self.toast = Some(Toast {
            text: text.into(),
            expires_at: now + self.toast_ttl,
        });
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
        }
    }

    pub fn toast_text(&self) -> Option<&str> {
        self.toast.as_ref().map(|t| t.text.as_str())
    }

    pub fn picker_open(&self) -> bool {
        self.picker.is_some()
    }
}
