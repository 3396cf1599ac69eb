//! The playback session state machine.
//!
//! `PlaybackService` owns at most one player resource and maps each
//! `ServiceCmd` onto it. Commands that need a player are ignored while
//! there is none. Dropping the service (for any reason) releases the player
//! and withdraws the now-playing publication.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::locator::ContentLocator;
use crate::song::SongModel;

use super::backend::{AudioBackend, PlayerResource};
use super::bus::StatusBus;
use super::now_playing::NowPlaying;
use super::types::{Flow, PlayerState, ServiceCmd, ServiceStatus};

pub struct PlaybackService {
    backend: Box<dyn AudioBackend>,
    now_playing: Arc<dyn NowPlaying>,
    bus: StatusBus,
    player: Option<Box<dyn PlayerResource>>,
    song: Option<SongModel>,
    state: PlayerState,
}

impl PlaybackService {
    pub fn new(
        backend: Box<dyn AudioBackend>,
        now_playing: Arc<dyn NowPlaying>,
        bus: StatusBus,
    ) -> Self {
        debug!("playback session created");
        Self {
            backend,
            now_playing,
            bus,
            player: None,
            song: None,
            state: PlayerState::Idle,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn song(&self) -> Option<&SongModel> {
        self.song.as_ref()
    }

    pub fn handle(&mut self, cmd: ServiceCmd) -> Flow {
        match cmd {
            ServiceCmd::SetSource { locator, song } => self.set_source(locator, song),
            ServiceCmd::Play => self.play(),
            ServiceCmd::Pause => self.pause(),
            ServiceCmd::PlayOrPause => self.play_or_pause(),
            ServiceCmd::SeekTo(position) => self.seek_to(position),
            ServiceCmd::Stop => return self.stop(),
        }
        Flow::Continue
    }

    /// True once the loaded source has played to the end.
    pub fn source_finished(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.is_finished())
    }

    /// Called on the idle tick: ends the session once the source has drained.
    pub fn poll_completion(&mut self) -> Flow {
        if !self.source_finished() {
            return Flow::Continue;
        }

        info!("playback finished");
        self.release_player();
        self.state = PlayerState::Stopped;
        self.bus.publish(ServiceStatus::Stopped);
        Flow::Terminate
    }

    fn set_source(&mut self, locator: ContentLocator, song: SongModel) {
        self.release_player();
        self.song = None;

        match self.backend.open(&locator) {
            Ok(player) => {
                info!(%locator, title = song.title(), "source set");
                self.player = Some(player);
                self.state = PlayerState::Ready;
                self.now_playing.ensure_channel();
                self.now_playing.post(&locator, &song);
                self.now_playing.set_state(self.state);
                self.song = Some(song);
                self.bus.publish(ServiceStatus::Ready);
            }
            Err(e) => {
                error!("{e}");
                self.state = PlayerState::Idle;
                self.now_playing.withdraw();
                self.bus.publish(ServiceStatus::Failed(e.to_string()));
            }
        }
    }

    fn play(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.start();
        self.enter(PlayerState::Playing, ServiceStatus::Playing);
    }

    fn pause(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.pause();
        self.enter(PlayerState::Paused, ServiceStatus::Paused);
    }

    fn play_or_pause(&mut self) {
        let Some(player) = self.player.as_ref() else {
            return;
        };
        if player.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    fn seek_to(&mut self, position: Duration) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        match player.seek_to(position) {
            Ok(()) => {
                let now = player.position();
                self.bus.publish(ServiceStatus::SeekUpdate(now));
            }
            Err(e) => warn!("{e}"),
        }
    }

    fn stop(&mut self) -> Flow {
        info!("stop requested");
        self.release_player();
        self.song = None;
        self.now_playing.withdraw();
        self.state = PlayerState::Stopped;
        self.bus.publish(ServiceStatus::Stopped);
        Flow::Terminate
    }

    fn enter(&mut self, state: PlayerState, status: ServiceStatus) {
        self.state = state;
        self.now_playing.set_state(state);
        self.bus.publish(status);
    }

    fn release_player(&mut self) {
        if let Some(mut old) = self.player.take() {
            old.stop();
            debug!("player released");
        }
    }
}

impl Drop for PlaybackService {
    fn drop(&mut self) {
        self.release_player();
        self.now_playing.withdraw();
        debug!("playback session destroyed");
    }
}
