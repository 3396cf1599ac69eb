//! In-memory backend and now-playing sink for exercising sessions without
//! an audio device or a D-Bus session.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::locator::ContentLocator;
use crate::song::SongModel;

use super::backend::{AudioBackend, BackendFactory, PlayerResource};
use super::now_playing::NowPlaying;
use super::types::{PlaybackError, PlayerState};

#[derive(Default)]
pub struct Probe {
    pub opened: AtomicUsize,
    pub released: AtomicUsize,
    pub live: AtomicUsize,
    pub max_live: AtomicUsize,
    /// Set by tests to make the current source "drain".
    pub finished: AtomicBool,
    /// Make `open` fail.
    pub fail_open: AtomicBool,
    /// How long dropping a player takes.
    pub release_delay_ms: AtomicU64,
    /// Set when a player starts being dropped.
    pub releasing: AtomicBool,
}

impl Probe {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    pub fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    pub fn is_releasing(&self) -> bool {
        self.releasing.load(Ordering::SeqCst)
    }
}

pub struct FakeBackend {
    pub probe: Arc<Probe>,
}

impl AudioBackend for FakeBackend {
    fn open(&self, locator: &ContentLocator) -> Result<Box<dyn PlayerResource>, PlaybackError> {
        if self.probe.fail_open.load(Ordering::SeqCst) {
            return Err(PlaybackError::Decode {
                path: locator.path().to_path_buf(),
                reason: "unsupported format".into(),
            });
        }
        self.probe.finished.store(false, Ordering::SeqCst);
        self.probe.opened.fetch_add(1, Ordering::SeqCst);
        let live = self.probe.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.probe.max_live.fetch_max(live, Ordering::SeqCst);
        Ok(Box::new(FakePlayer {
            probe: self.probe.clone(),
            playing: false,
            position: Duration::ZERO,
        }))
    }
}

struct FakePlayer {
    probe: Arc<Probe>,
    playing: bool,
    position: Duration,
}

impl PlayerResource for FakePlayer {
    fn start(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn seek_to(&mut self, position: Duration) -> Result<(), PlaybackError> {
        self.position = position;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn is_finished(&self) -> bool {
        self.probe.finished.load(Ordering::SeqCst)
    }
}

impl Drop for FakePlayer {
    fn drop(&mut self) {
        self.probe.releasing.store(true, Ordering::SeqCst);
        let delay = self.probe.release_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay));
        }
        self.probe.live.fetch_sub(1, Ordering::SeqCst);
        self.probe.released.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn fake_factory(probe: Arc<Probe>) -> BackendFactory {
    Arc::new(move || {
        Ok(Box::new(FakeBackend {
            probe: probe.clone(),
        }) as Box<dyn AudioBackend>)
    })
}

pub fn failing_factory() -> BackendFactory {
    Arc::new(|| Err(PlaybackError::DeviceUnavailable("no sound card".into())))
}

/// Records every call as a short string.
#[derive(Default)]
pub struct Recorder {
    pub events: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, e: String) {
        self.events.lock().unwrap().push(e);
    }
}

impl NowPlaying for Recorder {
    fn ensure_channel(&self) {
        self.push("channel".into());
    }

    fn post(&self, _: &ContentLocator, song: &SongModel) {
        self.push(format!("post {} / {}", song.title(), song.artist()));
    }

    fn set_state(&self, state: PlayerState) {
        self.push(format!("state {state:?}"));
    }

    fn withdraw(&self) {
        self.push("withdraw".into());
    }
}
