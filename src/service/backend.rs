//! Player resources and the `rodio` backend that creates them.
//!
//! The session only talks to `AudioBackend` / `PlayerResource`. Releasing a
//! player is dropping it.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tracing::debug;

use crate::locator::ContentLocator;

use super::types::PlaybackError;

/// A single loaded source. Created paused.
pub trait PlayerResource {
    fn start(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek_to(&mut self, position: Duration) -> Result<(), PlaybackError>;
    fn position(&self) -> Duration;
    fn is_playing(&self) -> bool;
    /// True once the whole source has been played.
    fn is_finished(&self) -> bool;
}

pub trait AudioBackend {
    fn open(&self, locator: &ContentLocator) -> Result<Box<dyn PlayerResource>, PlaybackError>;
}

/// Builds the backend on the session thread, where the output stream must live.
pub type BackendFactory =
    Arc<dyn Fn() -> Result<Box<dyn AudioBackend>, PlaybackError> + Send + Sync>;

pub fn rodio_factory() -> BackendFactory {
    Arc::new(|| Ok(Box::new(RodioBackend::open_default()?) as Box<dyn AudioBackend>))
}

pub struct RodioBackend {
    stream: OutputStream,
}

impl RodioBackend {
    pub fn open_default() -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::DeviceUnavailable(e.to_string()))?;
        // rodio prints to stderr when the stream is dropped, which garbles the TUI.
        stream.log_on_drop(false);
        debug!("audio output stream opened");
        Ok(Self { stream })
    }
}

impl AudioBackend for RodioBackend {
    fn open(&self, locator: &ContentLocator) -> Result<Box<dyn PlayerResource>, PlaybackError> {
        let path = locator.path();
        let file = File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();
        Ok(Box::new(RodioPlayer { sink }))
    }
}

struct RodioPlayer {
    sink: Sink,
}

impl PlayerResource for RodioPlayer {
    fn start(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }

    fn seek_to(&mut self, position: Duration) -> Result<(), PlaybackError> {
        self.sink
            .try_seek(position)
            .map_err(|e| PlaybackError::Seek(e.to_string()))
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}
