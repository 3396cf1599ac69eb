//! The song descriptor shared by the UI and the playback service.

use std::time::Duration;

/// Placeholder for any tag that could not be read.
pub const UNKNOWN: &str = "Unknown";

/// Immutable title/artist/album/duration record for the picked song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongModel {
    title: String,
    artist: String,
    album: String,
    duration_ms: u64,
}

impl Default for SongModel {
    fn default() -> Self {
        Self {
            title: UNKNOWN.to_string(),
            artist: UNKNOWN.to_string(),
            album: UNKNOWN.to_string(),
            duration_ms: 0,
        }
    }
}

impl SongModel {
    /// Build a descriptor, falling back per field when a value is missing or blank.
    pub fn from_fields(
        title: Option<String>,
        artist: Option<String>,
        album: Option<String>,
        duration_ms: Option<u64>,
    ) -> Self {
        Self {
            title: or_unknown(title),
            artist: or_unknown(artist),
            album: or_unknown(album),
            duration_ms: duration_ms.unwrap_or(0),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Multi-line text rendered in the song panel.
    pub fn summary(&self) -> String {
        format!(
            "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}",
            self.title,
            self.artist,
            self.album,
            format_duration(self.duration_ms)
        )
    }
}

fn or_unknown(v: Option<String>) -> String {
    v.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Format milliseconds as `MM:SS`. Minutes are not capped at 59.
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
