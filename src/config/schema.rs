use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/onetrack/config.toml` or `~/.config/onetrack/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ONETRACK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub picker: PickerSettings,
    pub ui: UiSettings,
    pub service: ServiceSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PickerSettings {
    /// File extensions offered by the picker (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks while listing.
    pub follow_links: bool,
    /// Whether to list hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to descend into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "flac", "wav", "ogg", "m4a", "opus"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How long transient messages stay on screen (milliseconds).
    pub toast_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ one song at a time ~ ".to_string(),
            toast_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Idle tick of the playback thread, used to notice the end of a song.
    pub poll_interval_ms: u64,
    /// Publish the current song over MPRIS.
    pub publish_now_playing: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            publish_now_playing: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub enabled: bool,
    /// Log file; defaults to `$XDG_STATE_HOME/onetrack/onetrack.log`.
    pub file: Option<PathBuf>,
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            file: None,
            filter: "info".to_string(),
        }
    }
}
