use std::{env, path::PathBuf};

use thiserror::Error;

use super::schema::Settings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{key} {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then layers environment
/// variables (prefix `ONETRACK__`) on top, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ONETRACK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.service.poll_interval_ms == 0 {
            return Err(SettingsError::Invalid {
                key: "service.poll_interval_ms",
                reason: "must be >= 1",
            });
        }
        if self.ui.toast_ms == 0 {
            return Err(SettingsError::Invalid {
                key: "ui.toast_ms",
                reason: "must be >= 1",
            });
        }
        if self.picker.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(SettingsError::Invalid {
                key: "picker.extensions",
                reason: "must name at least one extension",
            });
        }
        Ok(())
    }
}

/// Resolve the config path from `ONETRACK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ONETRACK_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/onetrack/config.toml`
/// or `~/.config/onetrack/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("onetrack").join("config.toml"))
}
