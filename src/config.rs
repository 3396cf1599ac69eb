//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive the picker, the UI, the
//! playback service and logging, plus helpers to load them from disk.

mod load;
mod schema;

pub use load::SettingsError;
pub use schema::*;
