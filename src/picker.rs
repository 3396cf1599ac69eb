//! The content picker: the audio-only file chooser behind the `o` key.
//!
//! Opening the picker first probes read access on its root directory, then
//! lists the audio files below it. The user filters and selects one entry,
//! which comes back as a `ContentLocator`, or cancels.

mod access;
mod scan;
mod state;

pub use access::{AccessError, check_read_access};
pub use scan::{PickerEntry, scan_audio};
pub use state::{PickOutcome, Picker};

#[cfg(test)]
mod tests;
