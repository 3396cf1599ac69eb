//! The pick flow: access check, picker, metadata, session dispatch.

use std::time::Instant;

use tracing::{info, warn};

use crate::config::PickerSettings;
use crate::locator::ContentLocator;
use crate::metadata::{MetadataReader, extract};
use crate::picker::{AccessError, PickOutcome, Picker, check_read_access, scan_audio};
use crate::service::Supervisor;

use super::model::App;

pub const PERMISSION_DENIED: &str = "Permission denied";
pub const NOT_SELECTED: &str = "Song not selected";

impl App {
    /// Open the picker on `picker_root`, or toast why it cannot be opened.
    pub fn start_pick(&mut self, settings: &PickerSettings, now: Instant) {
        let access = check_read_access(&self.picker_root);
        self.open_picker(access, settings, now);
    }

    /// Act on the result of the access check on `picker_root`.
    pub fn open_picker(
        &mut self,
        access: Result<(), AccessError>,
        settings: &PickerSettings,
        now: Instant,
    ) {
        match access {
            Ok(()) => {}
            Err(AccessError::PermissionDenied(path)) => {
                warn!("no read access to {}", path.display());
                self.show_toast(PERMISSION_DENIED, now);
                return;
            }
            Err(e) => {
                warn!("{e}");
                self.show_toast(e.to_string(), now);
                return;
            }
        }

        let entries = scan_audio(&self.picker_root, settings);
        self.picker = Some(Picker::new(self.picker_root.clone(), entries));
    }

    /// Close the picker with `outcome` and act on it.
    pub fn finish_pick(
        &mut self,
        outcome: PickOutcome,
        reader: &dyn MetadataReader,
        supervisor: &mut Supervisor,
        now: Instant,
    ) {
        self.picker = None;
        match outcome {
            PickOutcome::Picked(locator) => self.play_locator(locator, reader, supervisor, now),
            PickOutcome::Cancelled => self.show_toast(NOT_SELECTED, now),
        }
    }

    /// Read tags for `locator`, show them, and hand the song to the session.
    pub fn play_locator(
        &mut self,
        locator: ContentLocator,
        reader: &dyn MetadataReader,
        supervisor: &mut Supervisor,
        now: Instant,
    ) {
        let song = extract(reader, &locator);
        info!(%locator, title = song.title(), "picked");

        match supervisor.dispatch(locator, song.clone()) {
            Ok(()) => self.show_song(song),
            Err(e) => {
                warn!("dispatch failed: {e}");
                self.show_toast(e.to_string(), now);
            }
        }
    }
}
