use super::*;
use crate::config::PickerSettings;
use crate::locator::ContentLocator;
use crate::metadata::{MetadataError, MetadataReader, RawMetadata};
use crate::picker::{AccessError, PickOutcome};
use crate::service::testing::{Probe, Recorder, fake_factory};
use crate::service::{ServiceCmd, ServiceStatus, Supervisor};
use crate::song::SongModel;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::tempdir;

struct Tags;

impl MetadataReader for Tags {
    fn read(&self, _: &ContentLocator) -> Result<RawMetadata, MetadataError> {
        Ok(RawMetadata {
            title: Some("Angel of Death".into()),
            artist: None,
            album: Some("Reign in Blood".into()),
            duration_ms: Some(291_000),
        })
    }
}

fn app(root: PathBuf) -> App {
    App::new(root, Duration::from_millis(2000))
}

fn supervisor(probe: &Arc<Probe>) -> Supervisor {
    Supervisor::new(
        fake_factory(probe.clone()),
        Arc::new(Recorder::default()),
        Duration::from_millis(5),
    )
}

fn next_status(rx: &std::sync::mpsc::Receiver<ServiceStatus>) -> ServiceStatus {
    rx.recv_timeout(Duration::from_secs(2))
        .expect("status within timeout")
}

#[test]
fn control_labels() {
    assert_eq!(ControlState::Hidden.label(), None);
    assert_eq!(ControlState::Play.label(), Some("Play"));
    assert_eq!(ControlState::Pause.label(), Some("Pause"));
}

#[test]
fn status_reflection_sequence() {
    let now = Instant::now();
    let mut app = app(PathBuf::from("/music"));
    app.show_song(SongModel::default());
    assert_eq!(app.control, ControlState::Play);

    app.apply_status(ServiceStatus::Playing, now);
    assert_eq!(app.control, ControlState::Pause);
    app.apply_status(ServiceStatus::Paused, now);
    assert_eq!(app.control, ControlState::Play);
    app.apply_status(ServiceStatus::SeekUpdate(Duration::from_secs(7)), now);
    assert_eq!(app.position, Some(Duration::from_secs(7)));
    app.apply_status(ServiceStatus::Stopped, now);
    assert_eq!(app.control, ControlState::Hidden);
}

#[test]
fn failure_status_toasts_and_hides_control() {
    let now = Instant::now();
    let mut app = app(PathBuf::from("/music"));
    app.show_song(SongModel::default());
    app.apply_status(ServiceStatus::Failed("cannot decode".into()), now);
    assert_eq!(app.control, ControlState::Hidden);
    assert_eq!(app.toast_text(), Some("cannot decode"));
}

#[test]
fn toast_expires_after_its_ttl() {
    let now = Instant::now();
    let mut app = app(PathBuf::from("/music"));
    app.show_toast("hello", now);

    app.expire_toast(now + Duration::from_millis(1999));
    assert_eq!(app.toast_text(), Some("hello"));
    app.expire_toast(now + Duration::from_millis(2000));
    assert_eq!(app.toast_text(), None);
}

#[test]
fn start_pick_on_missing_root_toasts_and_stays_closed() {
    let dir = tempdir().unwrap();
    let mut app = app(dir.path().join("nope"));
    app.start_pick(&PickerSettings::default(), Instant::now());
    assert!(!app.picker_open());
    assert!(app.toast_text().is_some_and(|t| t.contains("nope")));
}

#[test]
fn denied_access_toasts_permission_denied() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.mp3"), b"x").unwrap();
    let mut app = app(dir.path().to_path_buf());

    let denied = Err(AccessError::PermissionDenied(dir.path().to_path_buf()));
    app.open_picker(denied, &PickerSettings::default(), Instant::now());
    assert!(!app.picker_open());
    assert_eq!(app.toast_text(), Some(PERMISSION_DENIED));
}

#[test]
fn ready_status_shows_the_play_label() {
    let now = Instant::now();
    let mut app = app(PathBuf::from("/music"));
    app.apply_status(ServiceStatus::Stopped, now);
    app.apply_status(ServiceStatus::Ready, now);
    assert_eq!(app.control, ControlState::Play);
}

#[test]
fn start_pick_lists_audio_files() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.mp3"), b"x").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

    let mut app = app(dir.path().to_path_buf());
    app.start_pick(&PickerSettings::default(), Instant::now());
    let picker = app.picker.as_ref().expect("picker open");
    assert_eq!(picker.entries().len(), 1);
    assert_eq!(picker.entries()[0].label, "a.mp3");
}

#[test]
fn cancelled_pick_toasts_not_selected() {
    let probe = Arc::new(Probe::default());
    let mut sup = supervisor(&probe);
    let mut app = app(PathBuf::from("/music"));

    app.finish_pick(PickOutcome::Cancelled, &Tags, &mut sup, Instant::now());
    assert_eq!(app.toast_text(), Some(NOT_SELECTED));
    assert!(app.song.is_none());
    assert!(!sup.is_running());
}

#[test]
fn pick_play_pause_stop_flow() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("angel.mp3");
    std::fs::write(&path, b"x").unwrap();

    let probe = Arc::new(Probe::default());
    let mut sup = supervisor(&probe);
    let rx = sup.subscribe();
    let mut app = app(dir.path().to_path_buf());
    let now = Instant::now();

    let locator = ContentLocator::new(&path).unwrap();
    app.finish_pick(PickOutcome::Picked(locator), &Tags, &mut sup, now);
    assert!(sup.is_running());
    assert_eq!(app.control, ControlState::Play);
    assert_eq!(
        app.song.as_ref().map(|s| s.summary()),
        Some("Title: Angel of Death\nArtist: Unknown\nAlbum: Reign in Blood\nDuration: 04:51".into())
    );

    assert_eq!(next_status(&rx), ServiceStatus::Ready);

    sup.send(ServiceCmd::PlayOrPause).unwrap();
    app.apply_status(next_status(&rx), now);
    assert_eq!(app.control, ControlState::Pause);

    sup.send(ServiceCmd::PlayOrPause).unwrap();
    app.apply_status(next_status(&rx), now);
    assert_eq!(app.control, ControlState::Play);

    sup.stop();
    app.apply_status(next_status(&rx), now);
    assert_eq!(app.control, ControlState::Hidden);
    assert!(!sup.is_running());
    assert_eq!(probe.live(), 0);
}

#[test]
fn picking_a_vanished_file_toasts_the_error() {
    let probe = Arc::new(Probe::default());
    let mut sup = supervisor(&probe);
    let mut app = app(PathBuf::from("/music"));

    let locator = ContentLocator::new("/music/gone.mp3").unwrap();
    app.finish_pick(PickOutcome::Picked(locator), &Tags, &mut sup, Instant::now());
    assert!(app.song.is_none());
    assert_eq!(app.control, ControlState::Hidden);
    assert!(app.toast_text().is_some_and(|t| t.contains("gone.mp3")));
    assert!(!sup.is_running());
}
