use super::*;
use std::sync::mpsc;

fn make_song() -> SongModel {
    SongModel::from_fields(
        Some("Test Title".into()),
        Some("Test Artist".into()),
        Some("Test Album".into()),
        Some(1_234),
    )
}

fn handle() -> (MprisHandle, mpsc::Receiver<ControlCmd>) {
    let (tx, rx) = mpsc::channel();
    (MprisHandle::new(tx), rx)
}

#[test]
fn post_sets_and_withdraw_clears_shared_state() {
    let (handle, _rx) = handle();
    let loc = ContentLocator::new("/tmp/music/test.mp3").unwrap();

    handle.post(&loc, &make_song());
    handle.set_state(PlayerState::Playing);
    {
        let s = handle.state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist.as_deref(), Some("Test Artist"));
        assert_eq!(s.album.as_deref(), Some("Test Album"));
        assert_eq!(s.url.as_deref(), Some("file:///tmp/music/test.mp3"));
        assert_eq!(s.length_micros, Some(1_234_000));
        assert_eq!(s.state, PlayerState::Playing);
    }

    handle.withdraw();
    {
        let s = handle.state.lock().unwrap();
        assert_eq!(s.title, None);
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert_eq!(s.state, PlayerState::Idle);
    }
}

#[test]
fn playback_status_maps_player_states() {
    assert_eq!(status_str(PlayerState::Idle), "Stopped");
    assert_eq!(status_str(PlayerState::Ready), "Paused");
    assert_eq!(status_str(PlayerState::Playing), "Playing");
    assert_eq!(status_str(PlayerState::Paused), "Paused");
    assert_eq!(status_str(PlayerState::Stopped), "Stopped");
}

#[test]
fn metadata_is_empty_without_a_song() {
    let s = SharedState::default();
    assert!(metadata_map(&s).is_empty());
}

#[test]
fn metadata_carries_song_fields() {
    let (handle, _rx) = handle();
    let loc = ContentLocator::new("/tmp/music/test.mp3").unwrap();
    handle.post(&loc, &make_song());

    let s = handle.state.lock().unwrap();
    let map = metadata_map(&s);
    for key in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(key), "missing {key}");
    }
}

#[test]
fn player_methods_forward_control_commands() {
    let (tx, rx) = mpsc::channel();
    let iface = PlayerIface {
        tx,
        state: Arc::new(Mutex::new(SharedState::default())),
    };

    iface.play();
    iface.pause();
    iface.play_pause();
    iface.stop();
    iface.set_position(
        OwnedObjectPath::try_from(TRACK_ID).unwrap(),
        2_500_000,
    );
    iface.set_position(OwnedObjectPath::try_from(TRACK_ID).unwrap(), -1);

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::Play,
            ControlCmd::Pause,
            ControlCmd::PlayPause,
            ControlCmd::Stop,
            ControlCmd::SeekTo(Duration::from_millis(2_500)),
        ]
    );
    assert!(!iface.has_source());
}
