//! MPRIS now-playing publication.
//!
//! This is where a session's "notification" lives: desktop shells and
//! `playerctl` read the current song from here, and their Play/Pause/Stop
//! requests come back to the runtime as `ControlCmd`s. The D-Bus service is
//! registered once, the first time a session asks for the channel.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::locator::ContentLocator;
use crate::service::{NowPlaying, PlayerState};
use crate::song::SongModel;

const BUS_NAME: &str = "org.mpris.MediaPlayer2.onetrack";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const TRACK_ID: &str = "/org/onetrack/track/current";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    SeekTo(Duration),
}

#[derive(Debug, Default)]
struct SharedState {
    state: PlayerState,
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    tx: Mutex<Option<Sender<ControlCmd>>>,
    started: Once,
}

impl MprisHandle {
    pub fn new(tx: Sender<ControlCmd>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
            tx: Mutex::new(Some(tx)),
            started: Once::new(),
        }
    }

    fn spawn_server(&self) {
        let Some(tx) = self.tx.lock().ok().and_then(|mut t| t.take()) else {
            return;
        };
        let state = self.state.clone();

        let spawned = std::thread::Builder::new()
            .name("mpris".to_string())
            .spawn(move || block_on(serve(tx, state)));
        if let Err(e) = spawned {
            warn!("MPRIS: failed to spawn server thread: {e}");
        }
    }
}

async fn serve(tx: Sender<ControlCmd>, state: Arc<Mutex<SharedState>>) {
    let connection = match Connection::session().await {
        Ok(c) => c,
        Err(e) => {
            warn!("MPRIS: failed to connect to session bus: {e}");
            return;
        }
    };

    if let Err(e) = connection.request_name(BUS_NAME).await {
        warn!("MPRIS: failed to acquire name: {e}");
        return;
    }

    let object_server = connection.object_server();

    if let Err(e) = object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await
    {
        warn!("MPRIS: failed to register root iface: {e}");
        return;
    }

    if let Err(e) = object_server.at(OBJECT_PATH, PlayerIface { tx, state }).await {
        warn!("MPRIS: failed to register player iface: {e}");
        return;
    }

    debug!("MPRIS: serving {BUS_NAME}");

    // Keep the connection alive.
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

impl NowPlaying for MprisHandle {
    fn ensure_channel(&self) {
        self.started.call_once(|| self.spawn_server());
    }

    fn post(&self, locator: &ContentLocator, song: &SongModel) {
        if let Ok(mut s) = self.state.lock() {
            s.title = Some(song.title().to_string());
            s.artist = Some(song.artist().to_string());
            s.album = Some(song.album().to_string());
            s.url = Some(locator.uri());
            s.length_micros = i64::try_from(song.duration().as_micros()).ok();
        }
    }

    fn set_state(&self, state: PlayerState) {
        if let Ok(mut s) = self.state.lock() {
            s.state = state;
        }
    }

    fn withdraw(&self) {
        if let Ok(mut s) = self.state.lock() {
            *s = SharedState::default();
        }
    }
}

fn status_str(state: PlayerState) -> &'static str {
    match state {
        PlayerState::Idle | PlayerState::Stopped => "Stopped",
        PlayerState::Ready | PlayerState::Paused => "Paused",
        PlayerState::Playing => "Playing",
    }
}

fn insert(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    if let Ok(v) = OwnedValue::try_from(value) {
        map.insert(key.to_string(), v);
    }
}

fn metadata_map(s: &SharedState) -> HashMap<String, OwnedValue> {
    let mut map = HashMap::new();
    let Some(title) = s.title.clone() else {
        return map;
    };

    if let Ok(path) = ObjectPath::try_from(TRACK_ID) {
        insert(&mut map, "mpris:trackid", Value::from(path));
    }
    insert(&mut map, "xesam:title", Value::from(title));
    if let Some(artist) = s.artist.clone() {
        insert(&mut map, "xesam:artist", Value::from(vec![artist]));
    }
    if let Some(album) = s.album.clone() {
        insert(&mut map, "xesam:album", Value::from(album));
    }
    if let Some(url) = s.url.clone() {
        insert(&mut map, "xesam:url", Value::from(url));
    }
    if let Some(len) = s.length_micros {
        insert(&mut map, "mpris:length", Value::from(len));
    }
    map
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "onetrack"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec!["audio/*".to_string()]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn has_source(&self) -> bool {
        self.state.lock().map(|s| s.title.is_some()).unwrap_or(false)
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    fn set_position(&self, _track_id: OwnedObjectPath, position: i64) {
        if let Ok(micros) = u64::try_from(position) {
            let _ = self.tx.send(ControlCmd::SeekTo(Duration::from_micros(micros)));
        }
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        status_str(s.state)
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        self.state
            .lock()
            .map(|s| metadata_map(&s))
            .unwrap_or_default()
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        self.has_source()
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        self.has_source()
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        self.has_source()
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests;
