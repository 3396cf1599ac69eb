use crate::locator::ContentLocator;
use crate::song::SongModel;

use super::types::PlayerState;

/// The persistent "now playing" publication a session keeps while it holds
/// a source.
pub trait NowPlaying: Send + Sync {
    /// Create the publication channel. Must be idempotent.
    fn ensure_channel(&self);
    fn post(&self, locator: &ContentLocator, song: &SongModel);
    fn set_state(&self, state: PlayerState);
    fn withdraw(&self);
}

/// Used when publication is disabled in the settings.
pub struct Silent;

impl NowPlaying for Silent {
    fn ensure_channel(&self) {}
    fn post(&self, _: &ContentLocator, _: &SongModel) {}
    fn set_state(&self, _: PlayerState) {}
    fn withdraw(&self) {}
}
