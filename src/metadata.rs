//! Tag extraction for a picked song.
//!
//! `extract` never fails: a reader error degrades to the all-`Unknown`
//! descriptor, and each missing tag falls back on its own.

use std::path::PathBuf;

use lofty::error::LoftyError;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::Accessor;
use thiserror::Error;
use tracing::{debug, warn};

use crate::locator::ContentLocator;
use crate::song::SongModel;

/// Raw tag values as read from the file; `None` means the tag is absent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read tags from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: LoftyError,
    },
}

pub trait MetadataReader {
    fn read(&self, locator: &ContentLocator) -> Result<RawMetadata, MetadataError>;
}

/// Reads tags and stream properties with `lofty`. The file handle is opened
/// and closed inside `read`.
pub struct LoftyReader;

impl MetadataReader for LoftyReader {
    fn read(&self, locator: &ContentLocator) -> Result<RawMetadata, MetadataError> {
        let tagged = lofty::read_from_path(locator.path()).map_err(|source| MetadataError::Read {
            path: locator.path().to_path_buf(),
            source,
        })?;

        let mut raw = RawMetadata {
            duration_ms: Some(tagged.properties().duration().as_millis() as u64),
            ..RawMetadata::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            raw.title = tag.title().map(|v| v.to_string());
            raw.artist = tag.artist().map(|v| v.to_string());
            raw.album = tag.album().map(|v| v.to_string());
        }

        Ok(raw)
    }
}

/// Extract a `SongModel` for `locator`, substituting defaults for anything unreadable.
pub fn extract(reader: &dyn MetadataReader, locator: &ContentLocator) -> SongModel {
    match reader.read(locator) {
        Ok(raw) => {
            debug!(?raw, %locator, "read metadata");
            SongModel::from_fields(raw.title, raw.artist, raw.album, raw.duration_ms)
        }
        Err(e) => {
            warn!("{e}");
            SongModel::default()
        }
    }
}
