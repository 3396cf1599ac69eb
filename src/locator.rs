//! Content locators.
//!
//! A `ContentLocator` is the opaque handle the picker hands back for a
//! selected media item. Everything downstream (tag reading, playback,
//! now-playing) resolves the item through it.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocatorError {
    #[error("empty content locator")]
    Empty,
    #[error("not a playable file: {}", .0.display())]
    NotAFile(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLocator(PathBuf);

impl ContentLocator {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, LocatorError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(LocatorError::Empty);
        }
        Ok(Self(path))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Check the locator still names a regular file.
    pub fn ensure_resolvable(&self) -> Result<(), LocatorError> {
        if self.0.is_file() {
            Ok(())
        } else {
            Err(LocatorError::NotAFile(self.0.clone()))
        }
    }

    /// `file://` form used by the now-playing publication.
    pub fn uri(&self) -> String {
        format!("file://{}", self.0.display())
    }
}

impl fmt::Display for ContentLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
