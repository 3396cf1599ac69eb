use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Permission denied")]
    PermissionDenied(PathBuf),
    #[error("No such directory: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Probe that `dir` can be listed before the picker opens on it.
pub fn check_read_access(dir: &Path) -> Result<(), AccessError> {
    fs::read_dir(dir)
        .map(|_| ())
        .map_err(|e| access_error(dir, e))
}

/// Classify a failure to list `dir`.
pub fn access_error(dir: &Path, e: io::Error) -> AccessError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => AccessError::PermissionDenied(dir.to_path_buf()),
        io::ErrorKind::NotFound => AccessError::NotFound(dir.to_path_buf()),
        _ => AccessError::Io {
            path: dir.to_path_buf(),
            source: e,
        },
    }
}
