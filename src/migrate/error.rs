//! Error type at the migrator's filesystem seam.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A failed rename during migration.
///
/// `Vanished` is the benign race where the owning connection finished and
/// removed its drain directory between selection and move; everything else
/// is a real I/O failure worth a warning.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error("destination vanished: {0}")]
    Vanished(PathBuf),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MoveError {
    pub(crate) fn from_rename(err: io::Error, dst: &Path) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            MoveError::Vanished(dst.to_path_buf())
        } else {
            MoveError::Io {
                path: dst.to_path_buf(),
                source: err,
            }
        }
    }
}
