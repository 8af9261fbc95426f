//! Data loading error types.
//!
//! Only the loader can fail. Once a snapshot has been built, every query
//! terminates with a (possibly empty) structured value.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading the insight record files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The configured data directory does not exist.
    #[error("data directory not found: {}", .0.display())]
    MissingDataDir(PathBuf),

    /// A record file could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record file is not valid delimiter-separated text.
    #[error("malformed record file {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    /// The file or directory the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::MissingDataDir(path)
            | LoadError::Read { path, .. }
            | LoadError::Csv { path, .. } => path,
        }
    }
}
