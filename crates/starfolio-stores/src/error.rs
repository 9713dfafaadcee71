use std::path::PathBuf;

use thiserror::Error;

/// Failures of the persistence back end.
///
/// Services never surface these to gameplay; they log and keep running on
/// in-memory state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid store key {0:?}")]
    InvalidKey(String),
}
