//! Keyed, versioned persistence for service state.
//!
//! Each service owns one key and one schema version. Blobs are JSON objects
//! of the form `{"version": N, "state": {...}}`; a blob with a different
//! version is discarded and the service starts from defaults.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Raw key/value back end.
pub trait StateStore {
    /// The blob stored under `key`, or `None` if nothing was saved yet.
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the blob stored under `key`.
    fn save_raw(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StateStore for FileStateStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn save_raw(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(&path, blob).map_err(|source| StoreError::Write { path, source })
    }
}

/// In-process back end for tests and for running without a data directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    blobs: FxHashMap<String, String>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save_raw(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.blobs.insert(key.to_owned(), blob.to_owned());
        Ok(())
    }
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    version: u32,
    state: &'a T,
}

#[derive(serde::Deserialize)]
struct EnvelopeIn<T> {
    version: u32,
    state: T,
}

#[derive(serde::Deserialize)]
struct VersionOnly {
    version: u32,
}

/// Load the state saved under `key`.
///
/// Missing blobs, read failures, version mismatches and malformed JSON all
/// yield `None`; the last three are logged.
pub fn load_versioned<T: DeserializeOwned>(
    store: &dyn StateStore,
    key: &str,
    version: u32,
) -> Option<T> {
    let blob = match store.load_raw(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            debug!(key, "no saved state");
            return None;
        }
        Err(e) => {
            warn!(key, "could not load saved state: {e}");
            return None;
        }
    };
    match serde_json::from_str::<VersionOnly>(&blob) {
        Ok(v) if v.version != version => {
            warn!(key, found = v.version, expected = version, "saved state version mismatch; using defaults");
            return None;
        }
        Ok(_) => {}
        Err(e) => {
            warn!(key, "malformed saved state: {e}; using defaults");
            return None;
        }
    }
    match serde_json::from_str::<EnvelopeIn<T>>(&blob) {
        Ok(envelope) => Some(envelope.state),
        Err(e) => {
            warn!(key, "malformed saved state: {e}; using defaults");
            None
        }
    }
}

/// Save `state` under `key` with its schema `version`.
pub fn save_versioned<T: Serialize>(
    store: &mut dyn StateStore,
    key: &str,
    version: u32,
    state: &T,
) -> Result<(), StoreError> {
    let blob = serde_json::to_string_pretty(&EnvelopeOut { version, state })
        .map_err(StoreError::Encode)?;
    store.save_raw(key, &blob)
}
