use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::HIGH_SCORE_KEY;

const APP_DIR_NAME: &str = "color-snake";
const STORAGE_FILE_NAME: &str = "storage.json";

/// Errors from a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("storage file is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Durable string slots keyed by name.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process store; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Slots persisted as one JSON object on disk, rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    slots: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// An unreadable or malformed file is logged and treated as empty; the
    /// next write replaces it.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let slots = load_slots(&path).unwrap_or_else(|error| {
            warn!(%error, path = %path.display(), "ignoring unusable storage file");
            BTreeMap::new()
        });
        Self { path, slots }
    }

    /// Returns the platform-correct default storage path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        base.push(APP_DIR_NAME);
        base.push(STORAGE_FILE_NAME);
        base
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.slots)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_owned(), value.to_owned());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.slots.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

fn load_slots(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.into()),
    };

    Ok(serde_json::from_str(&raw)?)
}

/// High-score record kept in one slot of a [`KeyValueStore`] as a decimal string.
///
/// Backend failures never reach the caller: they are logged and read as
/// "no high score" or "not updated".
#[derive(Debug, Clone)]
pub struct HighScores<K> {
    store: K,
}

impl<K: KeyValueStore> HighScores<K> {
    #[must_use]
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// Returns the stored high score, or 0 when unset or unreadable.
    #[must_use]
    pub fn get_high_score(&self) -> u32 {
        let raw = match self.store.get(HIGH_SCORE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return 0,
            Err(error) => {
                warn!(%error, "failed to read high score");
                return 0;
            }
        };

        raw.trim().parse().unwrap_or_else(|_| {
            warn!(value = %raw, "stored high score is not a number, treating as 0");
            0
        })
    }

    /// Stores `score` if it beats the current high score. Returns whether
    /// the record was updated.
    pub fn set_high_score(&mut self, score: u32) -> bool {
        if score <= self.get_high_score() {
            return false;
        }

        match self.store.set(HIGH_SCORE_KEY, &score.to_string()) {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, score, "failed to persist high score");
                false
            }
        }
    }

    /// Clears the stored high score.
    pub fn reset_high_score(&mut self) {
        match self.store.remove(HIGH_SCORE_KEY) {
            Ok(()) => info!("high score reset"),
            Err(error) => warn!(%error, "failed to reset high score"),
        }
    }

    #[must_use]
    pub fn store(&self) -> &K {
        &self.store
    }
}
