use std::collections::HashMap;
use std::sync::Mutex;

use super::{decode_snapshot, encode_snapshot, PersistenceBridge, PersistenceError};
use crate::board::BoardState;

pub const DEFAULT_KEY: &str = "store";

/// Key/value snapshot storage kept in process memory.
///
/// Holds the serialized JSON exactly as a file or browser store would, so
/// decoding and validation behave the same as for real storage.
#[derive(Debug)]
pub struct MemorySnapshot {
    key: String,
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::with_key(DEFAULT_KEY)
    }

    pub fn with_key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store raw text under the snapshot key, bypassing encoding.
    pub fn put_raw(&self, raw: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(self.key.clone(), raw.into());
    }

    pub fn raw(&self) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&self.key)
            .cloned()
    }
}

impl Default for MemorySnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistenceBridge for MemorySnapshot {
    fn load_snapshot(&self) -> Result<Option<BoardState>, PersistenceError> {
        self.raw().map(|raw| decode_snapshot(&raw)).transpose()
    }

    fn save_snapshot(&self, state: &BoardState) -> Result<(), PersistenceError> {
        let serialized = encode_snapshot(state)?;
        self.put_raw(serialized);
        Ok(())
    }
}
