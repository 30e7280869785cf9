// Persistence bridge - seeds the store at startup and receives every new state
//
// Nothing in the board depends on persistence succeeding: load failures fall
// back to the default board, save failures are logged and dropped.

pub mod file;
pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::automock;

use crate::board::{BoardState, BoardStore, StageGraph, SubscriptionId};

pub use file::{BoardLock, JsonFileSnapshot};
pub use memory::MemorySnapshot;

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Errors that can occur while reading or writing snapshots
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Snapshot format mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Snapshot rejected: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("Lock acquisition failed: {reason}")]
    Lock { reason: String },
}

/// On-disk wrapper around a board state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    pub format_version: u32,
    pub saved_at: DateTime<Utc>,
    pub state: BoardState,
}

impl SnapshotEnvelope {
    pub fn new(state: BoardState) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            saved_at: Utc::now(),
            state,
        }
    }
}

/// Serialize a board state into the snapshot wire format.
pub fn encode_snapshot(state: &BoardState) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(&SnapshotEnvelope::new(state.clone()))?)
}

/// Parse and check a snapshot. Any structural problem rejects the whole thing.
pub fn decode_snapshot(raw: &str) -> Result<BoardState, PersistenceError> {
    let envelope: SnapshotEnvelope = serde_json::from_str(raw)?;

    if envelope.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(PersistenceError::VersionMismatch {
            expected: SNAPSHOT_FORMAT_VERSION,
            found: envelope.format_version,
        });
    }

    envelope
        .state
        .validate()
        .map_err(|e| PersistenceError::InvalidSnapshot { reason: e.to_string() })?;

    debug!(saved_at = %envelope.saved_at, blocks = envelope.state.blocks.len(), "Snapshot decoded");
    Ok(envelope.state)
}

/// Storage adapter the board is seeded from and saved to
#[cfg_attr(test, automock)]
pub trait PersistenceBridge {
    /// `Ok(None)` when nothing has been saved yet.
    fn load_snapshot(&self) -> Result<Option<BoardState>, PersistenceError>;

    fn save_snapshot(&self, state: &BoardState) -> Result<(), PersistenceError>;
}

/// The state a session starts from: the stored snapshot when there is a
/// usable one, otherwise the sample board over `default_graph`.
pub fn restore_or_default(bridge: &dyn PersistenceBridge, default_graph: &StageGraph) -> BoardState {
    match bridge.load_snapshot() {
        Ok(Some(state)) => {
            info!(blocks = state.blocks.len(), "Board restored from snapshot");
            state
        }
        Ok(None) => {
            info!("No snapshot found, starting with the default board");
            BoardState::with_samples(default_graph.clone())
        }
        Err(e) => {
            warn!(error = %e, "Failed to load snapshot, starting with the default board");
            BoardState::with_samples(default_graph.clone())
        }
    }
}

/// Save the board after every successful command. Failures are logged only.
pub fn attach(store: &mut BoardStore, bridge: Arc<dyn PersistenceBridge>) -> SubscriptionId {
    store.subscribe(move |state| {
        if let Err(e) = bridge.save_snapshot(state) {
            warn!(error = %e, "Failed to save snapshot");
        }
    })
}

/// Restore a store from `bridge` and keep it saved there.
pub fn open_store(bridge: Arc<dyn PersistenceBridge>, default_graph: &StageGraph) -> BoardStore {
    let mut store = BoardStore::new(restore_or_default(bridge.as_ref(), default_graph));
    attach(&mut store, bridge);
    store
}
