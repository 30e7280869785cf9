// Blockboard Library - workflow board with a persisted, observable store
// This exposes the core components for testing and integration

pub mod board;
pub mod cli;
pub mod config;
pub mod persistence;
pub mod telemetry;

// Re-export key types for easy access
pub use board::{
    Block, BlockId, BoardCommand, BoardError, BoardState, BoardStore, CommandOutcome,
    PendingPrompt, StageGraph, TransitionRule,
};
pub use config::BoardConfig;
pub use persistence::{JsonFileSnapshot, MemorySnapshot, PersistenceBridge, PersistenceError};
pub use telemetry::init_telemetry;
