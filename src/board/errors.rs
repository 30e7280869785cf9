use thiserror::Error;

use super::types::BlockId;

/// Reported rejections for board commands.
///
/// A command that returns one of these left the board untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("{action} failed: block name cannot be empty")]
    EmptyName { action: &'static str },

    #[error("Invalid transition from {from} to {to} for block {block_id}")]
    InvalidTransition {
        block_id: BlockId,
        from: String,
        to: String,
    },

    #[error("Invalid transition from (no such block) to {to} for block {block_id}")]
    UnknownBlockTransition { block_id: BlockId, to: String },

    #[error("Block {0} not found")]
    BlockNotFound(BlockId),

    #[error("No block is selected")]
    NothingSelected,

    #[error("No move is pending confirmation")]
    NoPendingMove,

    #[error("A move of block {block_id} to {target_stage} is already pending confirmation")]
    MoveAlreadyPending {
        block_id: BlockId,
        target_stage: String,
    },

    #[error("Invalid stage graph: {reason}")]
    InvalidStageGraph { reason: String },

    #[error("Invalid board state: {reason}")]
    InvalidState { reason: String },
}

impl BoardError {
    /// True for the user-facing validation class (names, transitions),
    /// as opposed to reference or configuration problems.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BoardError::EmptyName { .. }
                | BoardError::InvalidTransition { .. }
                | BoardError::UnknownBlockTransition { .. }
        )
    }
}
