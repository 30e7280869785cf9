// Read-only projections used by presentation layers

use super::errors::BoardError;
use super::types::{Block, BlockId, BoardState, PendingPrompt};

/// One stage's share of the visible blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageColumn<'a> {
    pub stage: &'a str,
    pub blocks: Vec<&'a Block>,
}

/// Resolved view of an open prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove<'a> {
    pub block: &'a Block,
    pub target_stage: &'a str,
    pub supplementary_text: &'a str,
}

/// Blocks whose name contains the filter, ordered by stage position then id.
///
/// Blocks in a stage missing from the stage list sort last; restored states
/// are validated so this only happens on a misconfigured graph.
pub fn visible_blocks(state: &BoardState) -> Vec<&Block> {
    let mut blocks: Vec<&Block> = state
        .blocks
        .iter()
        .filter(|b| b.matches_filter(&state.filter_text))
        .collect();

    blocks.sort_by_key(|b| {
        (
            state.stages.position(&b.stage).unwrap_or(usize::MAX),
            b.id,
        )
    });
    blocks
}

pub fn columns(state: &BoardState) -> Vec<StageColumn<'_>> {
    let visible = visible_blocks(state);
    state
        .stages
        .stages()
        .iter()
        .map(|stage| StageColumn {
            stage,
            blocks: visible.iter().copied().filter(|b| &b.stage == stage).collect(),
        })
        .collect()
}

pub fn selected_block(state: &BoardState) -> Result<Option<&Block>, BoardError> {
    match state.selected_block {
        None => Ok(None),
        Some(id) => state.block(id).map(Some).ok_or(BoardError::BlockNotFound(id)),
    }
}

pub fn pending_move(state: &BoardState) -> Result<Option<PendingMove<'_>>, BoardError> {
    match &state.prompt {
        PendingPrompt::Closed => Ok(None),
        PendingPrompt::Open {
            block_id,
            target_stage,
            supplementary_text,
        } => {
            let block = state
                .block(*block_id)
                .ok_or(BoardError::BlockNotFound(*block_id))?;
            Ok(Some(PendingMove {
                block,
                target_stage,
                supplementary_text,
            }))
        }
    }
}

pub fn allowed_targets(state: &BoardState, block_id: BlockId) -> Result<Vec<&str>, BoardError> {
    let block = state
        .block(block_id)
        .ok_or(BoardError::BlockNotFound(block_id))?;
    Ok(state.stages.targets(&block.stage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::stages::{DONE, IN_PROGRESS, TODO};

    fn mixed_state() -> BoardState {
        let mut state = BoardState::default();
        state.blocks.push(Block::new(BlockId(9), "Write report", TODO));
        state.blocks.push(Block::new(BlockId(5), "Task five", DONE));
        state.blocks.push(Block::new(BlockId(4), "task four", IN_PROGRESS));
        state.next_id = 10;
        state
    }

    #[test]
    fn test_visible_blocks_order_by_stage_then_id() {
        let state = mixed_state();
        let ids: Vec<u64> = visible_blocks(&state).iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![1, 9, 2, 4, 3, 5]);
    }

    #[test]
    fn test_visible_blocks_filters_case_insensitively() {
        let mut state = mixed_state();
        state.filter_text = "task".to_string();
        let ids: Vec<u64> = visible_blocks(&state).iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![1, 2, 4, 3, 5]);

        state.filter_text = "report".to_string();
        let ids: Vec<u64> = visible_blocks(&state).iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![9]);
    }

    #[test]
    fn test_columns_cover_every_stage() {
        let mut state = mixed_state();
        state.filter_text = "report".to_string();
        let columns = columns(&state);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].stage, TODO);
        assert_eq!(columns[0].blocks.len(), 1);
        assert!(columns[1].blocks.is_empty());
        assert!(columns[2].blocks.is_empty());
    }

    #[test]
    fn test_dangling_selection_resolves_to_not_found() {
        let mut state = BoardState::default();
        state.selected_block = Some(BlockId(42));
        assert_eq!(selected_block(&state), Err(BoardError::BlockNotFound(BlockId(42))));

        state.selected_block = None;
        assert_eq!(selected_block(&state), Ok(None));
    }

    #[test]
    fn test_allowed_targets_for_each_sample() {
        let state = BoardState::default();
        assert_eq!(allowed_targets(&state, BlockId(1)).unwrap(), vec![IN_PROGRESS]);
        assert_eq!(allowed_targets(&state, BlockId(2)).unwrap(), vec![TODO, DONE]);
        assert!(allowed_targets(&state, BlockId(3)).unwrap().is_empty());
        assert!(allowed_targets(&state, BlockId(99)).is_err());
    }
}
