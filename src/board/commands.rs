// Board commands - the closed set of mutations and the reducer that applies them
//
// Every command validates completely before touching the state, so an Err
// always means the state is exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::errors::BoardError;
use super::stages::StageGraph;
use super::types::{Block, BlockId, BoardState, PendingPrompt, CREATED_ENTRY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardCommand {
    ProposeMove { block_id: BlockId, target_stage: String },
    SetSupplementaryText { text: String },
    CommitMove,
    CancelMove,
    AddItem { name: String },
    RenameItem { block_id: BlockId, new_name: String },
    RemoveItem { block_id: BlockId },
    AddNote { text: String },
    SelectItem { block_id: BlockId },
    SetFilter { text: String },
}

impl BoardCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BoardCommand::ProposeMove { .. } => "propose_move",
            BoardCommand::SetSupplementaryText { .. } => "set_supplementary_text",
            BoardCommand::CommitMove => "commit_move",
            BoardCommand::CancelMove => "cancel_move",
            BoardCommand::AddItem { .. } => "add_item",
            BoardCommand::RenameItem { .. } => "rename_item",
            BoardCommand::RemoveItem { .. } => "remove_item",
            BoardCommand::AddNote { .. } => "add_note",
            BoardCommand::SelectItem { .. } => "select_item",
            BoardCommand::SetFilter { .. } => "set_filter",
        }
    }

    /// The block a command addresses directly, if any.
    pub fn block_id(&self) -> Option<BlockId> {
        match self {
            BoardCommand::ProposeMove { block_id, .. }
            | BoardCommand::RenameItem { block_id, .. }
            | BoardCommand::RemoveItem { block_id }
            | BoardCommand::SelectItem { block_id } => Some(*block_id),
            _ => None,
        }
    }
}

/// What a successful command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    MoveProposed { block_id: BlockId, target_stage: String },
    PromptUpdated,
    MoveCommitted { block_id: BlockId, from: String, to: String },
    MoveCancelled,
    BlockCreated(BlockId),
    BlockRenamed(BlockId),
    BlockRemoved(BlockId),
    NoteAdded(BlockId),
    SelectionChanged(BlockId),
    FilterChanged,
    /// Accepted, but nothing to do.
    Unchanged,
}

impl CommandOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, CommandOutcome::Unchanged)
    }
}

/// History line recorded when a move is committed.
pub fn move_entry(target_stage: &str, supplementary_text: &str) -> String {
    if supplementary_text.is_empty() {
        format!("Moved to {target_stage}")
    } else {
        format!("Moved to {target_stage} with data: {supplementary_text}")
    }
}

pub fn apply(state: &mut BoardState, command: &BoardCommand) -> Result<CommandOutcome, BoardError> {
    let result = match command {
        BoardCommand::ProposeMove { block_id, target_stage } => {
            propose_move(state, *block_id, target_stage)
        }
        BoardCommand::SetSupplementaryText { text } => Ok(set_supplementary_text(state, text)),
        BoardCommand::CommitMove => commit_move(state),
        BoardCommand::CancelMove => Ok(cancel_move(state)),
        BoardCommand::AddItem { name } => add_item(state, name),
        BoardCommand::RenameItem { block_id, new_name } => rename_item(state, *block_id, new_name),
        BoardCommand::RemoveItem { block_id } => remove_item(state, *block_id),
        BoardCommand::AddNote { text } => add_note(state, text),
        BoardCommand::SelectItem { block_id } => {
            state.selected_block = Some(*block_id);
            Ok(CommandOutcome::SelectionChanged(*block_id))
        }
        BoardCommand::SetFilter { text } => {
            state.filter_text = text.to_lowercase();
            Ok(CommandOutcome::FilterChanged)
        }
    };

    if let Err(e) = &result {
        warn!(command = command.name(), error = %e, "Board command rejected");
    }
    result
}

/// Checks that `block` may move to `target_stage`, returning its current stage.
fn check_transition(stages: &StageGraph, block: &Block, target_stage: &str) -> Result<String, BoardError> {
    if !stages.can_transition(&block.stage, target_stage) {
        return Err(BoardError::InvalidTransition {
            block_id: block.id,
            from: block.stage.clone(),
            to: target_stage.to_string(),
        });
    }
    Ok(block.stage.clone())
}

fn propose_move(state: &mut BoardState, block_id: BlockId, target_stage: &str) -> Result<CommandOutcome, BoardError> {
    if let PendingPrompt::Open { block_id: pending, target_stage: pending_stage, .. } = &state.prompt {
        return Err(BoardError::MoveAlreadyPending {
            block_id: *pending,
            target_stage: pending_stage.clone(),
        });
    }

    let block = state
        .block(block_id)
        .ok_or_else(|| BoardError::UnknownBlockTransition {
            block_id,
            to: target_stage.to_string(),
        })?;
    let from = check_transition(&state.stages, block, target_stage)?;
    state.prompt = PendingPrompt::open(block_id, target_stage);
    info!(block_id = %block_id, from = %from, to = %target_stage, "Move proposed");
    Ok(CommandOutcome::MoveProposed {
        block_id,
        target_stage: target_stage.to_string(),
    })
}

fn set_supplementary_text(state: &mut BoardState, text: &str) -> CommandOutcome {
    match &mut state.prompt {
        PendingPrompt::Open { supplementary_text, .. } => {
            *supplementary_text = text.to_string();
            CommandOutcome::PromptUpdated
        }
        PendingPrompt::Closed => CommandOutcome::Unchanged,
    }
}

fn commit_move(state: &mut BoardState) -> Result<CommandOutcome, BoardError> {
    let (block_id, target_stage, supplementary_text) = match &state.prompt {
        PendingPrompt::Open { block_id, target_stage, supplementary_text } => {
            (*block_id, target_stage.clone(), supplementary_text.clone())
        }
        PendingPrompt::Closed => return Err(BoardError::NoPendingMove),
    };

    // The graph and block may have changed since the proposal
    let block = state.block(block_id).ok_or(BoardError::BlockNotFound(block_id))?;
    let from = check_transition(&state.stages, block, &target_stage)?;

    if let Some(block) = state.block_mut(block_id) {
        block.stage = target_stage.clone();
        block.history.push(move_entry(&target_stage, &supplementary_text));
    }
    state.prompt = PendingPrompt::Closed;

    info!(
        block_id = %block_id,
        from = %from,
        to = %target_stage,
        with_data = !supplementary_text.is_empty(),
        "Move committed"
    );
    Ok(CommandOutcome::MoveCommitted {
        block_id,
        from,
        to: target_stage,
    })
}

fn cancel_move(state: &mut BoardState) -> CommandOutcome {
    match std::mem::take(&mut state.prompt) {
        PendingPrompt::Open { block_id, target_stage, .. } => {
            info!(block_id = %block_id, to = %target_stage, "Move cancelled");
            CommandOutcome::MoveCancelled
        }
        PendingPrompt::Closed => CommandOutcome::Unchanged,
    }
}

fn add_item(state: &mut BoardState, name: &str) -> Result<CommandOutcome, BoardError> {
    if name.trim().is_empty() {
        return Err(BoardError::EmptyName { action: "Add" });
    }

    let id = state.allocate_id()?;
    let mut block = Block::new(id, name, state.stages.initial_stage());
    block.history.push(CREATED_ENTRY.to_string());
    info!(block_id = %id, name = %name, stage = %block.stage, "Block created");
    state.blocks.push(block);
    Ok(CommandOutcome::BlockCreated(id))
}

fn rename_item(state: &mut BoardState, block_id: BlockId, new_name: &str) -> Result<CommandOutcome, BoardError> {
    if new_name.trim().is_empty() {
        return Err(BoardError::EmptyName { action: "Rename" });
    }

    let block = state.block_mut(block_id).ok_or(BoardError::BlockNotFound(block_id))?;
    block.name = new_name.to_string();
    info!(block_id = %block_id, name = %new_name, "Block renamed");
    Ok(CommandOutcome::BlockRenamed(block_id))
}

fn remove_item(state: &mut BoardState, block_id: BlockId) -> Result<CommandOutcome, BoardError> {
    if state.block(block_id).is_none() {
        return Err(BoardError::BlockNotFound(block_id));
    }

    state.blocks.retain(|b| b.id != block_id);
    if state.selected_block == Some(block_id) {
        state.selected_block = None;
    }
    info!(block_id = %block_id, "Block removed");
    Ok(CommandOutcome::BlockRemoved(block_id))
}

fn add_note(state: &mut BoardState, text: &str) -> Result<CommandOutcome, BoardError> {
    let block_id = state.selected_block.ok_or(BoardError::NothingSelected)?;
    let block = state.block_mut(block_id).ok_or(BoardError::BlockNotFound(block_id))?;
    block.history.push(text.to_string());
    info!(block_id = %block_id, "Note added");
    Ok(CommandOutcome::NoteAdded(block_id))
}
