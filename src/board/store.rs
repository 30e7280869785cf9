use tracing::debug;

use super::commands::{self, BoardCommand, CommandOutcome};
use super::errors::BoardError;
use super::types::{Block, BlockId, BoardState, PendingPrompt};
use super::view::{self, PendingMove, StageColumn};
use crate::telemetry::command_span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&BoardState)>;

/// Owner of the board state and the only path that mutates it.
///
/// Commands run to completion one at a time. After each command that
/// changed something the version is bumped and every observer sees the
/// new state, in subscription order.
pub struct BoardStore {
    state: BoardState,
    version: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl BoardStore {
    pub fn new(state: BoardState) -> Self {
        Self {
            state,
            version: 0,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&BoardState) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn dispatch(&mut self, command: BoardCommand) -> Result<CommandOutcome, BoardError> {
        let span = command_span(command.name(), command.block_id());
        let _enter = span.enter();

        let outcome = commands::apply(&mut self.state, &command)?;
        if outcome.changed() {
            self.version += 1;
            debug!(version = self.version, observers = self.observers.len(), "Notifying observers");
            for (_, observer) in self.observers.iter_mut() {
                observer(&self.state);
            }
        }
        Ok(outcome)
    }

    pub fn propose_move(&mut self, block_id: BlockId, target_stage: &str) -> Result<CommandOutcome, BoardError> {
        self.dispatch(BoardCommand::ProposeMove {
            block_id,
            target_stage: target_stage.to_string(),
        })
    }

    pub fn set_supplementary_text(&mut self, text: &str) -> Result<CommandOutcome, BoardError> {
        self.dispatch(BoardCommand::SetSupplementaryText {
            text: text.to_string(),
        })
    }

    pub fn commit_move(&mut self) -> Result<CommandOutcome, BoardError> {
        self.dispatch(BoardCommand::CommitMove)
    }

    pub fn cancel_move(&mut self) -> Result<CommandOutcome, BoardError> {
        self.dispatch(BoardCommand::CancelMove)
    }

    /// Creates a block and returns its id.
    pub fn add_item(&mut self, name: &str) -> Result<BlockId, BoardError> {
        match self.dispatch(BoardCommand::AddItem { name: name.to_string() })? {
            CommandOutcome::BlockCreated(id) => Ok(id),
            other => Err(BoardError::InvalidState {
                reason: format!("add produced unexpected outcome {other:?}"),
            }),
        }
    }

    pub fn rename_item(&mut self, block_id: BlockId, new_name: &str) -> Result<CommandOutcome, BoardError> {
        self.dispatch(BoardCommand::RenameItem {
            block_id,
            new_name: new_name.to_string(),
        })
    }

    pub fn remove_item(&mut self, block_id: BlockId) -> Result<CommandOutcome, BoardError> {
        self.dispatch(BoardCommand::RemoveItem { block_id })
    }

    pub fn add_note(&mut self, text: &str) -> Result<CommandOutcome, BoardError> {
        self.dispatch(BoardCommand::AddNote { text: text.to_string() })
    }

    pub fn select_item(&mut self, block_id: BlockId) -> Result<CommandOutcome, BoardError> {
        self.dispatch(BoardCommand::SelectItem { block_id })
    }

    pub fn set_filter(&mut self, text: &str) -> Result<CommandOutcome, BoardError> {
        self.dispatch(BoardCommand::SetFilter { text: text.to_string() })
    }

    pub fn block(&self, block_id: BlockId) -> Option<&Block> {
        self.state.block(block_id)
    }

    pub fn visible_blocks(&self) -> Vec<&Block> {
        view::visible_blocks(&self.state)
    }

    pub fn columns(&self) -> Vec<StageColumn<'_>> {
        view::columns(&self.state)
    }

    pub fn selected_block(&self) -> Result<Option<&Block>, BoardError> {
        view::selected_block(&self.state)
    }

    pub fn prompt(&self) -> &PendingPrompt {
        &self.state.prompt
    }

    pub fn pending_move(&self) -> Result<Option<PendingMove<'_>>, BoardError> {
        view::pending_move(&self.state)
    }

    pub fn allowed_targets(&self, block_id: BlockId) -> Result<Vec<&str>, BoardError> {
        view::allowed_targets(&self.state, block_id)
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(BoardState::default())
    }
}

impl std::fmt::Debug for BoardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardStore")
            .field("state", &self.state)
            .field("version", &self.version)
            .field("observers", &self.observers.len())
            .finish()
    }
}
