// Core types for the board state machine

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::errors::BoardError;
use super::stages::{StageGraph, DONE, IN_PROGRESS, TODO};

pub const CREATED_ENTRY: &str = "Created";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BlockId {
    fn from(value: u64) -> Self {
        BlockId(value)
    }
}

/// A tracked item on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub name: String,
    pub stage: String,
    /// Append-only, oldest entry first.
    pub history: Vec<String>,
}

impl Block {
    pub fn new(id: BlockId, name: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            stage: stage.into(),
            history: Vec::new(),
        }
    }

    pub fn matches_filter(&self, lowercase_filter: &str) -> bool {
        self.name.to_lowercase().contains(lowercase_filter)
    }
}

/// A proposed transition waiting for the user to confirm or cancel it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PendingPrompt {
    #[default]
    Closed,
    Open {
        block_id: BlockId,
        target_stage: String,
        supplementary_text: String,
    },
}

impl PendingPrompt {
    pub fn open(block_id: BlockId, target_stage: impl Into<String>) -> Self {
        PendingPrompt::Open {
            block_id,
            target_stage: target_stage.into(),
            supplementary_text: String::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, PendingPrompt::Open { .. })
    }

    pub fn block_id(&self) -> Option<BlockId> {
        match self {
            PendingPrompt::Open { block_id, .. } => Some(*block_id),
            PendingPrompt::Closed => None,
        }
    }

    pub fn target_stage(&self) -> Option<&str> {
        match self {
            PendingPrompt::Open { target_stage, .. } => Some(target_stage),
            PendingPrompt::Closed => None,
        }
    }

    pub fn supplementary_text(&self) -> &str {
        match self {
            PendingPrompt::Open {
                supplementary_text, ..
            } => supplementary_text,
            PendingPrompt::Closed => "",
        }
    }
}

/// The whole store: what gets snapshotted and restored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub blocks: Vec<Block>,
    pub stages: StageGraph,
    /// Always stored lowercase.
    pub filter_text: String,
    /// Weak reference, resolved at read time.
    pub selected_block: Option<BlockId>,
    pub prompt: PendingPrompt,
    pub next_id: u64,
}

impl BoardState {
    pub fn empty(stages: StageGraph) -> Self {
        Self {
            blocks: Vec::new(),
            stages,
            filter_text: String::new(),
            selected_block: None,
            prompt: PendingPrompt::Closed,
            next_id: 1,
        }
    }

    /// The board a first run starts with: one sample block per default stage.
    ///
    /// Samples are placed into the given graph's stages by name when present,
    /// otherwise into its initial stage.
    pub fn with_samples(stages: StageGraph) -> Self {
        let mut state = Self::empty(stages);
        for (n, preferred) in [TODO, IN_PROGRESS, DONE].into_iter().enumerate() {
            let stage = if state.stages.contains(preferred) {
                preferred.to_string()
            } else {
                state.stages.initial_stage().to_string()
            };
            let id = BlockId(n as u64 + 1);
            state.blocks.push(Block::new(id, format!("Task {}", id), stage));
        }
        state.next_id = 4;
        state
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Hands out the next id: never reused, never colliding with a live block.
    ///
    /// Fails without touching the counter once the id space is used up.
    pub fn allocate_id(&mut self) -> Result<BlockId, BoardError> {
        let exhausted = || invalid("block ids are exhausted".to_string());
        let max_live = self.blocks.iter().map(|b| b.id.0).max().unwrap_or(0);
        let id = self.next_id.max(max_live.checked_add(1).ok_or_else(exhausted)?);
        self.next_id = id.checked_add(1).ok_or_else(exhausted)?;
        Ok(BlockId(id))
    }

    /// Structural checks applied to restored snapshots.
    pub fn validate(&self) -> Result<(), BoardError> {
        self.stages.validate()?;

        let mut ids = BTreeSet::new();
        for block in &self.blocks {
            if !ids.insert(block.id) {
                return Err(invalid(format!("duplicate block id {}", block.id)));
            }
            if block.name.trim().is_empty() {
                return Err(invalid(format!("block {} has an empty name", block.id)));
            }
            if !self.stages.contains(&block.stage) {
                return Err(invalid(format!(
                    "block {} is in unknown stage '{}'",
                    block.id, block.stage
                )));
            }
            if block.id.0 >= self.next_id {
                return Err(invalid(format!(
                    "next_id {} does not exceed block id {}",
                    self.next_id, block.id
                )));
            }
        }

        if self.filter_text != self.filter_text.to_lowercase() {
            return Err(invalid("filter text is not lowercase".to_string()));
        }

        if let Some(target) = self.prompt.target_stage() {
            if !self.stages.contains(target) {
                return Err(invalid(format!("pending move targets unknown stage '{target}'")));
            }
        }

        Ok(())
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::with_samples(StageGraph::default())
    }
}

fn invalid(reason: String) -> BoardError {
    BoardError::InvalidState { reason }
}
