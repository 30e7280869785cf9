use anyhow::Result;

use super::Command;
use crate::board::{BlockId, BoardStore, CommandOutcome};

pub struct ProposeCommand {
    pub id: BlockId,
    pub stage: String,
}

impl ProposeCommand {
    pub fn new(id: u64, stage: String) -> Self {
        Self { id: BlockId(id), stage }
    }
}

impl Command for ProposeCommand {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        store.propose_move(self.id, &self.stage)?;
        println!("⏳ Move of #{} to {} is waiting for confirmation", self.id, self.stage);
        println!("   💡 blockboard data <text> | blockboard commit | blockboard cancel");
        Ok(())
    }
}

pub struct DataCommand {
    pub text: String,
}

impl DataCommand {
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

impl Command for DataCommand {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        match store.set_supplementary_text(&self.text)? {
            CommandOutcome::Unchanged => println!("ℹ️  No move is pending, nothing to attach data to"),
            _ => println!("📎 Data attached to the pending move"),
        }
        Ok(())
    }
}

pub struct CommitCommand;

impl Command for CommitCommand {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        if let CommandOutcome::MoveCommitted { block_id, from, to } = store.commit_move()? {
            println!("✅ Moved #{} from {} to {}", block_id, from, to);
        }
        Ok(())
    }
}

pub struct CancelCommand;

impl Command for CancelCommand {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        match store.cancel_move()? {
            CommandOutcome::MoveCancelled => println!("↩️  Pending move cancelled"),
            _ => println!("ℹ️  No move was pending"),
        }
        Ok(())
    }
}

/// Propose, annotate and commit in one go.
pub struct MoveCommand {
    pub id: BlockId,
    pub stage: String,
    pub data: Option<String>,
}

impl MoveCommand {
    pub fn new(id: u64, stage: String) -> Self {
        Self {
            id: BlockId(id),
            stage,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Option<String>) -> Self {
        self.data = data;
        self
    }
}

impl Command for MoveCommand {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        store.propose_move(self.id, &self.stage)?;
        if let Some(data) = &self.data {
            store.set_supplementary_text(data)?;
        }
        CommitCommand.execute(store)
    }
}
