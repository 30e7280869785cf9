use anyhow::Result;

use super::Command;
use crate::board::{BlockId, BoardStore};

pub struct AddCommand {
    pub name: String,
}

impl AddCommand {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

impl Command for AddCommand {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        let id = store.add_item(&self.name)?;
        let stage = store.block(id).map(|b| b.stage.as_str()).unwrap_or_default();
        println!("✅ Created #{} {} in {}", id, self.name, stage);
        Ok(())
    }
}

pub struct RenameCommand {
    pub id: BlockId,
    pub name: String,
}

impl RenameCommand {
    pub fn new(id: u64, name: String) -> Self {
        Self { id: BlockId(id), name }
    }
}

impl Command for RenameCommand {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        store.rename_item(self.id, &self.name)?;
        println!("✏️  Renamed #{} to {}", self.id, self.name);
        Ok(())
    }
}

pub struct RemoveCommand {
    pub id: BlockId,
}

impl RemoveCommand {
    pub fn new(id: u64) -> Self {
        Self { id: BlockId(id) }
    }
}

impl Command for RemoveCommand {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        store.remove_item(self.id)?;
        println!("🗑️  Removed #{}", self.id);
        Ok(())
    }
}

pub struct SelectCommand {
    pub id: BlockId,
}

impl SelectCommand {
    pub fn new(id: u64) -> Self {
        Self { id: BlockId(id) }
    }
}

impl Command for SelectCommand {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        store.select_item(self.id)?;
        match store.block(self.id) {
            Some(block) => println!("⭐ Selected #{} {}", block.id, block.name),
            None => println!("⭐ Selected #{} (no such block right now)", self.id),
        }
        Ok(())
    }
}

pub struct NoteCommand {
    pub text: String,
}

impl NoteCommand {
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

impl Command for NoteCommand {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        store.add_note(&self.text)?;
        if let Ok(Some(block)) = store.selected_block() {
            println!("📝 Note added to #{} {}", block.id, block.name);
        }
        Ok(())
    }
}

pub struct FilterCommand {
    pub text: Option<String>,
}

impl FilterCommand {
    pub fn new(text: Option<String>) -> Self {
        Self { text }
    }
}

impl Command for FilterCommand {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        let text = self.text.as_deref().unwrap_or_default();
        store.set_filter(text)?;
        if text.is_empty() {
            println!("🔍 Filter cleared");
        } else {
            println!(
                "🔍 Filter set to \"{}\" ({} visible)",
                store.state().filter_text,
                store.visible_blocks().len()
            );
        }
        Ok(())
    }
}
