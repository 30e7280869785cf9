use anyhow::Result;

use super::Command;
use crate::board::{BoardError, BoardStore};

pub struct BoardView {
    pub show_empty_stages: bool,
}

impl BoardView {
    pub fn new() -> Self {
        Self {
            show_empty_stages: true,
        }
    }

    pub fn with_empty_stages(mut self, show_empty_stages: bool) -> Self {
        self.show_empty_stages = show_empty_stages;
        self
    }
}

impl Default for BoardView {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for BoardView {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        print!("{}", render_board(store, self.show_empty_stages));
        Ok(())
    }
}

/// Selected block with its full history.
pub struct ShowSelected;

impl Command for ShowSelected {
    fn execute(&self, store: &mut BoardStore) -> Result<()> {
        match store.selected_block() {
            Ok(Some(block)) => {
                println!("📌 #{} {}", block.id, block.name);
                println!("   Current Stage: {}", block.stage);
                println!("   History:");
                if block.history.is_empty() {
                    println!("     (no entries yet)");
                }
                for (n, entry) in block.history.iter().enumerate() {
                    println!("     {}. {}", n + 1, entry);
                }
                Ok(())
            }
            Ok(None) => Err(BoardError::NothingSelected.into()),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn render_board(store: &BoardStore, show_empty_stages: bool) -> String {
    let mut out = String::new();
    let state = store.state();
    let selected = state.selected_block;

    out.push_str("📋 BLOCKBOARD\n");
    if !state.filter_text.is_empty() {
        out.push_str(&format!("🔍 Filter: \"{}\"\n", state.filter_text));
    }

    for column in store.columns() {
        if column.blocks.is_empty() && !show_empty_stages {
            continue;
        }
        out.push_str(&format!("\n▶ {} ({})\n", column.stage, column.blocks.len()));
        for block in column.blocks {
            let marker = if selected == Some(block.id) { " ⭐" } else { "" };
            out.push_str(&format!("   #{} {}{}\n", block.id, block.name, marker));
        }
    }

    match store.pending_move() {
        Ok(Some(pending)) => {
            out.push_str(&format!(
                "\n⏳ Pending move: #{} {} → {}\n",
                pending.block.id, pending.block.name, pending.target_stage
            ));
            if !pending.supplementary_text.is_empty() {
                out.push_str(&format!("   Data: {}\n", pending.supplementary_text));
            }
            out.push_str("   💡 blockboard data <text> | blockboard commit | blockboard cancel\n");
        }
        Ok(None) => {}
        Err(e) => {
            out.push_str(&format!("\n⚠️  Pending move is stale: {e}\n"));
            out.push_str("   💡 blockboard cancel\n");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BlockId;

    #[test]
    fn test_render_lists_every_stage_in_order() {
        let store = BoardStore::default();
        let rendered = render_board(&store, true);

        let todo = rendered.find("▶ To Do (1)").unwrap();
        let doing = rendered.find("▶ In Progress (1)").unwrap();
        let done = rendered.find("▶ Done (1)").unwrap();
        assert!(todo < doing && doing < done);
        assert!(rendered.contains("#1 Task 1"));
        assert!(!rendered.contains("Pending move"));
    }

    #[test]
    fn test_render_marks_selection_and_pending_move() {
        let mut store = BoardStore::default();
        store.select_item(BlockId(2)).unwrap();
        store.propose_move(BlockId(2), "Done").unwrap();
        store.set_supplementary_text("reviewed").unwrap();

        let rendered = render_board(&store, true);
        assert!(rendered.contains("#2 Task 2 ⭐"));
        assert!(rendered.contains("⏳ Pending move: #2 Task 2 → Done"));
        assert!(rendered.contains("Data: reviewed"));
    }

    #[test]
    fn test_render_hides_empty_stages_when_asked() {
        let mut store = BoardStore::default();
        store.set_filter("task 1").unwrap();

        let rendered = render_board(&store, false);
        assert!(rendered.contains("🔍 Filter: \"task 1\""));
        assert!(rendered.contains("▶ To Do (1)"));
        assert!(!rendered.contains("▶ Done"));
    }
}
