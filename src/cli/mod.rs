use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "blockboard")]
#[command(about = "Track blocks through workflow stages")]
#[command(long_about = "Blockboard keeps a small board of blocks that move through ordered stages. \
                       Moves are proposed, optionally annotated, and then committed; every move and \
                       note lands in the block's history. Run 'blockboard' to see the board.")]
pub struct Cli {
    /// Configuration file layered over blockboard.toml and the defaults
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the board: visible blocks per stage, selection and pending move
    Board {
        /// Leave out stages with no visible blocks
        #[arg(long)]
        hide_empty: bool,
    },
    /// Create a block in the first stage
    Add {
        /// Name of the new block
        name: String,
    },
    /// Change a block's name
    Rename {
        id: u64,
        /// New name for the block
        name: String,
    },
    /// Delete a block
    Remove { id: u64 },
    /// Select a block for notes and details
    Select { id: u64 },
    /// Show the selected block and its history
    Show,
    /// Append a note to the selected block's history
    Note {
        /// Note text, recorded verbatim
        text: String,
    },
    /// Only show blocks whose name contains TEXT (case-insensitive); no TEXT clears it
    Filter { text: Option<String> },
    /// Propose moving a block to another stage; confirm with 'commit'
    Propose {
        id: u64,
        /// Target stage name, e.g. "In Progress"
        stage: String,
    },
    /// Attach supplementary data to the pending move
    Data { text: String },
    /// Apply the pending move
    Commit,
    /// Drop the pending move
    Cancel,
    /// Propose and commit a move in one step
    Move {
        id: u64,
        stage: String,
        /// Supplementary data recorded with the move
        #[arg(long, short = 'd')]
        data: Option<String>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write the default configuration to blockboard.toml (or --config PATH)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}
