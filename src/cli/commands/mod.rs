use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::board::{BoardError, BoardState, BoardStore, StageGraph};
use crate::config::BoardConfig;
use crate::persistence::{self, BoardLock, JsonFileSnapshot};

use super::{Cli, Commands};

pub mod board;
pub mod items;
pub mod moves;
pub mod settings;

/// Process exit status when the board rejected the command (bad name, illegal move).
pub const REJECTED_EXIT_CODE: i32 = 3;

pub trait Command {
    fn execute(&self, store: &mut BoardStore) -> Result<()>;
}

/// True when `error` is a board validation rejection rather than an
/// environment failure (config, lock, I/O).
pub fn is_rejection(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<BoardError>()
        .is_some_and(BoardError::is_validation)
}

/// Run one CLI invocation against the configured board.
pub fn run(cli: Cli, config: &BoardConfig) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Board { hide_empty: false });

    if let Commands::Config { action } = command {
        return settings::ConfigCommand::new(action, cli.config).execute(config);
    }

    let graph = config.workflow.stage_graph()?;
    with_board(config, &graph, |store| dispatch(command, store))
}

/// Open the board for the duration of `f`: lock, restore, save on change.
pub fn with_board<F, R>(config: &BoardConfig, graph: &StageGraph, f: F) -> Result<R>
where
    F: FnOnce(&mut BoardStore) -> Result<R>,
{
    if !config.storage.enabled {
        let mut store = BoardStore::new(BoardState::with_samples(graph.clone()));
        return f(&mut store);
    }

    let snapshot = JsonFileSnapshot::new(&config.storage.snapshot_path);
    let mut lock = BoardLock::open(snapshot.lock_path())?;
    let timeout = Duration::from_millis(config.storage.lock_timeout_ms);

    lock.with_exclusive(timeout, || {
        let mut store = persistence::open_store(Arc::new(snapshot), graph);
        f(&mut store)
    })?
}

fn dispatch(command: Commands, store: &mut BoardStore) -> Result<()> {
    match command {
        Commands::Board { hide_empty } => board::BoardView::new()
            .with_empty_stages(!hide_empty)
            .execute(store),
        Commands::Show => board::ShowSelected.execute(store),
        Commands::Add { name } => items::AddCommand::new(name).execute(store),
        Commands::Rename { id, name } => items::RenameCommand::new(id, name).execute(store),
        Commands::Remove { id } => items::RemoveCommand::new(id).execute(store),
        Commands::Select { id } => items::SelectCommand::new(id).execute(store),
        Commands::Note { text } => items::NoteCommand::new(text).execute(store),
        Commands::Filter { text } => items::FilterCommand::new(text).execute(store),
        Commands::Propose { id, stage } => moves::ProposeCommand::new(id, stage).execute(store),
        Commands::Data { text } => moves::DataCommand::new(text).execute(store),
        Commands::Commit => moves::CommitCommand.execute(store),
        Commands::Cancel => moves::CancelCommand.execute(store),
        Commands::Move { id, stage, data } => moves::MoveCommand::new(id, stage)
            .with_data(data)
            .execute(store),
        // handled in run()
        Commands::Config { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BlockId;

    #[test]
    fn test_validation_errors_are_rejections() {
        let mut store = BoardStore::default();

        let illegal = anyhow::Error::from(store.propose_move(BlockId(3), "To Do").unwrap_err());
        assert!(is_rejection(&illegal));

        let missing = anyhow::Error::from(store.propose_move(BlockId(99), "Done").unwrap_err());
        assert!(is_rejection(&missing));

        let unselected = anyhow::Error::from(store.add_note("note").unwrap_err());
        assert!(!is_rejection(&unselected));
        assert!(!is_rejection(&anyhow::anyhow!("lock timed out")));
    }
}
