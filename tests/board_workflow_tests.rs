//! Integration tests for the board workflow through the public API
//!
//! These walk the propose/confirm/commit flow, the selection and filter
//! rules, and persistence through an in-memory bridge, the way a
//! presentation layer would drive the store.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use blockboard::persistence::{self, open_store};
use blockboard::{
    BlockId, BoardError, BoardState, BoardStore, MemorySnapshot, PendingPrompt,
    PersistenceBridge, StageGraph, TransitionRule,
};

fn sample_store() -> BoardStore {
    BoardStore::new(BoardState::default())
}

#[test]
fn test_documented_move_scenario() {
    let mut store = sample_store();

    store.propose_move(BlockId(1), "In Progress").unwrap();
    assert_eq!(
        *store.prompt(),
        PendingPrompt::Open {
            block_id: BlockId(1),
            target_stage: "In Progress".to_string(),
            supplementary_text: String::new(),
        }
    );

    store.set_supplementary_text("ok").unwrap();
    store.commit_move().unwrap();

    let block = store.block(BlockId(1)).unwrap();
    assert_eq!(block.stage, "In Progress");
    assert_eq!(block.history, vec!["Moved to In Progress with data: ok"]);
}

#[test]
fn test_full_lifecycle_to_done() {
    let mut store = sample_store();
    let id = store.add_item("Write release notes").unwrap();

    store.propose_move(id, "In Progress").unwrap();
    store.commit_move().unwrap();
    store.propose_move(id, "To Do").unwrap();
    store.set_supplementary_text("blocked on review").unwrap();
    store.commit_move().unwrap();
    store.propose_move(id, "In Progress").unwrap();
    store.commit_move().unwrap();
    store.propose_move(id, "Done").unwrap();
    store.commit_move().unwrap();

    assert_eq!(
        store.block(id).unwrap().history,
        vec![
            "Created",
            "Moved to In Progress",
            "Moved to To Do with data: blocked on review",
            "Moved to In Progress",
            "Moved to Done",
        ]
    );
    assert!(store.allowed_targets(id).unwrap().is_empty());
}

#[test]
fn test_illegal_moves_never_open_prompt() {
    let mut store = sample_store();
    let before = store.state().clone();

    for (id, target) in [(1, "Done"), (1, "To Do"), (3, "In Progress"), (3, "Done")] {
        let err = store.propose_move(BlockId(id), target).unwrap_err();
        assert!(matches!(err, BoardError::InvalidTransition { .. }));
    }

    assert_eq!(*store.state(), before);
    assert_eq!(store.version(), 0);
}

#[test]
fn test_visible_blocks_order_after_moves() {
    let mut store = sample_store();
    let four = store.add_item("Task 4").unwrap();
    store.propose_move(BlockId(2), "Done").unwrap();
    store.commit_move().unwrap();

    let order: Vec<(String, u64)> = store
        .visible_blocks()
        .iter()
        .map(|b| (b.stage.clone(), b.id.0))
        .collect();
    assert_eq!(
        order,
        vec![
            ("To Do".to_string(), 1),
            ("To Do".to_string(), four.0),
            ("Done".to_string(), 2),
            ("Done".to_string(), 3),
        ]
    );
}

#[test]
fn test_custom_stage_graph() {
    let graph = StageGraph::new(
        vec!["Backlog".into(), "Review".into(), "Shipped".into()],
        &[
            TransitionRule::new("Backlog", &["Review"]),
            TransitionRule::new("Review", &["Shipped", "Backlog"]),
        ],
    )
    .unwrap();

    let mut store = BoardStore::new(BoardState::empty(graph));
    let id = store.add_item("Audit").unwrap();
    assert_eq!(store.block(id).unwrap().stage, "Backlog");

    assert!(store.propose_move(id, "Shipped").is_err());
    store.propose_move(id, "Review").unwrap();
    store.commit_move().unwrap();
    assert_eq!(store.allowed_targets(id).unwrap(), vec!["Backlog", "Shipped"]);
}

#[test]
fn test_observer_receives_every_change() {
    let mut store = sample_store();
    let versions = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&versions);
    store.subscribe(move |state| seen.borrow_mut().push(state.prompt.is_visible()));

    store.propose_move(BlockId(2), "Done").unwrap();
    store.set_supplementary_text("done").unwrap();
    store.commit_move().unwrap();

    assert_eq!(*versions.borrow(), vec![true, true, false]);
    assert_eq!(store.version(), 3);
}

#[test]
fn test_memory_bridge_survives_restart() {
    let bridge = Arc::new(MemorySnapshot::new());
    let graph = StageGraph::default();

    {
        let mut store = open_store(bridge.clone(), &graph);
        store.remove_item(BlockId(3)).unwrap();
        let id = store.add_item("Task 4").unwrap();
        store.select_item(id).unwrap();
        store.add_note("first note").unwrap();
        store.set_filter("TASK").unwrap();
        store.propose_move(BlockId(1), "In Progress").unwrap();
        store.set_supplementary_text("halfway").unwrap();
    }

    let restored = open_store(bridge.clone(), &graph);
    let state = restored.state();
    assert_eq!(state.blocks.len(), 3);
    assert!(state.block(BlockId(3)).is_none());
    assert_eq!(state.filter_text, "task");
    assert_eq!(state.prompt.supplementary_text(), "halfway");

    let selected = restored.selected_block().unwrap().unwrap();
    assert_eq!(selected.history, vec!["Created", "first note"]);
    assert!(selected.id.0 >= 4);
}

#[test]
fn test_invalid_snapshot_falls_back_to_default() {
    let bridge = MemorySnapshot::new();
    bridge.put_raw(r#"{"format_version": 1, "state": {"blocks": "nope"}}"#);
    assert!(bridge.load_snapshot().is_err());

    let state = persistence::restore_or_default(&bridge, &StageGraph::default());
    assert_eq!(state, BoardState::default());
}
