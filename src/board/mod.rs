// Board Module - workflow state machine over blocks and stages
//
// The store owns every block, the selection, the filter and the pending
// move prompt. Commands are applied by a pure reducer; the store adds the
// version counter and change notification on top.

pub mod commands;
pub mod errors;
pub mod stages;
pub mod store;
pub mod types;
pub mod view;


pub use commands::{BoardCommand, CommandOutcome};
pub use errors::BoardError;
pub use stages::{StageGraph, TransitionRule};
pub use store::{BoardStore, SubscriptionId};
pub use types::{Block, BlockId, BoardState, PendingPrompt};
pub use view::{PendingMove, StageColumn};
