//! Workflow definitions and per-candidate completion state.

pub mod state;
pub mod workflow;

pub use state::{CompletionSnapshot, InvalidTransition, ParseStateError, TaskCompletionState};
pub use workflow::{TaskDefinition, WorkflowDefinition};
