#![forbid(unsafe_code)]
//! hireflow-core library.
//!
//! Shared vocabulary for the workflow engine: task and workflow definitions,
//! per-candidate completion states, engine configuration and stable error
//! codes.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for domain failures, `anyhow::Result` for
//!   configuration loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::{EngineConfig, LayerOrder};
pub use error::ErrorCode;
pub use model::{
    CompletionSnapshot, ParseStateError, TaskCompletionState, TaskDefinition, WorkflowDefinition,
};
