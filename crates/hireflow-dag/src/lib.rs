#![forbid(unsafe_code)]
//! hireflow-dag library.
//!
//! Validates hiring-workflow dependency graphs, lays them out in layers and
//! derives per-candidate readiness and edge status for rendering.
//!
//! # Conventions
//!
//! - **Errors**: [`EngineError`] for every failure the pipeline can report.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod engine;
pub mod error;
pub mod graph;
pub mod layout;
pub mod readiness;
pub mod render;

pub use engine::WorkflowEngine;
pub use error::EngineError;
pub use graph::{CyclePath, WorkflowGraph, detect_cycle, find_all_cycles};
pub use layout::{Layout, LayoutNode, layout, layout_with_order};
pub use readiness::{ReadinessEvaluator, is_ready};
pub use render::{EdgeState, Progress, RenderEdge, RenderNode, StatusAggregator, WorkflowView};
