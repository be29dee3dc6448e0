//! Dependency graph module for workflow validation.
//!
//! # Overview
//!
//! Converts a [`WorkflowDefinition`](hireflow_core::WorkflowDefinition) into
//! a petgraph directed graph and checks it for cycles before layout.
//!
//! ## Pipeline
//!
//! ```text
//! WorkflowDefinition
//!        ↓  build::WorkflowGraph::build()
//! WorkflowGraph (DiGraph, resolved dependencies, in-degree map)
//!        ↓  cycles::detect_cycle()
//! acyclic graph, or a CyclePath counterexample
//! ```

pub mod build;
pub mod cycles;

// Re-export primary types at module level for convenience.
pub use build::WorkflowGraph;
pub use cycles::{CyclePath, detect_cycle, find_all_cycles};
