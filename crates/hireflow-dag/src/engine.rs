//! Pipeline entry point.
//!
//! ```text
//! WorkflowDefinition
//!        ↓  WorkflowGraph::build        (UnknownDependency / DuplicateTask)
//! WorkflowGraph
//!        ↓  detect_cycle                (Cyclic, fail fast)
//!        ↓  layout_with_order
//! Layout
//!        ↓  StatusAggregator::render    (+ CompletionSnapshot)
//! WorkflowView
//! ```
//!
//! [`WorkflowEngine`] holds only immutable configuration, so one instance can
//! serve concurrent requests for any number of workflows and candidates.

use hireflow_core::{CompletionSnapshot, EngineConfig, WorkflowDefinition};
use tracing::{debug, instrument, warn};

use crate::error::EngineError;
use crate::graph::build::WorkflowGraph;
use crate::graph::cycles::detect_cycle;
use crate::layout::{Layout, layout_with_order};
use crate::readiness::ReadinessEvaluator;
use crate::render::{StatusAggregator, WorkflowView};

#[derive(Debug, Clone, Default)]
pub struct WorkflowEngine {
    config: EngineConfig,
}

impl WorkflowEngine {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn evaluator(&self) -> ReadinessEvaluator {
        ReadinessEvaluator::new(&self.config.readiness)
    }

    /// Build the graph and reject cyclic workflows.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found: an undefined or duplicate
    /// task, then a dependency cycle.
    #[instrument(skip(self, workflow), fields(workflow = %workflow.identifier))]
    pub fn validate(&self, workflow: &WorkflowDefinition) -> Result<WorkflowGraph, EngineError> {
        let graph = WorkflowGraph::build(workflow)?;
        if let Some(cycle) = detect_cycle(&graph) {
            warn!(cycle = %cycle, "rejecting cyclic workflow");
            return Err(EngineError::Cyclic {
                workflow: workflow.name.clone(),
                cycle,
            });
        }
        Ok(graph)
    }

    /// Validate `workflow` and compute its layered layout.
    ///
    /// # Errors
    ///
    /// See [`WorkflowEngine::validate`].
    pub fn layout(&self, workflow: &WorkflowDefinition) -> Result<Layout, EngineError> {
        let graph = self.validate(workflow)?;
        layout_with_order(&graph, self.config.layout.order)
    }

    /// Run the whole pipeline for one candidate's snapshot.
    ///
    /// # Errors
    ///
    /// See [`WorkflowEngine::validate`]. Rendering itself cannot fail.
    #[instrument(skip_all, fields(workflow = %workflow.identifier, states = snapshot.len()))]
    pub fn evaluate(
        &self,
        workflow: &WorkflowDefinition,
        snapshot: &CompletionSnapshot,
    ) -> Result<WorkflowView, EngineError> {
        let graph = self.validate(workflow)?;
        let layout = layout_with_order(&graph, self.config.layout.order)?;
        let view = StatusAggregator::new(workflow, &graph, &layout)
            .with_evaluator(self.evaluator())
            .render(snapshot);

        debug!(
            nodes = view.nodes.len(),
            edges = view.edges.len(),
            layers = view.layer_count,
            "evaluated workflow"
        );
        Ok(view)
    }
}
