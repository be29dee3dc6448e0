//! Render-ready view of a workflow for one candidate.
//!
//! [`StatusAggregator`] joins the layout, the candidate's completion snapshot
//! and readiness into a [`WorkflowView`]: one [`RenderNode`] per task and one
//! [`RenderEdge`] per dependency. The view is the whole contract with the
//! rendering layer; it carries grid positions, never pixel geometry.

use std::collections::HashSet;

use hireflow_core::{CompletionSnapshot, TaskCompletionState, WorkflowDefinition};
use serde::Serialize;

use crate::graph::build::WorkflowGraph;
use crate::layout::{Layout, LayoutNode};
use crate::readiness::ReadinessEvaluator;

/// Color class of a dependency edge, driven by the state of its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeState {
    /// The dependency is completed (or not applicable).
    Satisfied,
    /// The candidate has no instance of the dependency yet.
    Pending,
    /// The dependency exists but is not finished.
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderEdge {
    pub from: String,
    pub to: String,
    pub edge_state: EdgeState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderNode {
    pub task_identifier: String,
    pub name: String,
    pub layer: usize,
    pub index_within_layer: usize,
    pub layer_size: usize,
    /// Recorded state, `not_started` when the candidate has no instance.
    pub completion_state: TaskCompletionState,
    /// Whether the snapshot holds an entry for this task.
    pub instantiated: bool,
    pub dependencies_ready: bool,
}

/// Task counts per completion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub not_applicable: usize,
    /// Tasks whose state unblocks dependents.
    pub satisfied: usize,
}

impl Progress {
    fn record(&mut self, state: TaskCompletionState, satisfied: bool) {
        self.total += 1;
        match state {
            TaskCompletionState::NotStarted => self.not_started += 1,
            TaskCompletionState::InProgress => self.in_progress += 1,
            TaskCompletionState::Completed => self.completed += 1,
            TaskCompletionState::NotApplicable => self.not_applicable += 1,
        }
        if satisfied {
            self.satisfied += 1;
        }
    }

    /// Share of satisfied tasks in `[0.0, 1.0]`; 0 for an empty workflow.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.satisfied as f64 / self.total as f64
    }
}

/// Everything the rendering layer needs for one workflow and one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowView {
    pub workflow_identifier: String,
    /// One node per task, in declaration order.
    pub nodes: Vec<RenderNode>,
    /// One edge per distinct dependency, grouped by dependent in declaration
    /// order.
    pub edges: Vec<RenderEdge>,
    pub max_layer: usize,
    pub layer_count: usize,
    /// Content hash of the underlying graph.
    pub graph_hash: String,
    pub progress: Progress,
}

impl WorkflowView {
    #[must_use]
    pub fn node(&self, task_id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|node| node.task_identifier == task_id)
    }

    #[must_use]
    pub fn edge(&self, from: &str, to: &str) -> Option<&RenderEdge> {
        self.edges
            .iter()
            .find(|edge| edge.from == from && edge.to == to)
    }

    /// Tasks not yet satisfied whose dependencies all are: the candidate's
    /// next actionable steps.
    pub fn actionable(&self) -> impl Iterator<Item = &RenderNode> {
        self.nodes
            .iter()
            .filter(|node| node.dependencies_ready && !node.completion_state.is_satisfied())
    }
}

/// Joins layout, completion state and readiness into a [`WorkflowView`].
#[derive(Debug, Clone, Copy)]
pub struct StatusAggregator<'a> {
    workflow: &'a WorkflowDefinition,
    graph: &'a WorkflowGraph,
    layout: &'a Layout,
    evaluator: ReadinessEvaluator,
}

impl<'a> StatusAggregator<'a> {
    /// `graph` and `layout` must have been computed from `workflow`.
    #[must_use]
    pub fn new(workflow: &'a WorkflowDefinition, graph: &'a WorkflowGraph, layout: &'a Layout) -> Self {
        Self {
            workflow,
            graph,
            layout,
            evaluator: ReadinessEvaluator::default(),
        }
    }

    #[must_use]
    pub const fn with_evaluator(mut self, evaluator: ReadinessEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Classify the edge leaving `from` given the candidate's snapshot.
    #[must_use]
    pub fn edge_state(&self, from: &str, snapshot: &CompletionSnapshot) -> EdgeState {
        match snapshot.state_of(from) {
            None => EdgeState::Pending,
            Some(state) if self.evaluator.satisfies(state) => EdgeState::Satisfied,
            Some(_) => EdgeState::Blocked,
        }
    }

    /// Build the view for one candidate.
    #[must_use]
    pub fn render(&self, snapshot: &CompletionSnapshot) -> WorkflowView {
        let mut nodes = Vec::with_capacity(self.workflow.tasks.len());
        let mut edges = Vec::with_capacity(self.graph.edge_count());
        let mut progress = Progress::default();

        for task in &self.workflow.tasks {
            let placement = self
                .layout
                .get(&task.identifier)
                .cloned()
                .unwrap_or_else(|| unplaced(&task.identifier));
            let completion_state = snapshot.effective_state(&task.identifier);
            progress.record(completion_state, self.evaluator.satisfies(completion_state));

            nodes.push(RenderNode {
                task_identifier: task.identifier.clone(),
                name: task.name.clone(),
                layer: placement.layer,
                index_within_layer: placement.index_within_layer,
                layer_size: placement.layer_size,
                completion_state,
                instantiated: snapshot.contains(&task.identifier),
                dependencies_ready: self.evaluator.is_ready(task, snapshot),
            });

            let mut seen: HashSet<&str> = HashSet::with_capacity(task.dependencies.len());
            for dep in &task.dependencies {
                if seen.insert(dep.as_str()) {
                    edges.push(RenderEdge {
                        from: dep.clone(),
                        to: task.identifier.clone(),
                        edge_state: self.edge_state(dep, snapshot),
                    });
                }
            }
        }

        WorkflowView {
            workflow_identifier: self.workflow.identifier.clone(),
            nodes,
            edges,
            max_layer: self.layout.max_layer(),
            layer_count: self.layout.layer_count(),
            graph_hash: self.graph.content_hash.clone(),
            progress,
        }
    }
}

// A layout computed from the same workflow places every task; this only
// keeps rendering total if a caller pairs mismatched inputs.
fn unplaced(task_id: &str) -> LayoutNode {
    LayoutNode {
        task_identifier: task_id.to_string(),
        layer: 0,
        index_within_layer: 0,
        layer_size: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout;
    use hireflow_core::TaskCompletionState::{Completed, InProgress, NotApplicable, NotStarted};
    use hireflow_core::TaskDefinition;
    use hireflow_core::config::ReadinessConfig;

    fn workflow(tasks: &[(&str, &[&str])]) -> WorkflowDefinition {
        WorkflowDefinition::new(
            "hiring",
            "Hiring",
            tasks
                .iter()
                .map(|(id, deps)| TaskDefinition::new(*id, format!("Task {id}"), deps.iter().copied()))
                .collect(),
        )
    }

    fn render_with(
        wf: &WorkflowDefinition,
        snapshot: &CompletionSnapshot,
        evaluator: ReadinessEvaluator,
    ) -> WorkflowView {
        let graph = WorkflowGraph::build(wf).expect("build graph");
        let placed = layout(&graph).expect("layout");
        StatusAggregator::new(wf, &graph, &placed)
            .with_evaluator(evaluator)
            .render(snapshot)
    }

    fn render(wf: &WorkflowDefinition, snapshot: &CompletionSnapshot) -> WorkflowView {
        render_with(wf, snapshot, ReadinessEvaluator::default())
    }

    #[test]
    fn edges_are_classified_by_source_state() {
        let wf = workflow(&[
            ("a", &[]),
            ("b", &[]),
            ("c", &[]),
            ("d", &[]),
            ("sink", &["a", "b", "c", "d"]),
        ]);
        let snapshot: CompletionSnapshot =
            [("a", Completed), ("b", NotApplicable), ("c", InProgress)]
                .into_iter()
                .collect();

        let view = render(&wf, &snapshot);
        let state = |from: &str| view.edge(from, "sink").map(|e| e.edge_state);

        assert_eq!(state("a"), Some(EdgeState::Satisfied));
        assert_eq!(state("b"), Some(EdgeState::Satisfied));
        assert_eq!(state("c"), Some(EdgeState::Blocked));
        assert_eq!(state("d"), Some(EdgeState::Pending));
    }

    #[test]
    fn recorded_not_started_source_is_blocked_not_pending() {
        let wf = workflow(&[("a", &[]), ("b", &["a"])]);
        let snapshot: CompletionSnapshot = [("a", NotStarted)].into_iter().collect();
        let view = render(&wf, &snapshot);
        assert_eq!(
            view.edge("a", "b").map(|e| e.edge_state),
            Some(EdgeState::Blocked)
        );
    }

    #[test]
    fn nodes_carry_layout_state_and_readiness() {
        let wf = workflow(&[("a", &[]), ("b", &["a"]), ("c", &["a", "d"]), ("d", &[])]);
        let snapshot: CompletionSnapshot = [("a", Completed)].into_iter().collect();
        let view = render(&wf, &snapshot);

        let a = view.node("a").expect("a");
        assert_eq!((a.layer, a.completion_state, a.instantiated), (0, Completed, true));

        let b = view.node("b").expect("b");
        assert!(b.dependencies_ready);
        assert_eq!(b.completion_state, NotStarted);
        assert!(!b.instantiated);
        assert_eq!(b.name, "Task b");

        let c = view.node("c").expect("c");
        assert!(!c.dependencies_ready);
        assert_eq!(
            view.edge("d", "c").map(|e| e.edge_state),
            Some(EdgeState::Pending)
        );

        let d = view.node("d").expect("d");
        assert_eq!((d.layer, d.index_within_layer, d.layer_size), (0, 1, 2));
    }

    #[test]
    fn output_order_follows_declarations() {
        let wf = workflow(&[("z", &[]), ("y", &["z"]), ("x", &["z", "y", "z"])]);
        let view = render(&wf, &CompletionSnapshot::new());

        let ids: Vec<&str> = view.nodes.iter().map(|n| n.task_identifier.as_str()).collect();
        assert_eq!(ids, vec!["z", "y", "x"]);

        let edges: Vec<(&str, &str)> = view
            .edges
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect();
        assert_eq!(edges, vec![("z", "y"), ("z", "x"), ("y", "x")]);
        assert_eq!(view.max_layer, 2);
        assert_eq!(view.layer_count, 3);
    }

    #[test]
    fn progress_counts_effective_states() {
        let wf = workflow(&[("a", &[]), ("b", &["a"]), ("c", &["b"]), ("d", &["c"])]);
        let snapshot: CompletionSnapshot = [("a", Completed), ("b", NotApplicable), ("c", InProgress)]
            .into_iter()
            .collect();
        let view = render(&wf, &snapshot);

        assert_eq!(
            view.progress,
            Progress {
                total: 4,
                not_started: 1,
                in_progress: 1,
                completed: 1,
                not_applicable: 1,
                satisfied: 2,
            }
        );
        assert!((view.progress.ratio() - 0.5).abs() < f64::EPSILON);
        assert!(Progress::default().ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn actionable_tasks_are_ready_and_unfinished() {
        let wf = workflow(&[("a", &[]), ("b", &["a"]), ("c", &["b"]), ("e", &[])]);
        let snapshot: CompletionSnapshot = [("a", Completed), ("b", InProgress)]
            .into_iter()
            .collect();
        let view = render(&wf, &snapshot);
        let actionable: Vec<&str> = view.actionable().map(|n| n.task_identifier.as_str()).collect();
        assert_eq!(actionable, vec!["b", "e"]);
    }

    #[test]
    fn strict_policy_blocks_not_applicable_edges() {
        let wf = workflow(&[("a", &[]), ("b", &["a"])]);
        let snapshot: CompletionSnapshot = [("a", NotApplicable)].into_iter().collect();
        let strict = ReadinessEvaluator::new(&ReadinessConfig {
            not_applicable_satisfies: false,
        });
        let view = render_with(&wf, &snapshot, strict);

        assert_eq!(
            view.edge("a", "b").map(|e| e.edge_state),
            Some(EdgeState::Blocked)
        );
        assert!(!view.node("b").expect("b").dependencies_ready);
        assert_eq!(view.progress.satisfied, 0);
    }

    #[test]
    fn view_serializes_with_snake_case_states() {
        let wf = workflow(&[("a", &[]), ("b", &["a"])]);
        let snapshot: CompletionSnapshot = [("a", Completed)].into_iter().collect();
        let json = serde_json::to_value(render(&wf, &snapshot)).expect("serialize");

        assert_eq!(json["nodes"][0]["completion_state"], "completed");
        assert_eq!(json["nodes"][1]["completion_state"], "not_started");
        assert_eq!(json["edges"][0]["edge_state"], "satisfied");
        assert_eq!(json["nodes"][1]["dependencies_ready"], true);
    }
}
