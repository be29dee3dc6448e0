//! Graph construction from a workflow definition.
//!
//! # Edge Direction
//!
//! An edge `A → B` means "B depends on A": A must be satisfied before B is
//! ready. For each task `B` declaring `dependencies: [A, ...]` we insert
//! `A → B`.
//!
//! # Node Order
//!
//! Nodes are inserted in declaration order, so `NodeIndex::index()` equals
//! the task's position in [`WorkflowDefinition::tasks`]. Layout and cycle
//! detection rely on this to stay deterministic.
//!
//! # Content Hash
//!
//! The graph carries a BLAKE3 hash of its declared nodes and edges. Callers
//! rendering the same workflow for many candidates can key a layout cache on
//! it.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use hireflow_core::WorkflowDefinition;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// WorkflowGraph
// ---------------------------------------------------------------------------

/// A validated adjacency view over one workflow.
///
/// Node weights are task identifiers. Every dependency has been resolved;
/// the graph may still contain cycles until
/// [`detect_cycle`](crate::graph::cycles::detect_cycle) has cleared it.
#[derive(Debug, Clone)]
pub struct WorkflowGraph {
    /// Directed graph: nodes = task identifiers, edges = dependency → dependent.
    pub graph: DiGraph<String, ()>,
    /// Mapping from task identifier to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// BLAKE3 content hash of the node and edge declarations.
    pub content_hash: String,
    workflow_name: String,
    in_degree: Vec<usize>,
}

impl WorkflowGraph {
    /// Build a [`WorkflowGraph`] from `workflow`.
    ///
    /// Duplicate dependency declarations on one task collapse into a single
    /// edge. A task listing itself as a dependency produces a self-loop edge,
    /// which cycle detection later reports.
    ///
    /// # Errors
    ///
    /// - [`EngineError::DuplicateTask`] if two tasks share an identifier.
    /// - [`EngineError::UnknownDependency`] for the first dependency (in
    ///   declaration order) that names no task of this workflow.
    #[instrument(skip(workflow), fields(workflow = %workflow.identifier, tasks = workflow.tasks.len()))]
    pub fn build(workflow: &WorkflowDefinition) -> Result<Self, EngineError> {
        let mut graph = DiGraph::<String, ()>::with_capacity(workflow.tasks.len(), 0);
        let mut node_map: HashMap<String, NodeIndex> =
            HashMap::with_capacity(workflow.tasks.len());

        // Step 1: one node per task, in declaration order.
        for task in &workflow.tasks {
            if node_map.contains_key(&task.identifier) {
                return Err(EngineError::DuplicateTask {
                    task: task.identifier.clone(),
                });
            }
            let idx = graph.add_node(task.identifier.clone());
            node_map.insert(task.identifier.clone(), idx);
        }

        // Step 2: resolve dependencies into edges.
        for task in &workflow.tasks {
            let dependent = node_map[&task.identifier];
            for dependency in &task.dependencies {
                let Some(&blocker) = node_map.get(dependency) else {
                    return Err(EngineError::UnknownDependency {
                        task: task.identifier.clone(),
                        missing: dependency.clone(),
                    });
                };
                if !graph.contains_edge(blocker, dependent) {
                    graph.add_edge(blocker, dependent, ());
                }
            }
        }

        let in_degree = graph
            .node_indices()
            .map(|idx| graph.neighbors_directed(idx, Direction::Incoming).count())
            .collect();
        let content_hash = compute_content_hash(&graph);

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built workflow graph"
        );

        Ok(Self {
            graph,
            node_map,
            content_hash,
            workflow_name: workflow.name.clone(),
            in_degree,
        })
    }

    /// Name of the workflow this graph was built from.
    #[must_use]
    pub fn workflow_name(&self) -> &str {
        &self.workflow_name
    }

    /// Return the number of nodes (tasks) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges (dependency relationships) in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a task identifier.
    #[must_use]
    pub fn node_index(&self, task_id: &str) -> Option<NodeIndex> {
        self.node_map.get(task_id).copied()
    }

    /// Return the task identifier for a node.
    #[must_use]
    pub fn task_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Precomputed in-degree (number of distinct dependencies) per node,
    /// indexed by `NodeIndex::index()`.
    #[must_use]
    pub fn in_degrees(&self) -> &[usize] {
        &self.in_degree
    }

    /// In-degree of a single node; 0 for unknown indices.
    #[must_use]
    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.in_degree.get(idx.index()).copied().unwrap_or(0)
    }

    /// Number of distinct tasks depending on `idx`.
    #[must_use]
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors_directed(idx, Direction::Outgoing).count()
    }

    /// Dependencies of `idx` (incoming edges), in declaration order.
    #[must_use]
    pub fn dependencies(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.sorted_neighbors(idx, Direction::Incoming)
    }

    /// Dependents of `idx` (outgoing edges), in declaration order.
    #[must_use]
    pub fn dependents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.sorted_neighbors(idx, Direction::Outgoing)
    }

    /// `true` if `dependent` declares `dependency`.
    #[must_use]
    pub fn has_dependency(&self, dependent: &str, dependency: &str) -> bool {
        match (self.node_index(dependency), self.node_index(dependent)) {
            (Some(from), Some(to)) => self.graph.contains_edge(from, to),
            _ => false,
        }
    }

    // petgraph walks adjacency lists newest-first; sort back into
    // declaration order so traversals are reproducible.
    fn sorted_neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        neighbors.sort_unstable();
        neighbors
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Hash node declaration order plus the sorted edge list.
fn compute_content_hash(graph: &DiGraph<String, ()>) -> String {
    let mut hasher = blake3::Hasher::new();
    for idx in graph.node_indices() {
        hasher.update(graph[idx].as_bytes());
        hasher.update(b"\x00");
    }
    hasher.update(b"\x01");

    let mut edges: Vec<(&str, &str)> = graph
        .edge_indices()
        .filter_map(|edge| graph.edge_endpoints(edge))
        .map(|(from, to)| (graph[from].as_str(), graph[to].as_str()))
        .collect();
    edges.sort_unstable();

    for (from, to) in edges {
        hasher.update(from.as_bytes());
        hasher.update(b"\x00");
        hasher.update(to.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize().to_hex())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hireflow_core::TaskDefinition;

    fn workflow(tasks: &[(&str, &[&str])]) -> WorkflowDefinition {
        WorkflowDefinition::new(
            "wf",
            "Test workflow",
            tasks
                .iter()
                .map(|(id, deps)| TaskDefinition::new(*id, id.to_uppercase(), deps.iter().copied()))
                .collect(),
        )
    }

    #[test]
    fn empty_workflow_produces_empty_graph() {
        let graph = WorkflowGraph::build(&workflow(&[])).expect("build graph");
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.content_hash.starts_with("blake3:"));
    }

    #[test]
    fn tasks_without_deps_are_nodes_only() {
        let graph = WorkflowGraph::build(&workflow(&[("a", &[]), ("b", &[])])).expect("build");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.in_degrees(), &[0, 0]);
    }

    #[test]
    fn edge_points_from_dependency_to_dependent() {
        let graph = WorkflowGraph::build(&workflow(&[("a", &[]), ("b", &["a"])])).expect("build");
        let a = graph.node_index("a").expect("a node");
        let b = graph.node_index("b").expect("b node");
        assert!(graph.graph.contains_edge(a, b), "expected a → b");
        assert!(!graph.graph.contains_edge(b, a), "no reverse edge");
        assert!(graph.has_dependency("b", "a"));
        assert!(!graph.has_dependency("a", "b"));
        assert_eq!(graph.in_degree(b), 1);
        assert_eq!(graph.out_degree(a), 1);
    }

    #[test]
    fn node_indices_follow_declaration_order() {
        let graph =
            WorkflowGraph::build(&workflow(&[("z", &[]), ("m", &["z"]), ("a", &["z"])]))
                .expect("build");
        assert_eq!(graph.node_index("z").map(NodeIndex::index), Some(0));
        assert_eq!(graph.node_index("m").map(NodeIndex::index), Some(1));
        assert_eq!(graph.node_index("a").map(NodeIndex::index), Some(2));

        let z = graph.node_index("z").expect("z node");
        let dependents: Vec<&str> = graph
            .dependents(z)
            .into_iter()
            .filter_map(|idx| graph.task_id(idx))
            .collect();
        assert_eq!(dependents, vec!["m", "a"]);
    }

    #[test]
    fn duplicate_dependency_declarations_collapse() {
        let graph =
            WorkflowGraph::build(&workflow(&[("a", &[]), ("b", &["a", "a"])])).expect("build");
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.in_degrees(), &[0, 1]);
    }

    #[test]
    fn unknown_dependency_is_rejected() {
        let err = WorkflowGraph::build(&workflow(&[("a", &[]), ("e", &["a", "z"])]))
            .expect_err("must fail");
        assert_eq!(
            err,
            EngineError::UnknownDependency {
                task: "e".to_string(),
                missing: "z".to_string()
            }
        );
    }

    #[test]
    fn duplicate_task_is_rejected() {
        let err = WorkflowGraph::build(&workflow(&[("a", &[]), ("a", &[])])).expect_err("fail");
        assert_eq!(
            err,
            EngineError::DuplicateTask {
                task: "a".to_string()
            }
        );
    }

    #[test]
    fn self_dependency_becomes_self_loop() {
        let graph = WorkflowGraph::build(&workflow(&[("a", &["a"])])).expect("build");
        let a = graph.node_index("a").expect("a node");
        assert!(graph.graph.contains_edge(a, a));
        assert_eq!(graph.in_degree(a), 1);
    }

    #[test]
    fn content_hash_tracks_edges_and_order() {
        let base = WorkflowGraph::build(&workflow(&[("a", &[]), ("b", &[])]))
            .expect("build")
            .content_hash;
        let with_edge = WorkflowGraph::build(&workflow(&[("a", &[]), ("b", &["a"])]))
            .expect("build")
            .content_hash;
        let reordered = WorkflowGraph::build(&workflow(&[("b", &[]), ("a", &[])]))
            .expect("build")
            .content_hash;
        let again = WorkflowGraph::build(&workflow(&[("a", &[]), ("b", &[])]))
            .expect("build")
            .content_hash;

        assert_ne!(base, with_edge, "hash must change when edges are added");
        assert_ne!(base, reordered, "declaration order affects layout");
        assert_eq!(base, again);
    }
}
