//! Layered layout of an acyclic workflow graph.
//!
//! # Algorithm
//!
//! Kahn's algorithm processed one frontier at a time:
//!
//! 1. Frontier 0 is **every** node with in-degree 0, whether or not it is
//!    connected to the rest of the workflow.
//! 2. All nodes of frontier `k` get layer `k`. Each of their dependents loses
//!    one in-degree; dependents reaching 0 form frontier `k + 1`.
//! 3. Repeat until the frontier is empty.
//!
//! A node only joins a frontier once its last dependency has been placed, so
//! its layer is the length of the longest dependency chain ending at it.
//!
//! # Ordering
//!
//! Within a layer, nodes are sorted by [`LayerOrder`]: declaration position
//! (default) or identifier. Hash-map iteration order never leaks into the
//! result.

use std::collections::BTreeMap;

use hireflow_core::LayerOrder;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::EngineError;
use crate::graph::build::WorkflowGraph;
use crate::graph::cycles::detect_cycle;

/// Placement of one task in the layered layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutNode {
    pub task_identifier: String,
    /// 0 for tasks without dependencies.
    pub layer: usize,
    pub index_within_layer: usize,
    /// Number of tasks sharing `layer`.
    pub layer_size: usize,
}

/// The layered layout of a whole workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Layout {
    nodes: BTreeMap<String, LayoutNode>,
    layers: Vec<Vec<String>>,
}

impl Layout {
    /// Placement for `task_id`.
    #[must_use]
    pub fn get(&self, task_id: &str) -> Option<&LayoutNode> {
        self.nodes.get(task_id)
    }

    /// Task identifiers in layer `layer`, in within-layer order.
    #[must_use]
    pub fn layer(&self, layer: usize) -> Option<&[String]> {
        self.layers.get(layer).map(Vec::as_slice)
    }

    /// All layers, outermost vector indexed by layer number.
    #[must_use]
    pub fn layers(&self) -> &[Vec<String>] {
        &self.layers
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Highest layer index, 0 for an empty layout.
    #[must_use]
    pub fn max_layer(&self) -> usize {
        self.layers.len().saturating_sub(1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in `(layer, index_within_layer)` order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutNode> {
        self.layers
            .iter()
            .flatten()
            .filter_map(|id| self.nodes.get(id))
    }
}

/// Lay out `graph` ordering each layer by declaration position.
///
/// # Errors
///
/// Returns [`EngineError::Cyclic`] if the graph is not acyclic. Callers are
/// expected to have run [`detect_cycle`] first; the check here only keeps a
/// cyclic graph from producing a partial layout.
pub fn layout(graph: &WorkflowGraph) -> Result<Layout, EngineError> {
    layout_with_order(graph, LayerOrder::Declaration)
}

/// Lay out `graph` ordering each layer by `order`.
///
/// # Errors
///
/// Returns [`EngineError::Cyclic`] if the graph is not acyclic.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn layout_with_order(graph: &WorkflowGraph, order: LayerOrder) -> Result<Layout, EngineError> {
    let mut in_degree: Vec<usize> = graph.in_degrees().to_vec();
    let mut frontier: Vec<NodeIndex> = graph
        .graph
        .node_indices()
        .filter(|idx| in_degree[idx.index()] == 0)
        .collect();

    let mut layers: Vec<Vec<NodeIndex>> = Vec::new();
    let mut placed = 0usize;

    while !frontier.is_empty() {
        sort_frontier(graph, &mut frontier, order);

        let mut next: Vec<NodeIndex> = Vec::new();
        for &node in &frontier {
            for dependent in graph.dependents(node) {
                let remaining = &mut in_degree[dependent.index()];
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    next.push(dependent);
                }
            }
        }

        placed += frontier.len();
        layers.push(std::mem::replace(&mut frontier, next));
    }

    // Kahn leaves nodes unplaced only when they sit on or behind a cycle.
    if placed < graph.node_count() {
        if let Some(cycle) = detect_cycle(graph) {
            return Err(EngineError::Cyclic {
                workflow: graph.workflow_name().to_string(),
                cycle,
            });
        }
    }

    let result = assemble(graph, &layers);
    debug!(layers = result.layer_count(), "computed layered layout");
    Ok(result)
}

fn sort_frontier(graph: &WorkflowGraph, frontier: &mut [NodeIndex], order: LayerOrder) {
    match order {
        // Node indices are declaration positions.
        LayerOrder::Declaration => frontier.sort_unstable(),
        LayerOrder::Identifier => {
            frontier.sort_unstable_by(|a, b| graph.task_id(*a).cmp(&graph.task_id(*b)));
        }
    }
}

fn assemble(graph: &WorkflowGraph, layers: &[Vec<NodeIndex>]) -> Layout {
    let mut nodes = BTreeMap::new();
    let mut named_layers = Vec::with_capacity(layers.len());

    for (layer, members) in layers.iter().enumerate() {
        let ids: Vec<String> = members
            .iter()
            .filter_map(|&idx| graph.task_id(idx))
            .map(str::to_string)
            .collect();

        for (index_within_layer, id) in ids.iter().enumerate() {
            nodes.insert(
                id.clone(),
                LayoutNode {
                    task_identifier: id.clone(),
                    layer,
                    index_within_layer,
                    layer_size: ids.len(),
                },
            );
        }
        named_layers.push(ids);
    }

    Layout {
        nodes,
        layers: named_layers,
    }
}
