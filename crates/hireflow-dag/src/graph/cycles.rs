//! Cycle detection for workflow dependency graphs.
//!
//! # Overview
//!
//! Layering assumes a DAG, so the engine runs [`detect_cycle`] before any
//! layout and fails fast with a concrete counterexample path.
//!
//! # Design
//!
//! - **Three-color DFS**: white (unvisited), gray (on the active path), black
//!   (fully processed). Revisiting a gray node closes a cycle; the cycle is
//!   the active path from that node back to itself.
//! - **Iterative**: an explicit frame stack replaces recursion so long
//!   dependency chains cannot overflow the call stack.
//! - **Deterministic**: roots and dependents are visited in declaration
//!   order, so the same workflow always reports the same cycle.
//! - **O(V+E)**: each node and edge is visited at most once.

#![allow(clippy::module_name_repetitions)]

use std::fmt;

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::debug;

use super::build::WorkflowGraph;

// ---------------------------------------------------------------------------
// CyclePath
// ---------------------------------------------------------------------------

/// An ordered cycle through the dependency graph.
///
/// The first and last identifiers are equal and every consecutive pair is a
/// graph edge (`dependency → dependent`). A self-dependency on `A` is
/// `["A", "A"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CyclePath {
    path: Vec<String>,
}

impl CyclePath {
    #[must_use]
    pub const fn new(path: Vec<String>) -> Self {
        Self { path }
    }

    /// The closed path, first element repeated at the end.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Number of distinct tasks in the cycle.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if a task depends on itself.
    #[must_use]
    pub const fn is_self_loop(&self) -> bool {
        self.len() == 1
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.path
    }
}

impl fmt::Display for CyclePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path.join(" -> "))
    }
}

// ---------------------------------------------------------------------------
// Core detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// One DFS frame: a node, its dependents, and the next dependent to visit.
struct Frame {
    node: NodeIndex,
    dependents: Vec<NodeIndex>,
    next: usize,
}

/// Find one cycle in `graph`, or `None` if it is acyclic.
///
/// Roots are tried in declaration order. The returned path starts at the
/// first node found on the active DFS path twice, e.g. for
/// `{A: [B], B: [A]}` the result is `A -> B -> A`.
#[must_use]
pub fn detect_cycle(graph: &WorkflowGraph) -> Option<CyclePath> {
    let mut color = vec![Color::White; graph.node_count()];
    let mut active: Vec<NodeIndex> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();

    for root in graph.graph.node_indices() {
        if color[root.index()] != Color::White {
            continue;
        }

        color[root.index()] = Color::Gray;
        active.push(root);
        frames.push(Frame {
            node: root,
            dependents: graph.dependents(root),
            next: 0,
        });

        while let Some(frame) = frames.last_mut() {
            let Some(&target) = frame.dependents.get(frame.next) else {
                // All dependents processed: retire the node.
                color[frame.node.index()] = Color::Black;
                active.pop();
                frames.pop();
                continue;
            };
            frame.next += 1;

            match color[target.index()] {
                Color::White => {
                    color[target.index()] = Color::Gray;
                    active.push(target);
                    frames.push(Frame {
                        node: target,
                        dependents: graph.dependents(target),
                        next: 0,
                    });
                }
                Color::Gray => {
                    let cycle = close_cycle(graph, &active, target);
                    debug!(cycle = %cycle, "dependency cycle found");
                    return Some(cycle);
                }
                Color::Black => {}
            }
        }
    }

    None
}

/// Cut the active path at `target` and close it back onto `target`.
fn close_cycle(graph: &WorkflowGraph, active: &[NodeIndex], target: NodeIndex) -> CyclePath {
    let start = active.iter().position(|&idx| idx == target).unwrap_or(0);
    let mut path: Vec<String> = active[start..]
        .iter()
        .map(|&idx| node_id(graph, idx))
        .collect();
    path.push(node_id(graph, target));
    CyclePath::new(path)
}

/// Find all cycles currently present in `graph`.
///
/// Each entry is a sorted list of task identifiers in one strongly connected
/// component (SCC). Self-dependencies are reported as a one-element cycle.
/// Useful for diagnostics that want every offending group rather than the
/// single counterexample returned by [`detect_cycle`].
#[must_use]
pub fn find_all_cycles(graph: &WorkflowGraph) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph.graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|node| graph.graph.contains_edge(*node, *node))
        })
        .map(|component| {
            let mut ids: Vec<String> = component
                .into_iter()
                .map(|idx| node_id(graph, idx))
                .collect();
            ids.sort_unstable();
            ids
        })
        .collect();

    cycles.sort_unstable();
    cycles
}

fn node_id(graph: &WorkflowGraph, idx: NodeIndex) -> String {
    graph
        .task_id(idx)
        .map_or_else(|| format!("#{}", idx.index()), str::to_string)
}
