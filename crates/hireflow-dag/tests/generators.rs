//! Proptest strategies for workflows and completion snapshots.

#![allow(dead_code)]

use hireflow_core::{CompletionSnapshot, TaskCompletionState, TaskDefinition, WorkflowDefinition};
use proptest::prelude::*;
use proptest::sample::Index;

pub fn task_id(i: usize) -> String {
    format!("t{i:02}")
}

/// Tasks whose dependencies only point at lower-numbered tasks, declared in
/// a shuffled order.
pub fn arb_acyclic_tasks(max_tasks: usize) -> impl Strategy<Value = Vec<TaskDefinition>> {
    prop::collection::vec(prop::collection::vec(any::<Index>(), 0..4), 1..max_tasks)
        .prop_flat_map(|picks| {
            let tasks: Vec<TaskDefinition> = picks
                .iter()
                .enumerate()
                .map(|(i, picks)| {
                    let deps: Vec<String> = if i == 0 {
                        Vec::new()
                    } else {
                        picks.iter().map(|p| task_id(p.index(i))).collect()
                    };
                    TaskDefinition::new(task_id(i), format!("Task {i}"), deps)
                })
                .collect();
            Just(tasks).prop_shuffle()
        })
}

pub fn arb_acyclic_workflow() -> impl Strategy<Value = WorkflowDefinition> {
    arb_acyclic_tasks(24).prop_map(|tasks| WorkflowDefinition::new("prop", "Property", tasks))
}

/// An acyclic workflow with a dependency ring of `1..=4` tasks spliced in.
/// A ring of one is a self-dependency.
pub fn arb_cyclic_workflow() -> impl Strategy<Value = WorkflowDefinition> {
    (arb_acyclic_tasks(16), 1usize..=4).prop_map(|(mut tasks, ring)| {
        let ring = ring.min(tasks.len());
        let ids: Vec<String> = tasks.iter().take(ring).map(|t| t.identifier.clone()).collect();
        for (pos, task) in tasks.iter_mut().take(ring).enumerate() {
            task.dependencies.push(ids[(pos + 1) % ring].clone());
        }
        WorkflowDefinition::new("prop", "Cyclic", tasks)
    })
}

/// A snapshot where each task of `workflow` is independently absent or in
/// any state.
pub fn arb_snapshot(
    workflow: &WorkflowDefinition,
) -> impl Strategy<Value = CompletionSnapshot> + use<> {
    let ids: Vec<String> = workflow.task_identifiers().map(str::to_string).collect();
    prop::collection::vec(
        prop::option::of(prop::sample::select(TaskCompletionState::ALL.to_vec())),
        ids.len(),
    )
    .prop_map(move |states| {
        ids.iter()
            .zip(states)
            .filter_map(|(id, state)| state.map(|s| (id.clone(), s)))
            .collect()
    })
}

pub fn arb_workflow_and_snapshot()
-> impl Strategy<Value = (WorkflowDefinition, CompletionSnapshot)> {
    arb_acyclic_workflow().prop_flat_map(|wf| {
        let snapshot = arb_snapshot(&wf);
        (Just(wf), snapshot)
    })
}
