//! Dependency readiness for one candidate.
//!
//! A task is ready when every **direct** dependency is in a satisfied state.
//! Ancestors are not re-checked: a dependency could only have been completed
//! once its own dependencies were satisfied, and historical transitions are
//! the caller's record, not ours.

use hireflow_core::config::ReadinessConfig;
use hireflow_core::{CompletionSnapshot, TaskCompletionState, TaskDefinition};

/// Decides which completion states unblock dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessEvaluator {
    not_applicable_satisfies: bool,
}

impl Default for ReadinessEvaluator {
    fn default() -> Self {
        Self {
            not_applicable_satisfies: true,
        }
    }
}

impl ReadinessEvaluator {
    #[must_use]
    pub const fn new(config: &ReadinessConfig) -> Self {
        Self {
            not_applicable_satisfies: config.not_applicable_satisfies,
        }
    }

    /// `true` if a dependency in `state` no longer blocks its dependents.
    #[must_use]
    pub const fn satisfies(self, state: TaskCompletionState) -> bool {
        match state {
            TaskCompletionState::Completed => true,
            TaskCompletionState::NotApplicable => self.not_applicable_satisfies,
            TaskCompletionState::NotStarted | TaskCompletionState::InProgress => false,
        }
    }

    /// `true` if every dependency of `task` is satisfied in `snapshot`.
    ///
    /// Missing snapshot entries count as `NotStarted`. A task without
    /// dependencies is always ready.
    #[must_use]
    pub fn is_ready(self, task: &TaskDefinition, snapshot: &CompletionSnapshot) -> bool {
        task.dependencies
            .iter()
            .all(|dep| self.satisfies(snapshot.effective_state(dep)))
    }

    /// Dependencies of `task` that keep it from being ready, in declaration
    /// order and without repeats.
    #[must_use]
    pub fn unmet_dependencies<'a>(
        self,
        task: &'a TaskDefinition,
        snapshot: &CompletionSnapshot,
    ) -> Vec<&'a str> {
        let mut unmet: Vec<&str> = Vec::new();
        for dep in &task.dependencies {
            if !self.satisfies(snapshot.effective_state(dep)) && !unmet.contains(&dep.as_str()) {
                unmet.push(dep);
            }
        }
        unmet
    }
}

/// [`ReadinessEvaluator::is_ready`] with the default policy.
#[must_use]
pub fn is_ready(task: &TaskDefinition, snapshot: &CompletionSnapshot) -> bool {
    ReadinessEvaluator::default().is_ready(task, snapshot)
}
