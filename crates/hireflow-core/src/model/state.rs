use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

use crate::error::ErrorCode;

/// Completion state of one task for one candidate.
///
/// This is the only accepted status vocabulary; readiness and edge
/// classification both match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCompletionState {
    NotStarted,
    InProgress,
    Completed,
    #[serde(alias = "na")]
    NotApplicable,
}

impl TaskCompletionState {
    /// Every state, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::NotStarted,
        Self::InProgress,
        Self::Completed,
        Self::NotApplicable,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::NotApplicable => "not_applicable",
        }
    }

    /// `true` for the terminal states that unblock dependents.
    #[must_use]
    pub const fn is_satisfied(self) -> bool {
        matches!(self, Self::Completed | Self::NotApplicable)
    }

    /// Validate a caller-side transition from `self` to `target`.
    ///
    /// Valid transitions:
    /// - `not_started -> in_progress`
    /// - `in_progress -> completed`
    /// - `* -> not_applicable`
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] for no-op transitions and anything not
    /// listed above.
    pub fn can_transition_to(self, target: Self) -> Result<(), InvalidTransition> {
        if self == target {
            return Err(InvalidTransition {
                from: self,
                to: target,
                reason: "no-op transition is not allowed",
            });
        }

        let allowed = matches!(
            (self, target),
            (Self::NotStarted, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (_, Self::NotApplicable)
        );

        if allowed {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self,
                to: target,
                reason: "transition not allowed by task lifecycle",
            })
        }
    }
}

impl fmt::Display for TaskCompletionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCompletionState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            // `na` is the stored form written by the candidate database.
            "not_applicable" | "na" => Ok(Self::NotApplicable),
            _ => Err(ParseStateError {
                got: s.to_string(),
            }),
        }
    }
}

/// Error returned when a status string is not one of the canonical states.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "invalid completion state '{got}': expected one of not_started, in_progress, completed, not_applicable"
)]
pub struct ParseStateError {
    pub got: String,
}

impl ParseStateError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::InvalidCompletionState
    }
}

/// Error returned when a state transition is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid transition {from} -> {to}: {reason}")]
pub struct InvalidTransition {
    pub from: TaskCompletionState,
    pub to: TaskCompletionState,
    pub reason: &'static str,
}

impl InvalidTransition {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::InvalidStateTransition
    }
}

// ---------------------------------------------------------------------------
// CompletionSnapshot
// ---------------------------------------------------------------------------

/// Read-only view of one candidate's task states at one point in time.
///
/// Tasks the candidate never instantiated have no entry. Backed by a
/// `BTreeMap` so serialization and iteration order are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionSnapshot {
    states: BTreeMap<String, TaskCompletionState>,
}

impl CompletionSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded state for `task`, if the candidate has an instance of it.
    #[must_use]
    pub fn state_of(&self, task: &str) -> Option<TaskCompletionState> {
        self.states.get(task).copied()
    }

    /// Recorded state for `task`, treating a missing entry as `NotStarted`.
    #[must_use]
    pub fn effective_state(&self, task: &str) -> TaskCompletionState {
        self.state_of(task).unwrap_or(TaskCompletionState::NotStarted)
    }

    #[must_use]
    pub fn contains(&self, task: &str) -> bool {
        self.states.contains_key(task)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TaskCompletionState)> {
        self.states.iter().map(|(id, state)| (id.as_str(), *state))
    }
}

impl<K: Into<String>> FromIterator<(K, TaskCompletionState)> for CompletionSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, TaskCompletionState)>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().map(|(id, state)| (id.into(), state)).collect(),
        }
    }
}
