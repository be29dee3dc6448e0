use hireflow_core::ErrorCode;

use crate::graph::cycles::CyclePath;

/// Structured failure returned before any layout is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("task '{task}' depends on unknown task '{missing}'")]
    UnknownDependency { task: String, missing: String },

    #[error("task '{task}' is declared more than once")]
    DuplicateTask { task: String },

    #[error("circular dependency detected in workflow '{workflow}': {cycle}")]
    Cyclic { workflow: String, cycle: CyclePath },
}

impl EngineError {
    /// Stable machine-readable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownDependency { .. } => ErrorCode::UnknownDependency,
            Self::DuplicateTask { .. } => ErrorCode::DuplicateTask,
            Self::Cyclic { .. } => ErrorCode::CycleDetected,
        }
    }

    /// The offending cycle, for [`EngineError::Cyclic`].
    #[must_use]
    pub const fn cycle(&self) -> Option<&CyclePath> {
        match self {
            Self::Cyclic { cycle, .. } => Some(cycle),
            _ => None,
        }
    }
}
