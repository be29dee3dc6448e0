use std::fmt;

/// Machine-readable error codes surfaced alongside engine failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    UnknownDependency,
    DuplicateTask,
    CycleDetected,
    InvalidCompletionState,
    InvalidStateTransition,
}

impl ErrorCode {
    /// Every code, in table order.
    pub const ALL: [Self; 6] = [
        Self::ConfigParseError,
        Self::UnknownDependency,
        Self::DuplicateTask,
        Self::CycleDetected,
        Self::InvalidCompletionState,
        Self::InvalidStateTransition,
    ];

    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::UnknownDependency => "E2001",
            Self::DuplicateTask => "E2002",
            Self::CycleDetected => "E2003",
            Self::InvalidCompletionState => "E2005",
            Self::InvalidStateTransition => "E2006",
        }
    }

    /// Short human-facing summary for logs and API responses.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::UnknownDependency => "Task depends on an undefined task",
            Self::DuplicateTask => "Task identifier declared twice",
            Self::CycleDetected => "Workflow dependencies form a cycle",
            Self::InvalidCompletionState => "Invalid completion state value",
            Self::InvalidStateTransition => "Invalid state transition",
        }
    }

    /// Optional remediation hint for workflow authors.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in the engine config file and retry."),
            Self::UnknownDependency => {
                Some("Declare the missing task or remove it from the dependency list.")
            }
            Self::DuplicateTask => Some("Give every task in a workflow a unique identifier."),
            Self::CycleDetected => {
                Some("Remove one dependency on the reported path to keep the workflow acyclic.")
            }
            Self::InvalidCompletionState => {
                Some("Use one of: not_started, in_progress, completed, not_applicable.")
            }
            Self::InvalidStateTransition => Some(
                "Follow valid transitions: not_started -> in_progress -> completed, or mark not_applicable.",
            ),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
