use serde::{Deserialize, Serialize};

/// A task blueprint inside a workflow.
///
/// `dependencies` lists the identifiers of tasks that must be satisfied
/// before this one is ready. Order is preserved and drives edge order in
/// rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl TaskDefinition {
    /// Create a task with no description.
    pub fn new<I, S>(identifier: impl Into<String>, name: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            description: String::new(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

/// An ordered collection of task blueprints forming one hiring workflow.
///
/// Declaration order of `tasks` is the default tie-break for layout, so two
/// definitions with the same tasks in different order may lay out
/// differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
}

impl WorkflowDefinition {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        tasks: Vec<TaskDefinition>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            description: String::new(),
            tasks,
        }
    }

    /// Look up a task by identifier.
    #[must_use]
    pub fn task(&self, identifier: &str) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|task| task.identifier == identifier)
    }

    /// Task identifiers in declaration order.
    pub fn task_identifiers(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|task| task.identifier.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
