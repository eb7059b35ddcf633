//! Task domain model
//!
//! Tasks are the nodes of the dependency graph. Each task lists the IDs of
//! the tasks it depends on; those references are not required to resolve.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::id::TaskId;

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    /// All statuses, in legend order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Returns true if this task is blocked
    pub fn is_blocked(&self) -> bool {
        matches!(self, TaskStatus::Blocked)
    }

    /// Returns true if this task is currently being worked on
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::InProgress)
    }

    /// Returns the wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" | "todo" => Ok(TaskStatus::Pending),
            "in_progress" | "started" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            other => Err(format!(
                "unknown status '{}' (expected pending, in_progress, completed or blocked)",
                other
            )),
        }
    }
}

/// A task record as supplied by the data layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Human-readable title
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// IDs of the tasks this one depends on
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

impl Task {
    /// Creates a new pending task with no dependencies
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Pending,
            dependencies: Vec::new(),
        }
    }

    /// Sets the description (builder style)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the status (builder style)
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Adds dependencies (builder style)
    pub fn depends_on(mut self, ids: impl IntoIterator<Item = TaskId>) -> Self {
        for id in ids {
            self.add_dependency(id);
        }
        self
    }

    /// Adds a dependency, returning false if it was already present
    pub fn add_dependency(&mut self, id: TaskId) -> bool {
        if self.dependencies.contains(&id) {
            return false;
        }
        self.dependencies.push(id);
        true
    }

    /// Removes a dependency, returning true if it was present
    pub fn remove_dependency(&mut self, id: TaskId) -> bool {
        let len_before = self.dependencies.len();
        self.dependencies.retain(|dep| *dep != id);
        self.dependencies.len() != len_before
    }

    /// Returns true if this task lists `id` as a dependency
    pub fn has_dependency(&self, id: TaskId) -> bool {
        self.dependencies.contains(&id)
    }
}
