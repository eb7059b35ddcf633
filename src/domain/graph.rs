//! Dependency graph for link validation
//!
//! Guards the data layer when a new dependency is added: self-references
//! and relations that would close a cycle are rejected with the offending
//! path. Uses petgraph for graph operations.

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::fmt::Write as _;
use thiserror::Error;

use super::id::TaskId;
use super::task::Task;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Circular dependency detected: {}", format_path(.path))]
    CycleDetected { path: Vec<TaskId> },

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Tasks cannot depend on themselves: {0}")]
    SelfDependency(TaskId),
}

/// Renders an ID path as `1 -> 2 -> 1`
pub fn format_path(path: &[TaskId]) -> String {
    let mut out = String::new();
    for (i, id) in path.iter().enumerate() {
        if i > 0 {
            out.push_str(" -> ");
        }
        let _ = write!(out, "{}", id);
    }
    out
}

/// A dependency graph for tasks
///
/// Edges point from prerequisite to dependent.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<TaskId, ()>,

    /// Map from TaskId to node index
    node_map: HashMap<TaskId, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Builds a graph from a collection of tasks
    ///
    /// References to unknown tasks are dropped. Existing relations are
    /// inserted as-is; validation only applies to [`add_dependency`].
    ///
    /// [`add_dependency`]: DependencyGraph::add_dependency
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut graph = Self::new();

        let tasks: Vec<_> = tasks.into_iter().collect();
        for task in &tasks {
            graph.add_task(task.id);
        }

        for task in &tasks {
            for dep_id in &task.dependencies {
                if let (Some(&dep_idx), Some(&task_idx)) =
                    (graph.node_map.get(dep_id), graph.node_map.get(&task.id))
                {
                    if graph.graph.find_edge(dep_idx, task_idx).is_none() {
                        graph.graph.add_edge(dep_idx, task_idx, ());
                    }
                }
            }
        }

        graph
    }

    /// Adds a task to the graph
    pub fn add_task(&mut self, task_id: TaskId) {
        if !self.node_map.contains_key(&task_id) {
            let idx = self.graph.add_node(task_id);
            self.node_map.insert(task_id, idx);
        }
    }

    /// Adds a dependency edge: `task` depends on `depends_on`
    ///
    /// The edge direction is: depends_on -> task. Fails when `depends_on`
    /// already depends on `task`, directly or transitively; the error path
    /// follows depends-on links starting and ending at `task`.
    pub fn add_dependency(&mut self, task: TaskId, depends_on: TaskId) -> Result<(), GraphError> {
        if task == depends_on {
            return Err(GraphError::SelfDependency(task));
        }

        let task_idx = *self
            .node_map
            .get(&task)
            .ok_or(GraphError::TaskNotFound(task))?;

        let dep_idx = *self
            .node_map
            .get(&depends_on)
            .ok_or(GraphError::TaskNotFound(depends_on))?;

        // A prerequisite chain task -> ... -> depends_on means depends_on
        // already waits on task.
        let existing = astar(
            &self.graph,
            task_idx,
            |idx| idx == dep_idx,
            |_| 1usize,
            |_| 0usize,
        );

        if let Some((_, route)) = existing {
            let mut path = vec![task];
            path.extend(
                route
                    .iter()
                    .rev()
                    .filter_map(|idx| self.graph.node_weight(*idx).copied()),
            );
            return Err(GraphError::CycleDetected { path });
        }

        if self.graph.find_edge(dep_idx, task_idx).is_none() {
            self.graph.add_edge(dep_idx, task_idx, ());
        }

        Ok(())
    }

    /// Removes a dependency edge
    pub fn remove_dependency(&mut self, task: TaskId, depends_on: TaskId) -> bool {
        let (Some(&task_idx), Some(&dep_idx)) =
            (self.node_map.get(&task), self.node_map.get(&depends_on))
        else {
            return false;
        };

        if let Some(edge) = self.graph.find_edge(dep_idx, task_idx) {
            self.graph.remove_edge(edge);
            true
        } else {
            false
        }
    }

    /// Returns the direct dependencies of a task
    pub fn dependencies(&self, task_id: TaskId) -> Vec<TaskId> {
        self.neighbors(task_id, petgraph::Direction::Incoming)
    }

    /// Returns the direct dependents of a task (tasks that depend on it)
    pub fn dependents(&self, task_id: TaskId) -> Vec<TaskId> {
        self.neighbors(task_id, petgraph::Direction::Outgoing)
    }

    fn neighbors(&self, task_id: TaskId, direction: petgraph::Direction) -> Vec<TaskId> {
        let Some(&idx) = self.node_map.get(&task_id) else {
            return vec![];
        };

        let mut ids: Vec<TaskId> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|n| self.graph.node_weight(n).copied())
            .collect();
        ids.sort();
        ids
    }

    /// Returns true if the graph contains the task
    pub fn contains(&self, task_id: TaskId) -> bool {
        self.node_map.contains_key(&task_id)
    }

    /// Returns the number of tasks in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}
