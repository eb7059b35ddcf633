//! Graph building
//!
//! Derives forward (prerequisite -> dependents) and reverse
//! (dependent -> prerequisites) adjacency from the task list in one pass.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::domain::{Task, TaskId};

/// Task ID -> ordered list of related task IDs
pub type AdjacencyMap = HashMap<TaskId, Vec<TaskId>>;

/// Adjacency view over a borrowed task list
///
/// Tasks are kept in an arena in input order; the maps are keyed by ID and
/// list neighbours in the order they were first seen.
#[derive(Debug)]
pub struct TaskGraph<'a> {
    tasks: Vec<&'a Task>,
    index: HashMap<TaskId, usize>,
    forward: AdjacencyMap,
    reverse: AdjacencyMap,
    relations: usize,
}

impl<'a> TaskGraph<'a> {
    /// Builds both adjacency maps
    ///
    /// Dependencies on IDs outside the task list are dropped, as are
    /// repeated dependencies. A repeated task ID keeps its first record.
    pub fn build(tasks: &'a [Task]) -> Self {
        let mut arena = Vec::with_capacity(tasks.len());
        let mut index = HashMap::with_capacity(tasks.len());
        let mut forward = AdjacencyMap::with_capacity(tasks.len());
        let mut reverse = AdjacencyMap::with_capacity(tasks.len());

        for task in tasks {
            if index.contains_key(&task.id) {
                warn!(task = %task.id, "duplicate task id, keeping first record");
                continue;
            }
            index.insert(task.id, arena.len());
            arena.push(task);
            forward.insert(task.id, Vec::new());
            reverse.insert(task.id, Vec::new());
        }

        let mut seen: HashSet<(TaskId, TaskId)> = HashSet::new();
        let mut dangling = 0usize;

        for task in &arena {
            for &dep_id in &task.dependencies {
                if !index.contains_key(&dep_id) {
                    dangling += 1;
                    continue;
                }
                if !seen.insert((dep_id, task.id)) {
                    continue;
                }
                if let Some(dependents) = forward.get_mut(&dep_id) {
                    dependents.push(task.id);
                }
                if let Some(prereqs) = reverse.get_mut(&task.id) {
                    prereqs.push(dep_id);
                }
            }
        }

        debug!(
            tasks = arena.len(),
            relations = seen.len(),
            dangling,
            "built adjacency maps"
        );

        Self {
            tasks: arena,
            index,
            forward,
            reverse,
            relations: seen.len(),
        }
    }

    /// Tasks in input order, without repeated IDs
    pub fn tasks(&self) -> &[&'a Task] {
        &self.tasks
    }

    /// Looks up a task by ID
    pub fn task(&self, id: TaskId) -> Option<&'a Task> {
        self.index.get(&id).and_then(|&i| self.tasks.get(i).copied())
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.index.contains_key(&id)
    }

    /// Tasks that depend on `id`
    pub fn dependents(&self, id: TaskId) -> &[TaskId] {
        self.forward.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tasks that `id` depends on, restricted to the task set
    pub fn prerequisites(&self, id: TaskId) -> &[TaskId] {
        self.reverse.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn forward(&self) -> &AdjacencyMap {
        &self.forward
    }

    pub fn reverse(&self) -> &AdjacencyMap {
        &self.reverse
    }

    /// Number of distinct prerequisite -> dependent relations
    pub fn relation_count(&self) -> usize {
        self.relations
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
