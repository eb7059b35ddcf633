//! Status rules
//!
//! A status change on one task ripples to the tasks that depend on it:
//!
//! | Change | Effect on dependents |
//! |--------|----------------------|
//! | -> blocked | every dependent becomes blocked |
//! | -> completed | dependents whose prerequisites are all completed start (in_progress) |
//! | completed -> other | started or completed dependents fall back to pending |
//! | blocked -> other | blocked dependents with no other blocked prerequisite become pending |
//!
//! Induced changes ripple further in turn. The rules walk the graph
//! forward only, so the task set must be acyclic.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::id::TaskId;
use super::task::{Task, TaskStatus};
use crate::layout::adjacency::{AdjacencyMap, TaskGraph};
use crate::layout::levels::assign_levels;
use crate::layout::LayoutError;

#[derive(Debug, Error, PartialEq)]
pub enum RuleError {
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Cannot start/complete this task. Dependencies not finished: {}", .titles.join(", "))]
    UnfinishedDependencies { task: TaskId, titles: Vec<String> },

    #[error(transparent)]
    Graph(#[from] LayoutError),
}

/// One status transition applied to a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub id: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

/// Checks that a task may move to `new_status`
///
/// Starting or completing a task requires every prerequisite in the task
/// set to be completed. Other transitions are always allowed.
pub fn check_transition(tasks: &[Task], id: TaskId, new_status: TaskStatus) -> Result<(), RuleError> {
    let task = tasks
        .iter()
        .find(|t| t.id == id)
        .ok_or(RuleError::TaskNotFound(id))?;

    if !matches!(new_status, TaskStatus::InProgress | TaskStatus::Completed) {
        return Ok(());
    }

    let titles: Vec<String> = task
        .dependencies
        .iter()
        .filter_map(|dep| tasks.iter().find(|t| t.id == *dep))
        .filter(|dep| !dep.status.is_complete())
        .map(|dep| dep.title.clone())
        .collect();

    if titles.is_empty() {
        Ok(())
    } else {
        Err(RuleError::UnfinishedDependencies { task: id, titles })
    }
}

/// Sets the status of `id` and applies the resulting cascade
///
/// Returns every change made, starting with the requested one. `tasks` is
/// only modified when the whole cascade succeeds.
pub fn apply_status(
    tasks: &mut [Task],
    id: TaskId,
    new_status: TaskStatus,
) -> Result<Vec<StatusChange>, RuleError> {
    let mut cascade = Cascade::new(tasks)?;
    let from = cascade.status(id).ok_or(RuleError::TaskNotFound(id))?;

    cascade.record(StatusChange {
        id,
        from,
        to: new_status,
    });
    cascade.run();
    Ok(cascade.write_back(tasks))
}

/// Applies the status effects of `task` having gained `depends_on`
///
/// The relation must already be present in `tasks`. A started task that
/// gains an unfinished prerequisite returns to pending; a task that gains a
/// blocked prerequisite becomes blocked.
pub fn on_dependency_added(
    tasks: &mut [Task],
    task: TaskId,
    depends_on: TaskId,
) -> Result<Vec<StatusChange>, RuleError> {
    let mut cascade = Cascade::new(tasks)?;
    let task_status = cascade.status(task).ok_or(RuleError::TaskNotFound(task))?;
    let dep_status = cascade
        .status(depends_on)
        .ok_or(RuleError::TaskNotFound(depends_on))?;

    if task_status.is_active() && !dep_status.is_complete() {
        cascade.set(task, TaskStatus::Pending);
        cascade.run();
    }

    let task_status = cascade.status(task).unwrap_or(task_status);
    if dep_status.is_blocked() && !task_status.is_blocked() {
        cascade.set(task, TaskStatus::Blocked);
        cascade.run();
    }

    Ok(cascade.write_back(tasks))
}

/// Working copy of the graph and statuses while rules are applied
struct Cascade {
    dependents: AdjacencyMap,
    prerequisites: AdjacencyMap,
    statuses: HashMap<TaskId, TaskStatus>,
    pending: VecDeque<StatusChange>,
    changes: Vec<StatusChange>,
}

impl Cascade {
    fn new(tasks: &[Task]) -> Result<Self, RuleError> {
        let graph = TaskGraph::build(tasks);
        assign_levels(&graph)?;

        let statuses = graph.tasks().iter().map(|t| (t.id, t.status)).collect();

        Ok(Self {
            dependents: graph.forward().clone(),
            prerequisites: graph.reverse().clone(),
            statuses,
            pending: VecDeque::new(),
            changes: Vec::new(),
        })
    }

    fn status(&self, id: TaskId) -> Option<TaskStatus> {
        self.statuses.get(&id).copied()
    }

    fn record(&mut self, change: StatusChange) {
        self.statuses.insert(change.id, change.to);
        self.changes.push(change);
        self.pending.push_back(change);
    }

    fn set(&mut self, id: TaskId, to: TaskStatus) {
        if let Some(from) = self.status(id) {
            self.record(StatusChange { id, from, to });
        }
    }

    fn dependents_of(&self, id: TaskId) -> Vec<TaskId> {
        self.dependents.get(&id).cloned().unwrap_or_default()
    }

    fn all_prerequisites_complete(&self, id: TaskId) -> bool {
        self.prerequisites
            .get(&id)
            .map(|prereqs| {
                prereqs
                    .iter()
                    .all(|p| self.status(*p).is_some_and(|s| s.is_complete()))
            })
            .unwrap_or(true)
    }

    fn has_other_blocked_prerequisite(&self, id: TaskId, except: TaskId) -> bool {
        self.prerequisites
            .get(&id)
            .map(|prereqs| {
                prereqs
                    .iter()
                    .filter(|p| **p != except)
                    .any(|p| self.status(*p).is_some_and(|s| s.is_blocked()))
            })
            .unwrap_or(false)
    }

    fn run(&mut self) {
        while let Some(change) = self.pending.pop_front() {
            self.propagate(change);
        }
    }

    fn propagate(&mut self, change: StatusChange) {
        let dependents = self.dependents_of(change.id);

        if change.to.is_blocked() {
            for dep in &dependents {
                if self.status(*dep).is_some_and(|s| !s.is_blocked()) {
                    self.set(*dep, TaskStatus::Blocked);
                }
            }
        } else if change.to.is_complete() {
            for dep in &dependents {
                let Some(status) = self.status(*dep) else {
                    continue;
                };
                if status.is_complete() || status.is_active() {
                    continue;
                }
                if self.all_prerequisites_complete(*dep) {
                    self.set(*dep, TaskStatus::InProgress);
                }
            }
        }

        if change.from.is_complete() && !change.to.is_complete() {
            for dep in &dependents {
                if self
                    .status(*dep)
                    .is_some_and(|s| s.is_active() || s.is_complete())
                {
                    self.set(*dep, TaskStatus::Pending);
                }
            }
        }

        if change.from.is_blocked() && !change.to.is_blocked() {
            for dep in &dependents {
                if self.status(*dep).is_some_and(|s| s.is_blocked())
                    && !self.has_other_blocked_prerequisite(*dep, change.id)
                {
                    self.set(*dep, TaskStatus::Pending);
                }
            }
        }
    }

    fn write_back(self, tasks: &mut [Task]) -> Vec<StatusChange> {
        for task in tasks.iter_mut() {
            if let Some(status) = self.statuses.get(&task.id) {
                task.status = *status;
            }
        }

        debug!(changes = self.changes.len(), "applied status rules");
        self.changes
    }
}
