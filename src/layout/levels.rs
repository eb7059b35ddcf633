//! Level assignment
//!
//! A task's level is the length of its longest prerequisite chain: roots sit
//! on level 0, everything else one level below its deepest prerequisite.
//!
//! A task listing itself is rejected up front, before any traversal. Levels
//! are resolved depth-first with an explicit stack instead of
//! recursion, so deep chains cannot exhaust the call stack. Every task is
//! finished exactly once and cached; a task that is reached again while it
//! is still on the stack closes a cycle and aborts the computation.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::adjacency::TaskGraph;
use super::LayoutError;
use crate::domain::TaskId;

/// Task ID -> level index
pub type LevelMap = HashMap<TaskId, usize>;

struct Frame {
    id: TaskId,
    next_prereq: usize,
    level: usize,
}

impl Frame {
    fn new(id: TaskId) -> Self {
        Self {
            id,
            next_prereq: 0,
            level: 0,
        }
    }
}

/// Computes the level of every task in the graph
pub fn assign_levels(graph: &TaskGraph<'_>) -> Result<LevelMap, LayoutError> {
    if let Some(task) = graph
        .tasks()
        .iter()
        .find(|t| graph.prerequisites(t.id).contains(&t.id))
    {
        return Err(LayoutError::SelfDependency(task.id));
    }

    let mut levels = LevelMap::with_capacity(graph.len());
    let mut visiting: HashSet<TaskId> = HashSet::new();
    let mut stack: Vec<Frame> = Vec::new();

    for task in graph.tasks() {
        if levels.contains_key(&task.id) {
            continue;
        }

        visiting.insert(task.id);
        stack.push(Frame::new(task.id));

        while let Some(frame) = stack.last_mut() {
            let prereqs = graph.prerequisites(frame.id);

            if let Some(&prereq) = prereqs.get(frame.next_prereq) {
                frame.next_prereq += 1;

                if let Some(&done) = levels.get(&prereq) {
                    frame.level = frame.level.max(done + 1);
                    continue;
                }
                if visiting.contains(&prereq) {
                    return Err(cycle_error(&stack, prereq));
                }

                visiting.insert(prereq);
                stack.push(Frame::new(prereq));
            } else if let Some(finished) = stack.pop() {
                visiting.remove(&finished.id);
                levels.insert(finished.id, finished.level);
                trace!(task = %finished.id, level = finished.level, "level assigned");

                if let Some(parent) = stack.last_mut() {
                    parent.level = parent.level.max(finished.level + 1);
                }
            }
        }
    }

    debug!(
        tasks = levels.len(),
        depth = levels.values().max().map_or(0, |max| max + 1),
        "assigned levels"
    );

    Ok(levels)
}

/// Builds the depends-on path from `reentered` around the stack and back
fn cycle_error(stack: &[Frame], reentered: TaskId) -> LayoutError {
    let start = stack
        .iter()
        .position(|frame| frame.id == reentered)
        .unwrap_or(0);

    let mut path: Vec<TaskId> = stack[start..].iter().map(|frame| frame.id).collect();
    path.push(reentered);

    LayoutError::CyclicDependency { path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;

    fn id(n: u64) -> TaskId {
        TaskId::new(n)
    }

    fn task(n: u64, deps: &[u64]) -> Task {
        Task::new(id(n), format!("Task {}", n)).depends_on(deps.iter().copied().map(id))
    }

    fn levels_of(tasks: &[Task]) -> Result<LevelMap, LayoutError> {
        assign_levels(&TaskGraph::build(tasks))
    }

    #[test]
    fn roots_are_level_zero() {
        let levels = levels_of(&[task(1, &[]), task(2, &[])]).unwrap();
        assert_eq!(levels[&id(1)], 0);
        assert_eq!(levels[&id(2)], 0);
    }

    #[test]
    fn longest_chain_wins() {
        // 4 depends on 1 directly and via 2 -> 3
        let tasks = vec![task(4, &[1, 3]), task(3, &[2]), task(2, &[1]), task(1, &[])];
        let levels = levels_of(&tasks).unwrap();

        assert_eq!(levels[&id(1)], 0);
        assert_eq!(levels[&id(2)], 1);
        assert_eq!(levels[&id(3)], 2);
        assert_eq!(levels[&id(4)], 3);
    }

    #[test]
    fn dangling_prerequisite_is_root() {
        let levels = levels_of(&[task(4, &[999])]).unwrap();
        assert_eq!(levels[&id(4)], 0);
        assert!(!levels.contains_key(&id(999)));
    }

    #[test]
    fn two_node_cycle() {
        let err = levels_of(&[task(1, &[2]), task(2, &[1])]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::CyclicDependency {
                path: vec![id(1), id(2), id(1)]
            }
        );
    }

    #[test]
    fn cycle_behind_a_root_path() {
        // 1 is fine; 2 -> 3 -> 4 -> 2 loops
        let tasks = vec![
            task(1, &[]),
            task(2, &[1, 4]),
            task(3, &[2]),
            task(4, &[3]),
        ];
        let err = levels_of(&tasks).unwrap_err();
        assert_eq!(
            err,
            LayoutError::CyclicDependency {
                path: vec![id(2), id(4), id(3), id(2)]
            }
        );
    }

    #[test]
    fn self_loop_is_reported_explicitly() {
        let err = levels_of(&[task(7, &[7])]).unwrap_err();
        assert_eq!(err, LayoutError::SelfDependency(id(7)));
    }

    #[test]
    fn self_loop_wins_over_earlier_cycle() {
        let tasks = vec![task(1, &[2]), task(2, &[1]), task(3, &[3])];
        let err = levels_of(&tasks).unwrap_err();
        assert_eq!(err, LayoutError::SelfDependency(id(3)));
    }

    #[test]
    fn long_cycle_is_detected_without_overflow() {
        // 0 -> 1 -> ... -> 49_999 -> 0
        let n = 50_000u64;
        let tasks: Vec<Task> = (0..n).map(|i| task(i, &[(i + 1) % n])).collect();

        match levels_of(&tasks).unwrap_err() {
            LayoutError::CyclicDependency { path } => {
                assert_eq!(path.len(), n as usize + 1);
                assert_eq!(path.first(), Some(&id(0)));
                assert_eq!(path.last(), Some(&id(0)));
                assert_eq!(path[1], id(1));
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let tasks: Vec<Task> = (0..50_000u64)
            .map(|n| {
                if n == 0 {
                    task(n, &[])
                } else {
                    task(n, &[n - 1])
                }
            })
            .rev()
            .collect();

        let levels = levels_of(&tasks).unwrap();
        assert_eq!(levels[&id(49_999)], 49_999);
        assert_eq!(levels[&id(0)], 0);
    }

    #[test]
    fn shared_prerequisite_computed_once() {
        // Many dependents share one deep prerequisite chain
        let mut tasks = vec![task(0, &[]), task(1, &[0]), task(2, &[1])];
        for n in 10..200 {
            tasks.push(task(n, &[2]));
        }

        let levels = levels_of(&tasks).unwrap();
        assert_eq!(levels.len(), tasks.len());
        assert!((10..200).all(|n| levels[&id(n)] == 3));
    }
}
