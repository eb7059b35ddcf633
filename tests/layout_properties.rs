//! Property tests for the layout pipeline over random acyclic task sets

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use taskdag::layout::LayoutConfig;
use taskdag::{compute_layout, Task, TaskId, TaskStatus};

// Acyclic by construction: task i may only depend on tasks 0..i.
// Some dependencies point past the task set to exercise dangling references.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Task>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        let deps = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..4),
            num_tasks,
        );
        let dangling = proptest::collection::vec(any::<bool>(), num_tasks);

        (deps, dangling).prop_map(|(raw_deps, dangling)| {
            raw_deps
                .into_iter()
                .zip(dangling)
                .enumerate()
                .map(|(i, (potential, dangle))| {
                    let id = TaskId::new(i as u64 + 1);
                    let mut deps: Vec<TaskId> = if i > 0 {
                        potential
                            .iter()
                            .map(|d| TaskId::new((d % i) as u64 + 1))
                            .collect()
                    } else {
                        Vec::new()
                    };
                    if dangle {
                        deps.push(TaskId::new(10_000 + i as u64));
                    }
                    // Raw vectors keep duplicates on purpose
                    let mut task = Task::new(id, format!("task {}", i));
                    task.dependencies = deps;
                    task.with_status(TaskStatus::ALL[i % 4])
                })
                .collect()
        })
    })
}

fn config_strategy() -> impl Strategy<Value = LayoutConfig> {
    (1u32..300, 1u32..300, 0u32..100).prop_map(|(spacing, height, margin)| LayoutConfig {
        node_spacing: spacing as f64,
        layer_height: height as f64,
        margin: margin as f64,
    })
}

proptest! {
    #[test]
    fn every_task_is_placed_once(tasks in dag_strategy(30), config in config_strategy()) {
        let layout = compute_layout(&tasks, &config).unwrap();

        let ids: HashSet<TaskId> = layout.nodes.iter().map(|n| n.id).collect();
        prop_assert_eq!(ids.len(), tasks.len());
        prop_assert_eq!(layout.nodes.len(), tasks.len());
    }

    #[test]
    fn level_is_one_past_deepest_prerequisite(tasks in dag_strategy(30)) {
        let layout = compute_layout(&tasks, &LayoutConfig::default()).unwrap();
        let levels: HashMap<TaskId, usize> =
            layout.nodes.iter().map(|n| (n.id, n.level)).collect();

        for task in &tasks {
            let expected = task
                .dependencies
                .iter()
                .filter_map(|d| levels.get(d))
                .map(|l| l + 1)
                .max()
                .unwrap_or(0);
            prop_assert_eq!(levels[&task.id], expected);
        }
    }

    #[test]
    fn edges_point_down_one_per_relation(tasks in dag_strategy(30)) {
        let layout = compute_layout(&tasks, &LayoutConfig::default()).unwrap();

        let relations: HashSet<(TaskId, TaskId)> = tasks
            .iter()
            .flat_map(|t| t.dependencies.iter().map(move |d| (*d, t.id)))
            .filter(|(d, _)| d.get() < 10_000)
            .collect();
        prop_assert_eq!(layout.edges.len(), relations.len());

        for edge in &layout.edges {
            let source = layout.node(edge.prerequisite()).unwrap();
            let target = layout.node(edge.dependent()).unwrap();
            prop_assert!(target.level > source.level);
            prop_assert_eq!(edge.source, source.point());
            prop_assert_eq!(edge.target, target.point());
        }
    }

    #[test]
    fn levels_are_centred_and_spaced(tasks in dag_strategy(30), config in config_strategy()) {
        let layout = compute_layout(&tasks, &config).unwrap();
        let centre = layout.width / 2.0;

        for level in 0..layout.level_count() {
            let row: Vec<_> = layout.nodes.iter().filter(|n| n.level == level).collect();
            prop_assert!(!row.is_empty());

            for pair in row.windows(2) {
                prop_assert!((pair[1].x - pair[0].x - config.node_spacing).abs() < 1e-6);
            }

            // Rows are centred on the canvas, measured in whole slots
            let first = row[0].x;
            let span = row.len() as f64 * config.node_spacing;
            prop_assert!((first + span / 2.0 - centre).abs() < 1e-6);

            for node in &row {
                prop_assert!(node.x >= config.margin - 1e-6);
                let expected_y = level as f64 * config.layer_height + config.margin;
                prop_assert!((node.y - expected_y).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn layout_is_deterministic(tasks in dag_strategy(20), config in config_strategy()) {
        let first = compute_layout(&tasks, &config).unwrap();
        let second = compute_layout(&tasks, &config).unwrap();
        prop_assert_eq!(first, second);
    }
}
