//! Node positioning
//!
//! Groups tasks by level, keeping input order inside each level, and centres
//! every level on the widest one:
//!
//! ```text
//! x = index * node_spacing + (max_width - level_width) / 2 + margin
//! y = level * layer_height + margin
//! ```

use std::collections::HashMap;

use tracing::debug;

use super::adjacency::TaskGraph;
use super::levels::LevelMap;
use super::{LayoutConfig, PositionedNode};
use crate::domain::TaskId;

/// Positioned nodes plus the canvas they fit on
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNodes {
    /// Nodes in level order, input order within a level
    pub nodes: Vec<PositionedNode>,

    /// Task ID -> index into `nodes`
    pub index: HashMap<TaskId, usize>,

    pub width: f64,
    pub height: f64,
}

impl PlacedNodes {
    /// Looks up a positioned node by task ID
    pub fn get(&self, id: TaskId) -> Option<&PositionedNode> {
        self.index.get(&id).and_then(|&i| self.nodes.get(i))
    }
}

/// Assigns coordinates to every task that has a level
pub fn position_nodes(
    graph: &TaskGraph<'_>,
    levels: &LevelMap,
    config: &LayoutConfig,
) -> PlacedNodes {
    let max_level = levels.values().copied().max().unwrap_or(0);

    // Arena of groups indexed by level
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); max_level + 1];
    for (position, task) in graph.tasks().iter().enumerate() {
        if let Some(group) = levels.get(&task.id).and_then(|&l| groups.get_mut(l)) {
            group.push(position);
        }
    }

    let level_width = |count: usize| count as f64 * config.node_spacing;
    let max_width = groups
        .iter()
        .map(|group| level_width(group.len()))
        .fold(0.0, f64::max);

    let mut nodes = Vec::with_capacity(graph.len());
    let mut index = HashMap::with_capacity(graph.len());

    for (level, group) in groups.iter().enumerate() {
        let offset = (max_width - level_width(group.len())) / 2.0 + config.margin;
        let y = level as f64 * config.layer_height + config.margin;

        for (slot, &position) in group.iter().enumerate() {
            let Some(task) = graph.tasks().get(position) else {
                continue;
            };
            index.insert(task.id, nodes.len());
            nodes.push(PositionedNode {
                id: task.id,
                x: slot as f64 * config.node_spacing + offset,
                y,
                level,
                title: task.title.clone(),
                status: task.status,
            });
        }
    }

    let width = max_width + config.margin * 2.0;
    let height = (max_level + 1) as f64 * config.layer_height + config.margin * 2.0;

    debug!(
        levels = groups.len(),
        max_width,
        width,
        height,
        "positioned nodes"
    );

    PlacedNodes {
        nodes,
        index,
        width,
        height,
    }
}
