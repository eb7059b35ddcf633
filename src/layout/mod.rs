//! # Layered Layout
//!
//! Turns a flat task list into drawable coordinates. The pipeline is four
//! pure stages, recomputed from scratch on every call:
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Graph building | [`adjacency`] | forward and reverse adjacency maps |
//! | Level assignment | [`levels`] | longest prerequisite chain per task |
//! | Positioning | [`engine`] | centred node coordinates, canvas size |
//! | Edge projection | [`edges`] | prerequisite -> dependent line segments |
//!
//! Nothing is shared between invocations. Callers that re-run the pipeline
//! on every state change can put a [`LayoutCache`] in front of it.
//!
//! ```
//! use taskdag::layout::{compute_layout, LayoutConfig};
//! use taskdag::{Task, TaskId};
//!
//! let a = Task::new(TaskId::new(1), "A");
//! let b = Task::new(TaskId::new(2), "B").depends_on([TaskId::new(1)]);
//!
//! let layout = compute_layout(&[a, b], &LayoutConfig::default()).unwrap();
//! assert_eq!(layout.level_count(), 2);
//! assert_eq!(layout.edges.len(), 1);
//! ```

pub mod adjacency;
pub mod cache;
pub mod edges;
pub mod engine;
pub mod levels;
pub mod palette;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::{format_path, Task, TaskId, TaskStatus};

pub use adjacency::TaskGraph;
pub use cache::LayoutCache;
pub use edges::{Edge, EdgeKey};
pub use levels::LevelMap;
pub use palette::{StatusColor, LEGEND};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LayoutError {
    #[error("Cyclic dependency: {}", format_path(.path))]
    CyclicDependency { path: Vec<TaskId> },

    #[error("Task {0} depends on itself")]
    SelfDependency(TaskId),

    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),
}

/// Spacing parameters for the layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal distance between neighbouring nodes in a level
    pub node_spacing: f64,

    /// Vertical distance between levels
    pub layer_height: f64,

    /// Padding around the drawing on every side
    pub margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 100.0,
            layer_height: 120.0,
            margin: 50.0,
        }
    }
}

impl LayoutConfig {
    /// Checks that every spacing is finite and in range
    pub fn validate(&self) -> Result<(), LayoutError> {
        let fields = [
            ("node_spacing", self.node_spacing),
            ("layer_height", self.layer_height),
            ("margin", self.margin),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(LayoutError::InvalidConfig(format!(
                    "{} must be a finite number",
                    name
                )));
            }
        }

        if self.node_spacing <= 0.0 {
            return Err(LayoutError::InvalidConfig(
                "node_spacing must be positive".to_string(),
            ));
        }
        if self.layer_height <= 0.0 {
            return Err(LayoutError::InvalidConfig(
                "layer_height must be positive".to_string(),
            ));
        }
        if self.margin < 0.0 {
            return Err(LayoutError::InvalidConfig(
                "margin must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// A point on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A task placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: TaskId,
    pub x: f64,
    pub y: f64,
    pub level: usize,
    pub title: String,
    pub status: TaskStatus,
}

impl PositionedNode {
    pub fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

/// Rendering-ready result of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<Edge>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    /// Number of levels spanned by the nodes (zero when empty)
    pub fn level_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| n.level + 1)
            .max()
            .unwrap_or(0)
    }

    /// Looks up a node by task ID
    pub fn node(&self, id: TaskId) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Returns true when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Runs the full pipeline: graph, levels, positions, edges
pub fn compute_layout(tasks: &[Task], config: &LayoutConfig) -> Result<Layout, LayoutError> {
    config.validate()?;

    let graph = TaskGraph::build(tasks);
    let levels = levels::assign_levels(&graph)?;
    let placed = engine::position_nodes(&graph, &levels, config);
    ensure_finite(&placed)?;
    let edges = edges::project_edges(&graph, &placed);

    debug!(
        nodes = placed.nodes.len(),
        edges = edges.len(),
        width = placed.width,
        height = placed.height,
        "layout computed"
    );

    Ok(Layout {
        nodes: placed.nodes,
        edges,
        width: placed.width,
        height: placed.height,
    })
}

/// Rejects a placement whose coordinates overflowed
///
/// Each setting can be finite on its own while the canvas they span is not.
fn ensure_finite(placed: &engine::PlacedNodes) -> Result<(), LayoutError> {
    let finite = placed.width.is_finite()
        && placed.height.is_finite()
        && placed.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite());

    if finite {
        Ok(())
    } else {
        Err(LayoutError::InvalidConfig(format!(
            "layout does not fit a finite canvas ({} x {})",
            placed.width, placed.height
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> TaskId {
        TaskId::new(n)
    }

    fn task(n: u64, deps: &[u64]) -> Task {
        Task::new(id(n), format!("Task {}", n)).depends_on(deps.iter().copied().map(id))
    }

    #[test]
    fn chain_with_shortcut() {
        // A, B(A), C(A, B)
        let tasks = vec![task(1, &[]), task(2, &[1]), task(3, &[1, 2])];
        let layout = compute_layout(&tasks, &LayoutConfig::default()).unwrap();

        assert_eq!(layout.level_count(), 3);
        assert_eq!(layout.node(id(1)).unwrap().level, 0);
        assert_eq!(layout.node(id(2)).unwrap().level, 1);
        assert_eq!(layout.node(id(3)).unwrap().level, 2);

        let keys: Vec<String> = layout.edges.iter().map(|e| e.key.to_string()).collect();
        assert_eq!(keys, vec!["1-2", "1-3", "2-3"]);

        // One node per level: every node sits on the centre line
        for node in &layout.nodes {
            assert_eq!(node.x, 50.0);
        }
        assert_eq!(layout.width, 200.0);
        assert_eq!(layout.height, 3.0 * 120.0 + 100.0);
    }

    #[test]
    fn dangling_reference_is_ignored() {
        let tasks = vec![task(4, &[999])];
        let layout = compute_layout(&tasks, &LayoutConfig::default()).unwrap();

        assert_eq!(layout.node(id(4)).unwrap().level, 0);
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn empty_input() {
        let layout = compute_layout(&[], &LayoutConfig::default()).unwrap();

        assert!(layout.is_empty());
        assert!(layout.edges.is_empty());
        assert_eq!(layout.level_count(), 0);
        assert_eq!(layout.width, 100.0);
        assert_eq!(layout.height, 220.0);
    }

    #[test]
    fn two_task_cycle_fails() {
        let tasks = vec![task(1, &[2]), task(2, &[1])];
        let err = compute_layout(&tasks, &LayoutConfig::default()).unwrap_err();

        assert!(matches!(err, LayoutError::CyclicDependency { .. }));
    }

    #[test]
    fn self_dependency_fails() {
        let tasks = vec![task(1, &[]), task(2, &[2])];
        let err = compute_layout(&tasks, &LayoutConfig::default()).unwrap_err();

        assert_eq!(err, LayoutError::SelfDependency(id(2)));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = LayoutConfig {
            node_spacing: 0.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            compute_layout(&[], &config),
            Err(LayoutError::InvalidConfig(_))
        ));

        let config = LayoutConfig {
            margin: f64::NAN,
            ..LayoutConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LayoutConfig {
            margin: -1.0,
            ..LayoutConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn overflowing_canvas_rejected() {
        let config = LayoutConfig {
            node_spacing: 1e308,
            layer_height: 1.0,
            margin: 0.0,
        };
        assert!(config.validate().is_ok());

        let err = compute_layout(&[task(1, &[]), task(2, &[])], &config).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig(_)));

        let config = LayoutConfig {
            layer_height: 1e308,
            ..LayoutConfig::default()
        };
        let err = compute_layout(&[task(1, &[]), task(2, &[1])], &config).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig(_)));

        // The same settings are fine while the canvas stays finite
        let config = LayoutConfig {
            node_spacing: 1e308,
            layer_height: 1.0,
            margin: 0.0,
        };
        assert!(compute_layout(&[task(1, &[])], &config).is_ok());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let tasks = vec![
            task(1, &[]),
            task(2, &[]),
            task(3, &[1]),
            task(4, &[1, 2]),
            task(5, &[3, 4]),
        ];
        let config = LayoutConfig::default();

        let first = compute_layout(&tasks, &config).unwrap();
        let second = compute_layout(&tasks, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn serialized_shape() {
        let tasks = vec![task(1, &[]), task(2, &[1])];
        let layout = compute_layout(&tasks, &LayoutConfig::default()).unwrap();
        let json = serde_json::to_value(&layout).unwrap();

        assert_eq!(json["nodes"][0]["id"], 1);
        assert_eq!(json["nodes"][0]["status"], "pending");
        assert_eq!(json["edges"][0]["key"], "1-2");
        assert_eq!(json["edges"][0]["source"]["y"], 50.0);
        assert_eq!(json["edges"][0]["target"]["y"], 170.0);
        assert_eq!(json["width"], 200.0);
    }
}
