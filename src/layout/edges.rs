//! Edge projection
//!
//! Every prerequisite -> dependent relation between two positioned tasks
//! becomes a line from the prerequisite's point to the dependent's point.

use serde::{Serialize, Serializer};
use std::fmt;

use super::adjacency::TaskGraph;
use super::engine::PlacedNodes;
use super::Point;
use crate::domain::TaskId;

/// Stable identity of an edge: the (prerequisite, dependent) pair
///
/// Serialized as `"{prerequisite}-{dependent}"` so renderers can diff edges
/// across recomputations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub prerequisite: TaskId,
    pub dependent: TaskId,
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prerequisite, self.dependent)
    }
}

impl Serialize for EdgeKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A drawable dependency edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub key: EdgeKey,
    pub source: Point,
    pub target: Point,
}

impl Edge {
    pub fn prerequisite(&self) -> TaskId {
        self.key.prerequisite
    }

    pub fn dependent(&self) -> TaskId {
        self.key.dependent
    }
}

/// Emits one edge per relation whose endpoints were both positioned
///
/// Edges follow the input order of the dependent, then the order of its
/// dependency list.
pub fn project_edges(graph: &TaskGraph<'_>, placed: &PlacedNodes) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(graph.relation_count());

    for task in graph.tasks() {
        let Some(target) = placed.get(task.id) else {
            continue;
        };

        for &prereq in graph.prerequisites(task.id) {
            let Some(source) = placed.get(prereq) else {
                continue;
            };
            edges.push(Edge {
                key: EdgeKey {
                    prerequisite: prereq,
                    dependent: task.id,
                },
                source: source.point(),
                target: target.point(),
            });
        }
    }

    edges
}
