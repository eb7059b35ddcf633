//! Status legend
//!
//! Fixed fill colours for rendered nodes, one per task status.

use serde::Serialize;

use crate::domain::TaskStatus;

/// One row of the legend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusColor {
    pub status: TaskStatus,
    pub label: &'static str,
    /// CSS hex colour
    pub color: &'static str,
}

/// The legend, in display order
pub const LEGEND: [StatusColor; 4] = [
    StatusColor {
        status: TaskStatus::Pending,
        label: "Pending",
        color: "#9CA3AF",
    },
    StatusColor {
        status: TaskStatus::InProgress,
        label: "In Progress",
        color: "#3B82F6",
    },
    StatusColor {
        status: TaskStatus::Completed,
        label: "Completed",
        color: "#10B981",
    },
    StatusColor {
        status: TaskStatus::Blocked,
        label: "Blocked",
        color: "#EF4444",
    },
];

/// Returns the legend row for a status
pub fn entry(status: TaskStatus) -> &'static StatusColor {
    match status {
        TaskStatus::Pending => &LEGEND[0],
        TaskStatus::InProgress => &LEGEND[1],
        TaskStatus::Completed => &LEGEND[2],
        TaskStatus::Blocked => &LEGEND[3],
    }
}

/// Returns the fill colour for a status
pub fn color(status: TaskStatus) -> &'static str {
    entry(status).color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_its_own_row() {
        for status in TaskStatus::ALL {
            assert_eq!(entry(status).status, status);
        }
    }

    #[test]
    fn colours() {
        assert_eq!(color(TaskStatus::Pending), "#9CA3AF");
        assert_eq!(color(TaskStatus::Blocked), "#EF4444");
    }
}
