//! Task list import
//!
//! Reads a JSON array of task records, as returned by a task API listing
//! endpoint, from a file or from stdin (`-`).

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::Task;

/// Reads a task array from `path`, or stdin when `path` is `-`
pub fn read_task_array(path: &Path) -> Result<Vec<Task>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read tasks from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read task file: {}", path.display()))?
    };

    let tasks = parse_task_array(&content)
        .with_context(|| format!("Failed to parse task list: {}", path.display()))?;

    debug!(count = tasks.len(), source = %path.display(), "imported tasks");
    Ok(tasks)
}

/// Parses a JSON task array; an empty document is an empty list
pub fn parse_task_array(content: &str) -> Result<Vec<Task>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskId, TaskStatus};
    use tempfile::TempDir;

    #[test]
    fn parses_api_listing() {
        let json = r#"[
            {"id": 1, "title": "A", "description": "", "status": "completed",
             "dependencies": [], "dependents": [{"task__id": 2, "task__title": "B"}],
             "created_at": "2024-01-01T00:00:00Z"},
            {"id": 2, "title": "B", "description": "", "status": "in_progress",
             "dependencies": [1], "dependents": []}
        ]"#;

        let tasks = parse_task_array(json).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert_eq!(tasks[1].dependencies, vec![TaskId::new(1)]);
    }

    #[test]
    fn blank_document_is_empty() {
        assert!(parse_task_array("  \n").unwrap().is_empty());
        assert!(parse_task_array("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_array() {
        assert!(parse_task_array(r#"{"id": 1}"#).is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, r#"[{"id": 4, "title": "D", "dependencies": [999]}]"#).unwrap();

        let tasks = read_task_array(&path).unwrap();
        assert_eq!(tasks[0].dependencies, vec![TaskId::new(999)]);
    }

    #[test]
    fn missing_file_has_context() {
        let err = read_task_array(Path::new("/nonexistent/tasks.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read task file"));
    }
}
