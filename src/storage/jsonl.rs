//! JSONL storage for tasks
//!
//! Tasks are stored in `.taskdag/tasks.jsonl` with one JSON object per line.
//! Line order is the task list order the layout keeps within each level.
//! Uses file locking for concurrent access safety.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use tracing::{debug, warn};

use crate::domain::{Task, TaskId};

/// Store for task data in JSONL format
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Creates a new task store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".taskdag").join("tasks.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all tasks in file order
    ///
    /// A later line with an already seen ID replaces the earlier record in
    /// place, so appended updates win without reordering the list.
    pub fn read_all(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open task store: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on task store")?;

        let reader = BufReader::new(&file);
        let mut tasks: Vec<Task> = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let task: Task = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse task at line {}", line_num + 1))?;

            match tasks.iter_mut().find(|t| t.id == task.id) {
                Some(existing) => {
                    warn!(task = %task.id, line = line_num + 1, "replacing earlier record");
                    *existing = task;
                }
                None => tasks.push(task),
            }
        }

        debug!(count = tasks.len(), path = %self.path.display(), "read tasks");

        // Lock is released when file is dropped
        Ok(tasks)
    }

    /// Looks up a single task
    pub fn get(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.read_all()?.into_iter().find(|t| t.id == id))
    }

    /// Returns the ID a new task should get
    pub fn next_id(&self) -> Result<TaskId> {
        let tasks = self.read_all()?;
        Ok(tasks
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(TaskId::new(1), TaskId::next))
    }

    /// Writes all tasks to the store (full rewrite, order preserved)
    pub fn write_all(&self, tasks: &[Task]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock on task store")?;

            let mut writer = BufWriter::new(&file);

            for task in tasks {
                let line = serde_json::to_string(task).context("Failed to serialize task")?;
                writeln!(writer, "{}", line).context("Failed to write task")?;
            }

            writer.flush().context("Failed to flush task store")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        debug!(count = tasks.len(), path = %self.path.display(), "wrote tasks");
        Ok(())
    }

    /// Appends a single task (used for quick adds without full rewrite)
    pub fn append(&self, task: &Task) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open task store: {}", self.path.display()))?;

        // Acquire exclusive lock
        file.lock_exclusive()
            .context("Failed to acquire write lock on task store")?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(task).context("Failed to serialize task")?;
        writeln!(writer, "{}", line).context("Failed to write task")?;

        writer.flush().context("Failed to flush task store")?;

        Ok(())
    }

    /// Updates a single task (reads all, updates, writes all)
    pub fn update(&self, task: &Task) -> Result<()> {
        let mut tasks = self.read_all()?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => tasks.push(task.clone()),
        }
        self.write_all(&tasks)
    }

    /// Removes a task by ID, along with every dependency on it
    pub fn remove(&self, task_id: TaskId) -> Result<bool> {
        let mut tasks = self.read_all()?;
        let len_before = tasks.len();
        tasks.retain(|t| t.id != task_id);

        if tasks.len() == len_before {
            return Ok(false);
        }

        for task in &mut tasks {
            task.remove_dependency(task_id);
        }
        self.write_all(&tasks)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskStatus;
    use tempfile::TempDir;

    fn make_task(n: u64) -> Task {
        Task::new(TaskId::new(n), format!("Task {}", n))
    }

    #[test]
    fn read_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        let tasks = store.read_all().unwrap();
        assert!(tasks.is_empty());
        assert_eq!(store.next_id().unwrap(), TaskId::new(1));
    }

    #[test]
    fn write_and_read_keeps_order() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        let tasks = vec![make_task(3), make_task(1), make_task(2)];
        store.write_all(&tasks).unwrap();

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded, tasks);
        assert_eq!(store.next_id().unwrap(), TaskId::new(4));
    }

    #[test]
    fn append_task() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        store.append(&make_task(1)).unwrap();
        store.append(&make_task(2)).unwrap();

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn appended_update_replaces_in_place() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        store.append(&make_task(1)).unwrap();
        store.append(&make_task(2)).unwrap();
        store
            .append(&make_task(1).with_status(TaskStatus::Completed))
            .unwrap();

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, TaskId::new(1));
        assert_eq!(loaded[0].status, TaskStatus::Completed);
    }

    #[test]
    fn update_task() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        let mut task = make_task(1);
        store.append(&task).unwrap();

        task.status = TaskStatus::InProgress;
        store.update(&task).unwrap();

        let loaded = store.get(task.id).unwrap().unwrap();
        assert_eq!(loaded.status, TaskStatus::InProgress);
    }

    #[test]
    fn remove_task_strips_references() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        let tasks = vec![
            make_task(1),
            make_task(2).depends_on([TaskId::new(1)]),
        ];
        store.write_all(&tasks).unwrap();

        assert!(store.remove(TaskId::new(1)).unwrap());
        assert!(!store.remove(TaskId::new(1)).unwrap());

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].dependencies.is_empty());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("nested").join("dir").join("tasks.jsonl"));

        store.append(&make_task(1)).unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn atomic_write() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        store.write_all(&[make_task(1)]).unwrap();

        // Temp file should not exist after write
        let temp_path = store.path().with_extension("jsonl.tmp");
        assert!(!temp_path.exists());
    }

    #[test]
    fn bad_line_reports_position() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.jsonl");
        fs::write(&path, "{\"id\": 1, \"title\": \"ok\"}\nnot json\n").unwrap();

        let err = TaskStore::new(&path).read_all().unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }
}
