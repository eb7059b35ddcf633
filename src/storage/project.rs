//! Project management
//!
//! Handles project initialization and provides access to the task store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::info;

use super::{Config, TaskStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a taskdag project. Run 'taskdag init' first.")]
    NotInProject,
}

const DEFAULT_CONFIG: &str = r#"# taskdag configuration

[layout]
# Horizontal distance between nodes on the same level
node_spacing = 100.0

# Vertical distance between levels
layer_height = 120.0

# Padding around the drawing
margin = 50.0
"#;

/// A taskdag project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".taskdag").is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// Existing files are left untouched, so this is safe to re-run.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(".taskdag");

        fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create .taskdag directory: {}", data_dir.display())
        })?;

        let config_path = data_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let tasks_path = data_dir.join("tasks.jsonl");
        if !tasks_path.exists() {
            fs::write(&tasks_path, "")
                .with_context(|| format!("Failed to create task store: {}", tasks_path.display()))?;
        }

        info!(root = %root.display(), "initialized project");
        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .taskdag directory path
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(".taskdag")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Returns the task store
    pub fn task_store(&self) -> TaskStore {
        TaskStore::for_project(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutConfig;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.data_dir().is_dir());
        assert!(project.data_dir().join("config.toml").is_file());
        assert!(project.data_dir().join("tasks.jsonl").is_file());
    }

    #[test]
    fn default_config_matches_layout_defaults() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert_eq!(project.config().layout().unwrap(), LayoutConfig::default());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        let project = Project::init(dir.path()).unwrap(); // Should not fail

        assert!(project.task_store().read_all().unwrap().is_empty());
    }

    #[test]
    fn open_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        let result = Project::open(dir.path());

        assert!(result.is_err());
    }

    #[test]
    fn config_mut_persists() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::init(dir.path()).unwrap();

        project.config_mut().project.layout.margin = 10.0;
        project.config().save_project().unwrap();

        let reopened = Project::open(dir.path()).unwrap();
        assert_eq!(reopened.config().layout().unwrap().margin, 10.0);
    }
}
