//! # Storage Layer
//!
//! Persistence for taskdag with git-friendly file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSONL (one JSON per line) | `.taskdag/tasks.jsonl` |
//! | Config | TOML | `.taskdag/config.toml` |
//! | Imported task lists | JSON array | any file, or stdin |
//!
//! ## Concurrency Safety
//!
//! - [`TaskStore`] uses file locking (`fs2`) for concurrent access
//! - All full rewrites are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a taskdag project
//! - [`TaskStore`] - Read/write tasks as JSONL
//! - [`Config`] - Project and global configuration

mod jsonl;
mod config;
mod project;
pub mod import;

pub use jsonl::TaskStore;
pub use config::{load_layout_file, Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig};
pub use project::{Project, ProjectError};
