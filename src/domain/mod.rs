//! Domain models for taskdag
//!
//! Contains the task model and the rules the data layer enforces, without
//! any I/O concerns.

mod id;
mod task;
mod graph;
pub mod rules;

pub use id::{IdError, TaskId};
pub use task::{Task, TaskStatus};
pub use graph::{format_path, DependencyGraph, GraphError};
pub use rules::{RuleError, StatusChange};
