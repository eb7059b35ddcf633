//! taskdag - layered layout for task dependency graphs
//!
//! Tasks name the tasks they depend on. taskdag turns such a list into a
//! layered drawing: every task sits one level below its deepest
//! prerequisite, levels are centred on each other, and every dependency
//! becomes a prerequisite -> dependent edge. The [`layout`] module is the
//! pure pipeline; [`storage`] and [`cli`] wrap it in a small local task
//! manager.

pub mod domain;
pub mod layout;
pub mod storage;
pub mod cli;
pub mod logging;

pub use domain::{Task, TaskId, TaskStatus};
pub use layout::{compute_layout, Layout, LayoutConfig, LayoutError};
