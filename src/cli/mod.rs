//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Task | Task list management | `task add`, `task dep`, `task status` |
//! | Graph | Layout and validation | `layout`, `levels`, `check`, `legend` |
//!
//! Graph commands read the project's task store, or a JSON task array
//! given with `--input` (`-` reads stdin).
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Use `--verbose` (or `-v`) for debug logs on stderr, or set `TASKDAG_LOG`
//! to a filter such as `taskdag::layout=trace`.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod task;
mod graph;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
