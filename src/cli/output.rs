//! Output formatting for CLI commands

use serde::Serialize;

use crate::domain::{GraphError, TaskId};
use crate::layout::LayoutError;
use crate::storage;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<storage::OutputFormat> for OutputFormat {
    fn from(format: storage::OutputFormat) -> Self {
        match format {
            storage::OutputFormat::Text => OutputFormat::Text,
            storage::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Reports a failed command on stderr
    ///
    /// Cycles carry their path in JSON mode so callers can highlight it.
    pub fn failure(&self, err: &anyhow::Error) {
        match self.format {
            OutputFormat::Text => eprintln!("Error: {:#}", err),
            OutputFormat::Json => {
                let body = match cycle_path(err) {
                    Some(path) => serde_json::json!({
                        "success": false,
                        "error": "Circular dependency detected",
                        "path": path,
                    }),
                    None => serde_json::json!({
                        "success": false,
                        "error": format!("{:#}", err),
                    }),
                };
                eprintln!("{}", body);
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                // For text format, we expect the caller to handle it
                // This is a fallback that pretty-prints JSON
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints a table row (text only, ignored in JSON mode)
    pub fn row(&self, columns: &[&str]) {
        if self.format == OutputFormat::Text {
            println!("{}", columns.join("\t"));
        }
    }

    /// Prints a blank line (text only)
    pub fn blank(&self) {
        if self.format == OutputFormat::Text {
            println!();
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

fn cycle_path(err: &anyhow::Error) -> Option<&[TaskId]> {
    if let Some(GraphError::CycleDetected { path }) = err.downcast_ref::<GraphError>() {
        return Some(path.as_slice());
    }
    if let Some(LayoutError::CyclicDependency { path }) = err.downcast_ref::<LayoutError>() {
        return Some(path.as_slice());
    }
    None
}
