//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use super::output::{Output, OutputFormat};
use super::{graph, task};
use crate::logging;
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "taskdag")]
#[command(author, version, about = "Lay out task dependency graphs in levels")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Layout config file (TOML), overriding the project's [layout] table
    #[arg(long, global = true, value_name = "FILE", env = "TASKDAG_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new taskdag project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Compute node and edge coordinates for the dependency graph
    Layout {
        /// Read a JSON task array instead of the project ("-" for stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// Show the level of every task
    Levels {
        /// Read a JSON task array instead of the project ("-" for stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// Check the dependency graph for cycles and dangling references
    Check {
        /// Read a JSON task array instead of the project ("-" for stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// Show the status colour legend
    Legend,
}

/// Main entry point for the CLI
///
/// Errors are reported on stderr in the selected format before being
/// returned.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logging is best effort; a second subscriber in-process is not fatal
    let _ = logging::init(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => Config::load()
            .map(|config| OutputFormat::from(config.global.default_format))
            .unwrap_or_default(),
    };
    let output = Output::new(format);

    debug!(?format, "taskdag starting");

    let result = dispatch(cli.command, cli.config.as_deref(), &output);
    if let Err(err) = &result {
        output.failure(err);
    }
    result
}

fn dispatch(command: Commands, config: Option<&std::path::Path>, output: &Output) -> Result<()> {
    match command {
        Commands::Init { path } => {
            let project = Project::init(&path)?;
            output.success(&format!(
                "Initialized taskdag project at {}",
                project.root().display()
            ));
        }

        Commands::Task(cmd) => task::run(cmd, output)?,

        Commands::Layout { input } => graph::layout(output, input.as_deref(), config)?,
        Commands::Levels { input } => graph::levels(output, input.as_deref())?,
        Commands::Check { input } => graph::check(output, input.as_deref())?,
        Commands::Legend => graph::legend(output),
    }

    debug!("command completed successfully");
    Ok(())
}
