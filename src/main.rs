//! taskdag - dependency graph layout for tasks

use std::process::ExitCode;

fn main() -> ExitCode {
    // Errors are reported by the CLI in the selected output format
    match taskdag::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
