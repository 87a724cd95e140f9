//! # docsmith CLI
//!
//! Command-line interface for docsmith workspace documentation analysis.
//!
//! This binary provides human-friendly access to `docsmith-core` functionality.
//! Run `docsmith --help` for usage information.

mod cli;
pub mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
