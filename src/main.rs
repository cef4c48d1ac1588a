//! reloc: rewrite container image references in layered configuration trees.
//!
//! This is the main entry point for the `reloc` CLI. It parses arguments,
//! installs logging, dispatches to the appropriate command handler, and
//! handles errors with proper exit codes.

mod cli;
mod commands;

use cli::Cli;
use reloc::{exit_codes, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.log_level.as_deref(), cli.verbose);

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
