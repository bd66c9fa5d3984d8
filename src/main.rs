//! yamladapt CLI entry point
//!
//! Parses the command line, runs the selected command and prints failures
//! with their cause chain and a suggestion where one applies.

use anyhow::Result;
use clap::Parser;
use yamladapt::cli;
use yamladapt::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
