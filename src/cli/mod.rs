//! Command-line interface for yamladapt.
//!
//! The binary exposes the adapt pipeline and two of its stages on their own,
//! for debugging layered configurations:
//!
//! - `adapt` - run the whole pipeline and print JSON
//! - `vars` - print the extension bindings of a document as JSON
//! - `merge` - print a document with its includes resolved, as YAML
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: log every pipeline stage (debug level)
//! - `--quiet` / `-q`: log errors only
//! - `--config` / `-c`: configuration file to use instead of the
//!   `yamladapt.toml` found next to the input document
//!
//! `RUST_LOG` takes precedence over both flags. Logs go to stderr, so they
//! never mix with the document written to stdout.
//!
//! # Examples
//!
//! ```bash
//! yamladapt adapt Caddyfile.yaml --pretty
//! yamladapt adapt - --filename conf/app.yaml --env STAGE=prod < conf/app.yaml
//! yamladapt vars app.yaml --no-process-env
//! yamladapt -v merge app.yaml
//! ```

mod adapt;
mod common;
mod merge;
mod vars;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime configuration derived from the global flags.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Log filter directive, used when `RUST_LOG` is not set
    pub log_level: String,
    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            config_path: None,
        }
    }
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the stderr log subscriber.
    ///
    /// Does nothing when a subscriber is already installed, which happens
    /// when the CLI is driven from tests.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Compose layered YAML configuration into JSON.
#[derive(Parser)]
#[command(
    name = "yamladapt",
    about = "Compose layered, templated YAML configuration into JSON",
    version,
    long_about = "yamladapt merges included YAML documents, binds x- extension fields as \
                  template variables, renders #{ } templates and writes the result as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log every pipeline stage
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Log errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file (default: yamladapt.toml next to the document)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Adapt a document into JSON
    Adapt(adapt::AdaptCommand),

    /// Print the extension bindings of a document
    Vars(vars::VarsCommand),

    /// Print a document with its includes resolved
    Merge(merge::MergeCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Returns the first error of the command; the caller prints it.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(&config)
    }

    /// Map the global flags to a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
        }
    }

    /// Run the command without touching logging setup.
    ///
    /// # Errors
    ///
    /// Returns the first error of the command.
    pub fn execute_with_config(self, config: &CliConfig) -> Result<()> {
        let explicit = config.config_path.as_deref();
        match self.command {
            Commands::Adapt(cmd) => cmd.execute(explicit),
            Commands::Vars(cmd) => cmd.execute(explicit),
            Commands::Merge(cmd) => cmd.execute(),
        }
    }
}
