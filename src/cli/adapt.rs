//! The `adapt` command: run the whole pipeline.
//!
//! ```bash
//! yamladapt adapt Caddyfile.yaml
//! yamladapt adapt app.yaml --env STAGE=prod --pretty -o app.json
//! yamladapt adapt app.yaml --strip root-only --strict-names
//! ```
//!
//! Warnings are printed to stderr even when adapting fails.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use super::common::{EnvArgs, InputArgs, print_warnings, write_output};
use crate::adapt::{AdaptOptions, Adapter};
use crate::config::AdapterConfig;
use crate::extensions::{NameMode, StripMode};

#[derive(Args)]
pub struct AdaptCommand {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    env: EnvArgs,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Where extension fields are removed [default: recursive]
    #[arg(long, value_enum, value_name = "MODE")]
    strip: Option<StripMode>,

    /// Reject extension names containing '-' or '.'
    #[arg(long)]
    strict_names: bool,

    /// Write the JSON to a file instead of stdout
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,
}

impl AdaptCommand {
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let config = self.input.load_config(config_path)?;
        let body = self.input.read_body()?;
        let options = self.options(&config);

        let (output, warnings) = Adapter::new().adapt(&body, &options).into_parts();
        print_warnings(&warnings);
        let json = output?;

        write_output(self.output.as_deref(), &json)
    }

    /// Options for this run; flags override the configuration file.
    fn options(&self, config: &AdapterConfig) -> AdaptOptions {
        let mut policy = config.extensions;
        if let Some(strip) = self.strip {
            policy.strip = strip;
        }
        if self.strict_names {
            policy.names = NameMode::Strict;
        }

        AdaptOptions::new()
            .with_filename(self.input.document_name())
            .with_env(self.env.environment(config))
            .with_extensions(policy)
            .with_pretty(self.pretty || config.output.pretty)
    }
}
