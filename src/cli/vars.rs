//! The `vars` command: print the bindings a document's extension fields
//! produce, after includes are resolved.
//!
//! ```bash
//! yamladapt vars app.yaml --env HOST=example.com
//! ```

use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::common::{EnvArgs, InputArgs, write_output};
use crate::extensions::{NameMode, resolve_extension_vars};

#[derive(Args)]
pub struct VarsCommand {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    env: EnvArgs,

    /// Reject extension names containing '-' or '.'
    #[arg(long)]
    strict_names: bool,
}

impl VarsCommand {
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let config = self.input.load_config(config_path)?;
        let environment = self.env.environment(&config);
        let names = if self.strict_names {
            NameMode::Strict
        } else {
            config.extensions.names
        };

        let merged = self.input.merged_text()?;
        let bindings = resolve_extension_vars(&merged, &environment, names)?;
        tracing::debug!("extension bindings: {}", bindings.names().collect::<Vec<_>>().join(", "));

        let json = serde_json::to_vec_pretty(&bindings.to_json()?)?;
        write_output(None, &json)
    }
}
