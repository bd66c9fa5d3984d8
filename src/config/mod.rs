//! Adapter configuration file.
//!
//! Defaults for the command line can live in a TOML file, passed with
//! `--config` or found as `yamladapt.toml` next to the input document:
//!
//! ```toml
//! [extensions]
//! strip = "recursive"   # or "root-only"
//! names = "normalize"   # or "strict"
//!
//! [output]
//! pretty = false
//!
//! [env]
//! REGION = "eu-west-1"  # appended to the environment
//! ```
//!
//! Every section is optional and unknown keys are rejected. Command-line
//! flags override values from the file.
//!
//! # Modules
//!
//! - `parser` - Generic TOML parsing utilities with error context

pub mod parser;

use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::CONFIG_FILE_NAME;
use crate::extensions::ExtensionPolicy;

pub use parser::parse_config;

/// Contents of a `yamladapt.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterConfig {
    #[serde(default)]
    pub extensions: ExtensionPolicy,
    #[serde(default)]
    pub output: OutputConfig,
    /// Extra environment entries
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Indent the JSON output
    #[serde(default)]
    pub pretty: bool,
}

impl AdapterConfig {
    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error naming the file when it cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        parse_config(path)
    }

    /// Find the configuration for a run.
    ///
    /// An `explicit` path must exist. Otherwise `yamladapt.toml` in the
    /// directory of `document` is used when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed.
    pub fn discover(explicit: Option<&Path>, document: Option<&Path>) -> Result<Option<(PathBuf, Self)>> {
        if let Some(path) = explicit {
            return Ok(Some((path.to_path_buf(), Self::load(path)?)));
        }

        let Some(dir) = document.and_then(Path::parent) else {
            return Ok(None);
        };
        let candidate = dir.join(CONFIG_FILE_NAME);
        if !candidate.is_file() {
            return Ok(None);
        }

        tracing::debug!("using configuration {}", candidate.display());
        let config = Self::load(&candidate)?;
        Ok(Some((candidate, config)))
    }

    /// `[env]` as `KEY=VALUE` entries.
    pub fn env_entries(&self) -> impl Iterator<Item = String> + '_ {
        self.env.iter().map(|(key, value)| format!("{key}={value}"))
    }
}
