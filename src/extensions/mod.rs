//! Extension fields: top-level `x-` keys carrying template variables.
//!
//! Extension fields are read twice and then dropped:
//!
//! 1. [`resolve_extension_vars`] pulls their raw text out of the document,
//!    renders it with the environment only and turns each field into a
//!    binding (`x-db-host` becomes `db_host`)
//! 2. the whole document is rendered with those bindings
//! 3. [`strip_extensions`] removes the fields from the parsed result so they
//!    never reach the output
//!
//! How names are checked and how deep stripping goes is set by
//! [`ExtensionPolicy`].

pub mod strip;
pub mod variables;

use serde::Deserialize;

pub use strip::{is_extension_key, strip_extensions};
pub use variables::{binding_name, resolve_extension_vars};

/// Where extension keys are removed from the rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StripMode {
    /// Remove `x-` keys in every mapping, including mappings inside sequences
    #[default]
    Recursive,
    /// Remove `x-` keys from the root mapping only
    RootOnly,
}

/// How an extension field name becomes a binding identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NameMode {
    /// Replace `-` with `_`; other characters are kept
    #[default]
    Normalize,
    /// Reject names containing `-` or `.`
    Strict,
}

/// Extension handling for one adapt run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionPolicy {
    #[serde(default)]
    pub strip: StripMode,
    #[serde(default)]
    pub names: NameMode,
}

impl ExtensionPolicy {
    #[must_use]
    pub fn new(strip: StripMode, names: NameMode) -> Self {
        Self {
            strip,
            names,
        }
    }
}
