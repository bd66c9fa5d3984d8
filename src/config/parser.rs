//! Generic configuration parsing utilities.
//!
//! TOML parsing for any `DeserializeOwned` type, with the file path attached
//! to every error.
//!
//! ```rust,no_run
//! use yamladapt::config::parse_config;
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Deserialize)]
//! struct MyConfig {
//!     name: String,
//! }
//!
//! # fn example() -> anyhow::Result<()> {
//! let config: MyConfig = parse_config(Path::new("config.toml"))?;
//! println!("Config: {}", config.name);
//! # Ok(())
//! # }
//! ```
//!
//! Example error output:
//! ```text
//! Failed to parse config file: /path/to/yamladapt.toml
//! Caused by:
//!     unknown field `strip_mode`, expected `strip` or `names`
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a TOML configuration file into the specified type.
///
/// # Errors
///
/// Returns an error naming the file if it cannot be read, or if its content
/// is not valid TOML for `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
