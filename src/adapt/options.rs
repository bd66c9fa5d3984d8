//! Options of one adapt run.

use serde_json::Value as JsonValue;

use crate::constants::{ENV_OPTION, FILENAME_OPTION};
use crate::core::{AdaptError, Result};
use crate::extensions::ExtensionPolicy;
use crate::templating::Environment;

/// Option name selecting indented JSON output in [`AdaptOptions::from_map`].
pub const PRETTY_OPTION: &str = "pretty";

/// Options for [`Adapter::adapt`](super::Adapter::adapt).
///
/// # Examples
///
/// ```rust
/// use yamladapt::adapt::AdaptOptions;
/// use yamladapt::templating::Environment;
///
/// let options = AdaptOptions::new()
///     .with_filename("/etc/app/app.yaml")
///     .with_env(Environment::from_entries(["STAGE=prod"]))
///     .with_pretty(true);
/// assert_eq!(options.filename(), Some("/etc/app/app.yaml"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdaptOptions {
    filename: Option<String>,
    env: Option<Environment>,
    extensions: ExtensionPolicy,
    pretty: bool,
}

impl AdaptOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the input document: the base for relative includes and the
    /// file named in warnings. Required.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Use `env` instead of the process environment.
    #[must_use]
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    #[must_use]
    pub fn with_extensions(mut self, extensions: ExtensionPolicy) -> Self {
        self.extensions = extensions;
        self
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn env(&self) -> Option<&Environment> {
        self.env.as_ref()
    }

    pub fn extensions(&self) -> ExtensionPolicy {
        self.extensions
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }

    /// Build options from an untyped option map.
    ///
    /// Recognized keys are `filename` (string), `env` (list of `KEY=VALUE`
    /// strings, or null for the process environment) and `pretty` (bool).
    /// Other keys are ignored. A missing `filename` is reported later by
    /// `adapt`, as a missing option.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::InvalidOption`] for a recognized key with the
    /// wrong type.
    pub fn from_map(map: &serde_json::Map<String, JsonValue>) -> Result<Self> {
        let mut options = Self::new();

        match map.get(FILENAME_OPTION) {
            None => {}
            Some(JsonValue::String(filename)) => options.filename = Some(filename.clone()),
            Some(other) => return Err(invalid_option(FILENAME_OPTION, "a string", other)),
        }

        match map.get(ENV_OPTION) {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::Array(items)) => {
                let entries = items
                    .iter()
                    .map(|item| match item {
                        JsonValue::String(entry) => Ok(entry.clone()),
                        other => Err(invalid_option(ENV_OPTION, "a list of strings", other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                options.env = Some(Environment::from_entries(entries));
            }
            Some(other) => return Err(invalid_option(ENV_OPTION, "a list of strings", other)),
        }

        match map.get(PRETTY_OPTION) {
            None => {}
            Some(JsonValue::Bool(pretty)) => options.pretty = *pretty,
            Some(other) => return Err(invalid_option(PRETTY_OPTION, "a bool", other)),
        }

        for key in map.keys() {
            if ![FILENAME_OPTION, ENV_OPTION, PRETTY_OPTION].contains(&key.as_str()) {
                tracing::debug!("ignoring unknown option '{}'", key);
            }
        }

        Ok(options)
    }
}

fn invalid_option(name: &str, expected: &str, found: &JsonValue) -> AdaptError {
    let found = match found {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "map",
    };
    AdaptError::InvalidOption {
        name: name.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}
