//! The adapt pipeline: YAML documents in, JSON out.
//!
//! [`Adapter::adapt`] runs the stages in a fixed order:
//!
//! 1. resolve includes, relative to the directory of the `filename` option
//! 2. resolve extension variables from the merged text, environment only
//! 3. render the merged text with extension bindings and the environment
//! 4. parse, strip extension fields and serialize as JSON
//!
//! Stages stop at the first error. Warnings gathered up to that point are
//! returned either way.
//!
//! # Examples
//!
//! ```rust
//! use yamladapt::adapt::{AdaptOptions, Adapter};
//! use yamladapt::templating::Environment;
//!
//! let body = b"x-name: svc\ngreeting: \"#{$name}\"\n";
//! let options = AdaptOptions::new()
//!     .with_filename("Caddyfile.yaml")
//!     .with_env(Environment::new());
//!
//! let adaptation = Adapter::new().adapt(body, &options);
//! assert!(adaptation.warnings.is_empty());
//! assert_eq!(adaptation.output.unwrap(), br#"{"greeting":"svc"}"#);
//! ```

pub mod options;

use std::path::Path;

use crate::constants::FILENAME_OPTION;
use crate::core::{AdaptError, Result};
use crate::diagnostics::{Warning, WarningCollector};
use crate::document::{parse_document, to_json};
use crate::extensions::{resolve_extension_vars, strip_extensions};
use crate::include::resolve_includes;
use crate::templating::TemplateRenderer;
use crate::utils::fs::absolute_path;

pub use crate::templating::{Environment, VariableBindings};
pub use options::AdaptOptions;

/// Result of one adapt run.
#[derive(Debug)]
pub struct Adaptation {
    /// The JSON document, or the first error
    pub output: Result<Vec<u8>>,
    /// Non-fatal warnings, in the order they were raised
    pub warnings: Vec<Warning>,
}

impl Adaptation {
    /// Split into the output and the warnings.
    pub fn into_parts(self) -> (Result<Vec<u8>>, Vec<Warning>) {
        (self.output, self.warnings)
    }
}

/// Converts layered, templated YAML configuration into JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adapter;

impl Adapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Adapt `body` into JSON.
    ///
    /// The environment comes from `options`; when none is given the process
    /// environment is read once, here.
    pub fn adapt(&self, body: &[u8], options: &AdaptOptions) -> Adaptation {
        let mut warnings = WarningCollector::new(options.filename().unwrap_or_default());
        let output = run(body, options, &mut warnings);
        if let Err(e) = &output {
            tracing::debug!("adapt failed: {}", e);
        }
        Adaptation {
            output,
            warnings: warnings.into_warnings(),
        }
    }
}

fn run(body: &[u8], options: &AdaptOptions, warnings: &mut WarningCollector) -> Result<Vec<u8>> {
    let filename = options.filename().ok_or_else(|| AdaptError::MissingOption {
        name: FILENAME_OPTION.to_string(),
    })?;
    let text = std::str::from_utf8(body).map_err(|e| AdaptError::InvalidDocument {
        reason: format!("{filename} is not valid UTF-8: {e}"),
    })?;

    let process_env;
    let environment = match options.env() {
        Some(env) => env,
        None => {
            process_env = Environment::from_process();
            &process_env
        }
    };
    let policy = options.extensions();

    let root = absolute_path(Path::new(filename), Path::new("."))?;
    let base_dir = root.parent().unwrap_or(Path::new("/"));
    tracing::debug!("resolving includes of {}", root.display());
    let merged = resolve_includes(text, base_dir, std::slice::from_ref(&root))?;

    let bindings = resolve_extension_vars(&merged, environment, policy.names)?;

    tracing::debug!("rendering {}", filename);
    let rendered = TemplateRenderer::new(environment)
        .with_source_name(filename)
        .render(&merged, &bindings, Some(warnings))?;

    let mut document = parse_document(&rendered, &format!("{filename} after templating"))?;
    strip_extensions(&mut document, policy.strip);
    to_json(&document, options.pretty())
}
