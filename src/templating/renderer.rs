//! Template rendering engine with Tera.
//!
//! This module provides the [`TemplateRenderer`] that wraps Tera with the
//! `#{ }` translation, the environment preamble and the function library.

use regex::Regex;
use std::sync::LazyLock;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use super::context::{Environment, VariableBindings, is_template_identifier};
use super::error::{ErrorLocation, TemplateError};
use super::filters;
use super::syntax::translate;
use crate::constants::{ENV_CONTEXT_KEY, UNKNOWN_LINE};
use crate::diagnostics::WarningCollector;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
/// This represents a 50% similarity threshold for variable name suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

static VARIABLE_NOT_FOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Variable `([^`]+)` not found").expect("variable pattern is valid")
});

static LINE_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+):(\d+)").expect("line pattern is valid"));

/// Template renderer over an injected environment.
///
/// A fresh Tera instance is created per render, so renderers hold no state
/// besides the environment and the name used in diagnostics.
pub struct TemplateRenderer<'a> {
    environment: &'a Environment,
    source_name: Option<String>,
}

impl<'a> TemplateRenderer<'a> {
    #[must_use]
    pub fn new(environment: &'a Environment) -> Self {
        Self {
            environment,
            source_name: None,
        }
    }

    /// Name the document in error locations.
    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Render `body` against `bindings` and the environment.
    ///
    /// Environment entries whose keys are not template identifiers are
    /// skipped and reported to `warnings` when a collector is given.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] for malformed actions, unknown variables
    /// and failing filters or functions.
    pub fn render(
        &self,
        body: &str,
        bindings: &VariableBindings,
        warnings: Option<&mut WarningCollector>,
    ) -> Result<String, TemplateError> {
        let translated = translate(body, self.source_name.as_deref())?;
        let (preamble, env_values) = environment_preamble(self.environment, warnings);

        let mut context = bindings.to_context()?;
        context.insert(ENV_CONTEXT_KEY, &env_values);

        let mut tera = Tera::default();
        filters::register(&mut tera, self.environment);

        tracing::debug!(
            bindings = bindings.len(),
            environment = env_values.len(),
            "rendering template"
        );

        let template = format!("{preamble}{translated}");
        tera.render_str(&template, &context).map_err(|e| self.parse_tera_error(&e, body, &context))
    }

    /// Parse a Tera error into a structured TemplateError
    fn parse_tera_error(
        &self,
        error: &tera::Error,
        body: &str,
        context: &TeraContext,
    ) -> TemplateError {
        let line_number = extract_line_from_tera_error(error);
        let location = match line_number {
            Some(line) => ErrorLocation::at_line(self.source_name.as_deref(), line, body),
            None => ErrorLocation {
                source_name: self.source_name.clone(),
                ..ErrorLocation::default()
            },
        };

        if let Some(name) = error_chain(error).iter().find_map(|msg| extract_variable_name(msg)) {
            let available_variables = extract_available_variables(context);
            let root = name.split('.').next().unwrap_or(&name);
            let suggestions = find_similar_variables(root, &available_variables);
            return TemplateError::VariableNotFound {
                variable: name,
                available_variables: Box::new(available_variables),
                suggestions: Box::new(suggestions),
                location: Box::new(location),
            };
        }

        let message = format_tera_error(error);
        if error.to_string().starts_with("Failed to parse") {
            TemplateError::SyntaxError {
                message,
                location: Box::new(location),
            }
        } else {
            TemplateError::RenderFailed {
                message,
                location: Box::new(location),
            }
        }
    }
}

/// Render `body` with a one-off [`TemplateRenderer`].
///
/// # Errors
///
/// See [`TemplateRenderer::render`].
pub fn render(
    body: &str,
    bindings: &VariableBindings,
    environment: &Environment,
    warnings: Option<&mut WarningCollector>,
) -> Result<String, TemplateError> {
    TemplateRenderer::new(environment).render(body, bindings, warnings)
}

/// Build the preamble declaring one local per usable environment entry.
///
/// Returns the preamble text and the values it reads from the context. The
/// preamble has no newlines, so it does not shift line numbers.
pub fn environment_preamble(
    environment: &Environment,
    mut warnings: Option<&mut WarningCollector>,
) -> (String, serde_json::Map<String, serde_json::Value>) {
    let mut values = serde_json::Map::new();
    for (key, value) in environment.pairs() {
        if is_template_identifier(key) && key != ENV_CONTEXT_KEY {
            values.insert(key.to_string(), serde_json::Value::String(value.to_string()));
        } else if let Some(collector) = warnings.as_deref_mut() {
            collector.add(
                UNKNOWN_LINE,
                "",
                format!("environment variable \"{key}\" cannot be used in template"),
            );
        }
    }

    let preamble = values
        .keys()
        .map(|key| format!("{{% set {key} = {ENV_CONTEXT_KEY}.{key} %}}"))
        .collect();
    (preamble, values)
}

/// Messages of the error and all of its sources.
fn error_chain(error: &tera::Error) -> Vec<String> {
    use std::error::Error;

    let mut messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        messages.push(err.to_string());
        current = err.source();
    }
    messages
}

/// Extract variable name from "Variable `foo` not found" message
fn extract_variable_name(error_msg: &str) -> Option<String> {
    VARIABLE_NOT_FOUND.captures(error_msg).map(|caps| caps[1].to_string())
}

/// Names a template can reference: bindings and environment locals.
fn extract_available_variables(context: &TeraContext) -> Vec<String> {
    let mut vars = Vec::new();
    if let serde_json::Value::Object(map) = context.clone().into_json() {
        for (key, value) in map {
            if key == ENV_CONTEXT_KEY {
                if let serde_json::Value::Object(env) = value {
                    vars.extend(env.keys().cloned());
                }
            } else {
                vars.push(key);
            }
        }
    }
    vars.sort();
    vars.dedup();
    vars
}

/// Find similar variable names using Levenshtein distance
fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
    let mut scored: Vec<_> =
        available.iter().map(|var| (var.clone(), levenshtein(target, var))).collect();

    scored.sort_by_key(|(_, dist)| *dist);

    // Return top 3 suggestions within reasonable distance
    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(var, _)| var)
        .collect()
}

/// Extract line number from Tera error message
///
/// Tera includes line:column information in parse error messages.
/// Examples: "1:7", "15:23", "864:1"
fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
    let error_msg = format!("{:?}", error);
    LINE_COLUMN.captures(&error_msg).and_then(|caps| caps[1].parse::<usize>().ok())
}

/// Format a Tera error with detailed information about what went wrong.
///
/// Walks the error chain and drops Tera's internal one-off template name.
pub fn format_tera_error(error: &tera::Error) -> String {
    let messages: Vec<String> = error_chain(error)
        .into_iter()
        .map(|msg| {
            msg.replace(" while rendering '__tera_one_off'", "")
                .replace("Failed to render '__tera_one_off'", "Template rendering failed")
                .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                .replace("'__tera_one_off'", "template")
                .trim()
                .to_string()
        })
        .filter(|msg| {
            !msg.is_empty() && msg != "Template rendering failed" && msg != "Template syntax error"
        })
        .collect();

    if messages.is_empty() {
        "Template syntax error (see details above)".to_string()
    } else {
        messages.join("\n  → ")
    }
}
