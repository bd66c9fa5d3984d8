//! Template inputs: the environment and the variable binding set.
//!
//! Both are plain values built once per adapt run. The process environment is
//! read only through [`Environment::from_process`], which the orchestrator
//! calls when the caller supplies no override.

use serde_yaml::Value;
use std::collections::BTreeMap;
use tera::Context as TeraContext;

use super::error::TemplateError;
use crate::document::value_to_json;

/// Words that cannot name a template variable.
const RESERVED_WORDS: &[&str] = &[
    "true", "false", "True", "False", "and", "or", "not", "in", "is", "if", "elif", "else",
    "endif", "for", "endfor", "set", "set_global", "break", "continue", "raw", "endraw",
    "macro", "endmacro", "block", "endblock", "filter", "endfilter", "include", "import",
    "extends", "loop", "super",
];

/// Whether `key` can be declared as a template variable.
///
/// Identifiers are an ASCII letter or `_` followed by ASCII letters, digits
/// or `_`, and are not template keywords.
///
/// ```rust
/// use yamladapt::templating::is_template_identifier;
///
/// assert!(is_template_identifier("HOME"));
/// assert!(is_template_identifier("_private_1"));
/// assert!(!is_template_identifier("INVALID%"));
/// assert!(!is_template_identifier("1ST"));
/// assert!(!is_template_identifier("in"));
/// ```
#[must_use]
pub fn is_template_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED_WORDS.contains(&key)
}

/// An ordered list of `KEY=VALUE` environment entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    entries: Vec<String>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an environment from `KEY=VALUE` strings, keeping their order.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Snapshot the process environment.
    ///
    /// Non-UTF-8 keys or values are converted lossily.
    #[must_use]
    pub fn from_process() -> Self {
        Self::from_entries(
            std::env::vars_os()
                .map(|(k, v)| format!("{}={}", k.to_string_lossy(), v.to_string_lossy())),
        )
    }

    /// Append an entry; later entries win on lookup.
    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, value)` pairs. An entry without `=` has an empty value.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|entry| entry.split_once('=').unwrap_or((entry.as_str(), "")))
    }

    /// Look up a key; the last matching entry wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs().filter(|(k, _)| *k == key).map(|(_, v)| v).last()
    }
}

/// Identifier to value mapping handed to the template engine.
///
/// Built once (from extension fields) and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableBindings {
    values: BTreeMap<String, Value>,
}

impl VariableBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Binding names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Bindings as a JSON object, the shape Tera and the CLI consume.
    pub fn to_json(&self) -> Result<serde_json::Map<String, serde_json::Value>, TemplateError> {
        self.values
            .iter()
            .map(|(name, value)| {
                value_to_json(value, name).map(|json| (name.clone(), json)).map_err(|e| {
                    TemplateError::RenderFailed {
                        message: format!("binding '{}' cannot be used in templates: {}", name, e),
                        location: Box::default(),
                    }
                })
            })
            .collect()
    }

    /// Convert into a Tera context.
    pub fn to_context(&self) -> Result<TeraContext, TemplateError> {
        let mut context = TeraContext::new();
        for (name, value) in self.to_json()? {
            context.insert(name, &value);
        }
        Ok(context)
    }
}

impl FromIterator<(String, Value)> for VariableBindings {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
