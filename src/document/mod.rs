//! Structural document primitives.
//!
//! A document is a YAML mapping ([`Document`]) whose values are
//! [`serde_yaml::Value`]s. This module owns the parse/serialize boundary of
//! the pipeline:
//!
//! - [`parse_document`] - YAML text to [`Document`], with aliases and merge
//!   keys (`<<`) resolved
//! - [`to_yaml`] - [`Document`] back to YAML text (used after include merging)
//! - [`to_json`] - [`Document`] to the JSON wire format
//!
//! The deep-merge rule used by includes lives in [`merge`].

pub mod merge;

use serde_yaml::{Mapping, Value};

use crate::core::{AdaptError, Result};
use crate::sections::is_comment;

pub use merge::merge_documents;

/// A parsed document: an insertion-ordered mapping of keys to values.
pub type Document = Mapping;

/// Parse YAML text into a [`Document`].
///
/// An empty document (or one that is just `null`) yields an empty mapping.
/// Anchors and aliases are resolved by the parser, and merge keys are applied
/// so later stages only ever see plain values.
///
/// # Errors
///
/// Returns [`AdaptError::Parse`] for malformed YAML and
/// [`AdaptError::InvalidDocument`] when the root is not a mapping.
pub fn parse_document(text: &str, context: &str) -> Result<Document> {
    if text.lines().all(|line| line.trim().is_empty() || is_comment(line)) {
        return Ok(Mapping::new());
    }

    let mut value: Value = serde_yaml::from_str(text).map_err(|source| AdaptError::Parse {
        context: context.to_string(),
        source,
    })?;

    value.apply_merge().map_err(|source| AdaptError::Parse {
        context: context.to_string(),
        source,
    })?;

    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(AdaptError::InvalidDocument {
            reason: format!("{context} must be a mapping at the root, found {}", value_kind(&other)),
        }),
    }
}

/// Serialize a [`Document`] back to YAML text.
///
/// # Errors
///
/// Returns [`AdaptError::InvalidDocument`] if the document cannot be
/// represented as YAML.
pub fn to_yaml(document: &Document) -> Result<String> {
    if document.is_empty() {
        return Ok(String::new());
    }
    serde_yaml::to_string(document).map_err(|e| AdaptError::InvalidDocument {
        reason: format!("cannot serialize document as YAML: {e}"),
    })
}

/// Serialize a [`Document`] to JSON bytes.
///
/// Scalar keys are stringified, YAML tags are dropped in favor of the tagged
/// value.
///
/// # Errors
///
/// Returns [`AdaptError::InvalidDocument`] for values JSON cannot carry:
/// sequence or mapping keys and non-finite floats.
pub fn to_json(document: &Document, pretty: bool) -> Result<Vec<u8>> {
    let value = mapping_to_json(document, "")?;
    let bytes = if pretty {
        serde_json::to_vec_pretty(&value)
    } else {
        serde_json::to_vec(&value)
    };
    bytes.map_err(|e| AdaptError::InvalidDocument {
        reason: format!("cannot serialize document as JSON: {e}"),
    })
}

/// Convert a YAML value to its JSON equivalent.
///
/// `path` is the dotted key path of `value`, used in error messages.
pub fn value_to_json(value: &Value, path: &str) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(n, path)?,
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => serde_json::Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| value_to_json(item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Mapping(mapping) => mapping_to_json(mapping, path)?,
        Value::Tagged(tagged) => value_to_json(&tagged.value, path)?,
    })
}

fn mapping_to_json(mapping: &Mapping, path: &str) -> Result<serde_json::Value> {
    let mut object = serde_json::Map::with_capacity(mapping.len());
    for (key, value) in mapping {
        let label = json_key(key, path)?;
        let child_path = join_key_path(path, &label);
        object.insert(label, value_to_json(value, &child_path)?);
    }
    Ok(serde_json::Value::Object(object))
}

fn json_key(key: &Value, path: &str) -> Result<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(key_label(key)),
        Value::Tagged(tagged) => json_key(&tagged.value, path),
        other => Err(AdaptError::InvalidDocument {
            reason: format!(
                "{} keys cannot be represented in JSON (under '{}')",
                value_kind(other),
                if path.is_empty() { "<root>" } else { path }
            ),
        }),
    }
}

fn number_to_json(number: &serde_yaml::Number, path: &str) -> Result<serde_json::Value> {
    if let Some(i) = number.as_i64() {
        return Ok(serde_json::Value::from(i));
    }
    if let Some(u) = number.as_u64() {
        return Ok(serde_json::Value::from(u));
    }
    number
        .as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
        .ok_or_else(|| AdaptError::InvalidDocument {
            reason: format!("value {number} at '{path}' cannot be represented in JSON"),
        })
}

/// Name the kind of a value for error messages.
#[must_use]
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

/// Render a mapping key as text.
#[must_use]
pub fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| value_kind(other).to_string()),
    }
}

/// Append `key` to a dotted key path.
#[must_use]
pub fn join_key_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}
