//! Include directives.
//!
//! A document pulls in other documents with a top-level `include` list:
//!
//! ```yaml
//! include:
//!   - base.yaml                     # a file, relative to this document
//!   - path: conf.d                  # a directory: every .yaml/.yml below it
//!   - path: [extra.yaml, /etc/app/site.yaml]
//! ```
//!
//! Each entry is either a path string or a mapping with a `path` field holding
//! a string or a list of strings. The directive is parsed by
//! [`parse_include_directive`] and carried out by [`resolve_includes`].

pub mod resolver;

use serde_yaml::Value;

use crate::constants::{INCLUDE_KEY, INCLUDE_PATH_FIELD};
use crate::core::{AdaptError, Result};
use crate::document::value_kind;

pub use resolver::resolve_includes;

/// One entry of the include list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeRequest {
    /// Paths as written, resolved later against the including document
    pub paths: Vec<String>,
}

impl IncludeRequest {
    #[must_use]
    pub fn single(path: impl Into<String>) -> Self {
        Self {
            paths: vec![path.into()],
        }
    }
}

fn format_error(message: String) -> AdaptError {
    AdaptError::IncludeFormat {
        message,
    }
}

/// Parse the value of the `include` key into requests, in order.
///
/// A `null` value is an empty directive.
///
/// # Errors
///
/// Returns [`AdaptError::IncludeFormat`] naming the offending index, field
/// and value kind when the directive has the wrong shape.
///
/// # Examples
///
/// ```rust
/// use yamladapt::include::{IncludeRequest, parse_include_directive};
///
/// let value = serde_yaml::from_str("[a.yaml, {path: [b.yaml, c.yaml]}]").unwrap();
/// let requests = parse_include_directive(&value).unwrap();
/// assert_eq!(requests[0], IncludeRequest::single("a.yaml"));
/// assert_eq!(requests[1].paths, vec!["b.yaml", "c.yaml"]);
/// ```
pub fn parse_include_directive(value: &Value) -> Result<Vec<IncludeRequest>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        other => {
            return Err(format_error(format!(
                "{INCLUDE_KEY} must be a list, got {}",
                value_kind(other)
            )));
        }
    };

    items.iter().enumerate().map(|(index, item)| parse_request(index, item)).collect()
}

fn parse_request(index: usize, item: &Value) -> Result<IncludeRequest> {
    match item {
        Value::String(path) => Ok(IncludeRequest::single(path.clone())),
        Value::Mapping(mapping) => {
            let Some(paths) = mapping.get(INCLUDE_PATH_FIELD) else {
                return Err(format_error(format!(
                    "{INCLUDE_KEY}[{index}] missing required '{INCLUDE_PATH_FIELD}' field"
                )));
            };
            parse_paths(index, paths).map(|paths| IncludeRequest {
                paths,
            })
        }
        other => Err(format_error(format!(
            "{INCLUDE_KEY}[{index}] must be a string or mapping, got {}",
            value_kind(other)
        ))),
    }
}

fn parse_paths(index: usize, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(path) => Ok(vec![path.clone()]),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(j, item)| match item {
                Value::String(path) => Ok(path.clone()),
                other => Err(format_error(format!(
                    "{INCLUDE_KEY}[{index}].{INCLUDE_PATH_FIELD}[{j}] must be a string, got {}",
                    value_kind(other)
                ))),
            })
            .collect(),
        other => Err(format_error(format!(
            "{INCLUDE_KEY}[{index}].{INCLUDE_PATH_FIELD} must be a string or list of strings, got {}",
            value_kind(other)
        ))),
    }
}
