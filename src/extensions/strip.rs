//! Removal of extension fields from a parsed document.

use serde_yaml::{Mapping, Value};

use super::StripMode;
use crate::constants::EXTENSION_PREFIX;
use crate::document::Document;

/// Whether a mapping key names an extension field.
#[must_use]
pub fn is_extension_key(key: &Value) -> bool {
    key.as_str().is_some_and(|k| k.starts_with(EXTENSION_PREFIX))
}

/// Remove extension fields from `document` according to `mode`.
///
/// # Examples
///
/// ```rust
/// use yamladapt::document::parse_document;
/// use yamladapt::extensions::{StripMode, strip_extensions};
///
/// let mut doc = parse_document("x-a: 1\nb:\n  x-c: 2\n  d: 3\n", "doc").unwrap();
/// strip_extensions(&mut doc, StripMode::Recursive);
/// assert_eq!(doc, parse_document("b:\n  d: 3\n", "doc").unwrap());
/// ```
pub fn strip_extensions(document: &mut Document, mode: StripMode) {
    match mode {
        StripMode::RootOnly => document.retain(|key, _| !is_extension_key(key)),
        StripMode::Recursive => strip_mapping(document),
    }
}

fn strip_mapping(mapping: &mut Mapping) {
    mapping.retain(|key, value| {
        if is_extension_key(key) {
            return false;
        }
        strip_value(value);
        true
    });
}

fn strip_value(value: &mut Value) {
    match value {
        Value::Mapping(mapping) => strip_mapping(mapping),
        Value::Sequence(items) => items.iter_mut().for_each(strip_value),
        Value::Tagged(tagged) => strip_value(&mut tagged.value),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;

    const NESTED: &str = r#"
x-root: 1
service:
  x-inner: 2
  name: web
  routes:
    - x-route-meta: 3
      path: /
"#;

    #[test]
    fn test_recursive_strip_reaches_every_level() {
        let mut doc = parse_document(NESTED, "test").unwrap();
        strip_extensions(&mut doc, StripMode::Recursive);
        let expected = parse_document("service:\n  name: web\n  routes:\n    - path: /\n", "test").unwrap();
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_root_only_strip_keeps_nested_fields() {
        let mut doc = parse_document(NESTED, "test").unwrap();
        strip_extensions(&mut doc, StripMode::RootOnly);
        assert!(!doc.contains_key("x-root"));
        assert_eq!(doc["service"]["x-inner"], Value::from(2));
    }

    #[test]
    fn test_non_string_keys_are_kept() {
        let mut doc = parse_document("1: one\nx-a: 2\n", "test").unwrap();
        strip_extensions(&mut doc, StripMode::Recursive);
        assert_eq!(doc.len(), 1);
    }
}
