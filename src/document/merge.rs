//! Deep merge of included documents.
//!
//! The merge walks the source document key by key and folds it into the target:
//!
//! | target        | source        | result                                  |
//! |---------------|---------------|-----------------------------------------|
//! | absent        | any           | source value inserted verbatim          |
//! | mapping       | mapping       | merged recursively                      |
//! | sequence      | sequence      | concatenated, target items first        |
//! | equal values  | equal values  | unchanged                               |
//! | anything else |               | [`AdaptError::MergeConflict`]           |
//!
//! Merging a document with an identical copy of itself is therefore never an
//! error for scalars and mappings, while sequences grow by concatenation.

use serde_yaml::{Mapping, Value};

use super::{join_key_path, key_label, value_kind};
use crate::core::{AdaptError, Result};

/// Merge `source` into `target`.
///
/// # Errors
///
/// Returns [`AdaptError::MergeConflict`] naming the dotted key path and both
/// value kinds when two values cannot be reconciled. `target` may be partially
/// merged when an error is returned; callers discard it.
///
/// # Examples
///
/// ```rust
/// use yamladapt::document::{merge_documents, parse_document};
///
/// let mut target = parse_document("a: {x: 1}\nlist: [1, 2]\n", "target").unwrap();
/// let source = parse_document("a: {y: 2}\nlist: [3]\n", "source").unwrap();
/// merge_documents(&mut target, source).unwrap();
///
/// let expected = parse_document("a: {x: 1, y: 2}\nlist: [1, 2, 3]\n", "expected").unwrap();
/// assert_eq!(target, expected);
/// ```
pub fn merge_documents(target: &mut Mapping, source: Mapping) -> Result<()> {
    merge_mapping(target, source, "")
}

fn merge_mapping(target: &mut Mapping, source: Mapping, path: &str) -> Result<()> {
    for (key, source_value) in source {
        let key_path = join_key_path(path, &key_label(&key));
        match target.get_mut(&key) {
            None => {
                target.insert(key, source_value);
            }
            Some(target_value) => merge_value(target_value, source_value, &key_path)?,
        }
    }
    Ok(())
}

fn merge_value(target: &mut Value, source: Value, key_path: &str) -> Result<()> {
    match (target, source) {
        (Value::Mapping(target_map), Value::Mapping(source_map)) => {
            merge_mapping(target_map, source_map, key_path)
        }
        (Value::Sequence(target_items), Value::Sequence(source_items)) => {
            target_items.extend(source_items);
            Ok(())
        }
        (target, source) if *target == source => Ok(()),
        (target, source) => Err(AdaptError::MergeConflict {
            key: key_path.to_string(),
            target_kind: value_kind(target),
            source_kind: value_kind(&source),
        }),
    }
}
