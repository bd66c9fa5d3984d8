//! Line-level predicates over raw document text.
//!
//! These look at one line at a time and never parse YAML, so they can be used
//! on text that still contains template actions.

use regex::Regex;
use std::sync::LazyLock;

use crate::constants::EXTENSION_PREFIX;

/// `x-` followed by a name of letters, digits, `.`, `_` or `-`, then `:`.
static EXTENSION_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^x-([a-zA-Z0-9._\-]+)\s*:").expect("extension declaration pattern is valid")
});

/// Whether the line is a comment: `#` after trimming surrounding whitespace.
#[must_use]
pub fn is_comment(line: &str) -> bool {
    line.trim().starts_with('#')
}

/// Whether the line starts a new top-level key.
///
/// A top-level key line has no leading whitespace, is not blank and is not a
/// comment.
#[must_use]
pub fn is_top_level_key(line: &str) -> bool {
    let trimmed = line.trim_start();
    !trimmed.trim_end().is_empty() && trimmed.len() == line.len() && !is_comment(line)
}

/// Stricter variant of [`is_top_level_key`] that also excludes extension
/// declarations.
#[must_use]
pub fn is_plain_top_level_key(line: &str) -> bool {
    is_top_level_key(line) && !line.starts_with(EXTENSION_PREFIX)
}

/// Match an extension declaration and capture its name without the prefix.
///
/// ```rust
/// use yamladapt::sections::extension_declaration;
///
/// assert_eq!(extension_declaration("x-db.pool-size: 4"), Some("db.pool-size"));
/// assert_eq!(extension_declaration("  x-nested: 1"), None);
/// ```
#[must_use]
pub fn extension_declaration(line: &str) -> Option<&str> {
    EXTENSION_DECLARATION
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str())
}

/// Whether the line declares an extension field.
#[must_use]
pub fn is_extension_declaration(line: &str) -> bool {
    extension_declaration(line).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_comment() {
        assert!(is_comment("# note"));
        assert!(is_comment("    # indented note\n"));
        assert!(is_comment("#{ if $x }"));
        assert!(!is_comment("key: value # trailing"));
        assert!(!is_comment(""));
    }

    #[test]
    fn test_is_top_level_key() {
        assert!(is_top_level_key("apps:\n"));
        assert!(is_top_level_key("x-vars:"));
        assert!(!is_top_level_key("  nested: 1"));
        assert!(!is_top_level_key("\tnested: 1"));
        assert!(!is_top_level_key("\n"));
        assert!(!is_top_level_key("   \n"));
        assert!(!is_top_level_key("# comment"));
    }

    #[test]
    fn test_plain_top_level_key_excludes_extensions() {
        assert!(is_plain_top_level_key("apps:"));
        assert!(!is_plain_top_level_key("x-vars:"));
    }

    #[test]
    fn test_extension_declaration_captures_name() {
        assert_eq!(extension_declaration("x-foo: #{$ENV}\n"), Some("foo"));
        assert_eq!(extension_declaration("x-with_under.dot-dash   :"), Some("with_under.dot-dash"));
        assert_eq!(extension_declaration("x-anchor: &anchor"), Some("anchor"));
    }

    #[test]
    fn test_extension_declaration_rejects_non_matches() {
        assert_eq!(extension_declaration("x-: 1"), None);
        assert_eq!(extension_declaration(" x-foo: 1"), None);
        assert_eq!(extension_declaration("x-foo bar: 1"), None);
        assert_eq!(extension_declaration("y-foo: 1"), None);
        assert_eq!(extension_declaration("x-foo"), None);
        assert!(!is_extension_declaration("apps:"));
    }
}
