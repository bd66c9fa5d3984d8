//! Split raw document text into matched top-level sections and the rest.
//!
//! Extraction works on lines, not on parsed YAML, so the matched sections keep
//! their exact original text: anchors, aliases, block scalars and template
//! actions survive untouched.

use super::classifier::is_top_level_key;

/// The two line streams produced by [`extract_sections`].
///
/// Both are subsequences of the input in original order; concatenating them
/// line by line in input order reproduces the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    /// Lines belonging to sections whose header matched the predicate
    pub matched: String,
    /// Every other line
    pub remaining: String,
}

/// Extract every top-level section whose header line satisfies `predicate`.
///
/// A matching line opens (or continues) a section. Indented, blank and comment
/// lines that follow belong to the open section. The first top-level key that
/// does not match closes it and goes to `remaining`, as do all lines outside a
/// section. A body with no matching line yields an empty `matched`.
///
/// # Examples
///
/// ```rust
/// use yamladapt::sections::{extract_sections, is_extension_declaration};
///
/// let body = "x-port: 8080\napps:\n  http: {}\nx-hosts:\n  - a\n  - b\n";
/// let sections = extract_sections(body, is_extension_declaration);
///
/// assert_eq!(sections.matched, "x-port: 8080\nx-hosts:\n  - a\n  - b\n");
/// assert_eq!(sections.remaining, "apps:\n  http: {}\n");
/// ```
pub fn extract_sections<P>(body: &str, predicate: P) -> Sections
where
    P: Fn(&str) -> bool,
{
    let mut sections = Sections::default();
    let mut in_section = false;

    for line in body.split_inclusive('\n') {
        if predicate(line) {
            sections.matched.push_str(line);
            in_section = true;
        } else if in_section && !is_top_level_key(line) {
            sections.matched.push_str(line);
        } else {
            sections.remaining.push_str(line);
            in_section = false;
        }
    }

    tracing::trace!(
        matched_bytes = sections.matched.len(),
        remaining_bytes = sections.remaining.len(),
        "extracted sections"
    );
    sections
}
