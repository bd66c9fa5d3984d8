//! Non-fatal diagnostics collected while adapting a document.
//!
//! Warnings are a side channel: they never abort the pipeline. A single
//! [`WarningCollector`] is created per adapt run and handed by `&mut` to the
//! stages allowed to emit warnings.

use std::fmt;

use crate::constants::UNKNOWN_LINE;

/// An immutable diagnostic record attributed to a source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Document the warning is attributed to.
    pub file: String,
    /// 1-based line, or [`UNKNOWN_LINE`] when the line is not known.
    pub line: i64,
    /// Directive that produced the warning; empty when not applicable.
    pub directive: String,
    /// Human-readable message.
    pub message: String,
}

impl Warning {
    /// Whether the warning carries a real line number.
    #[must_use]
    pub fn has_line(&self) -> bool {
        self.line != UNKNOWN_LINE
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.directive.is_empty() {
            write!(f, "{}:{}: {}", self.file, self.line, self.message)
        } else {
            write!(f, "{}:{} ({}): {}", self.file, self.line, self.directive, self.message)
        }
    }
}

/// Accumulates warnings for one document.
#[derive(Debug, Clone)]
pub struct WarningCollector {
    filename: String,
    warnings: Vec<Warning>,
}

impl WarningCollector {
    /// Create an empty collector attributing warnings to `filename`.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            warnings: Vec::new(),
        }
    }

    /// Record a warning. Every warning is mirrored to the log.
    pub fn add(&mut self, line: i64, directive: impl Into<String>, message: impl Into<String>) {
        let warning = Warning {
            file: self.filename.clone(),
            line,
            directive: directive.into(),
            message: message.into(),
        };
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_directive() {
        let mut collector = WarningCollector::new("./testdata/app.yaml");
        collector.add(UNKNOWN_LINE, "", "environment variable \"INVALID%\" cannot be used in template");

        let warnings = collector.into_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "./testdata/app.yaml:-1: environment variable \"INVALID%\" cannot be used in template"
        );
        assert!(!warnings[0].has_line());
    }

    #[test]
    fn test_display_with_directive() {
        let mut collector = WarningCollector::new("app.yaml");
        collector.add(12, "include", "skipped");

        assert_eq!(collector.warnings()[0].to_string(), "app.yaml:12 (include): skipped");
        assert!(collector.warnings()[0].has_line());
    }

    #[test]
    fn test_collector_preserves_order() {
        let mut collector = WarningCollector::new("f");
        assert!(collector.is_empty());
        collector.add(1, "", "first");
        collector.add(2, "", "second");

        let messages: Vec<_> = collector.warnings().iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
