//! Structured template errors.
//!
//! Errors keep the source line (when Tera or the translator knows it) plus a
//! few surrounding lines so the CLI can point at the offending action.

use std::fmt;

/// Template errors with location details
#[derive(Debug)]
pub enum TemplateError {
    /// A `$name` reference with no binding
    VariableNotFound {
        variable: String,
        available_variables: Box<Vec<String>>,
        suggestions: Box<Vec<String>>,
        location: Box<ErrorLocation>,
    },

    /// Malformed action or Tera syntax
    SyntaxError {
        message: String,
        location: Box<ErrorLocation>,
    },

    /// Evaluation failed (filter error, type mismatch, ...)
    RenderFailed {
        message: String,
        location: Box<ErrorLocation>,
    },
}

/// Location information for template errors
#[derive(Debug, Clone, Default)]
pub struct ErrorLocation {
    /// Document being rendered, when known
    pub source_name: Option<String>,
    /// 1-based line number, when known
    pub line_number: Option<usize>,
    /// Lines around the error as `(line number, text)`
    pub context_lines: Option<Vec<(usize, String)>>,
}

impl ErrorLocation {
    #[must_use]
    pub fn at_line(source_name: Option<&str>, line: usize, source: &str) -> Self {
        let lines = extract_context_lines(source, line, 2);
        Self {
            source_name: source_name.map(str::to_string),
            line_number: Some(line),
            context_lines: if lines.is_empty() {
                None
            } else {
                Some(lines)
            },
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::VariableNotFound {
                variable,
                ..
            } => {
                write!(f, "Template variable not found: '{}'", variable)
            }
            TemplateError::SyntaxError {
                message,
                location,
            } => match location.line_number {
                Some(line) => write!(f, "Template syntax error at line {}: {}", line, message),
                None => write!(f, "Template syntax error: {}", message),
            },
            TemplateError::RenderFailed {
                message,
                ..
            } => {
                write!(f, "Template rendering failed: {}", message)
            }
        }
    }
}

impl std::error::Error for TemplateError {}

impl TemplateError {
    /// Build a syntax error located at `line` of `source`.
    pub fn syntax(
        message: impl Into<String>,
        line: usize,
        source: &str,
        source_name: Option<&str>,
    ) -> Self {
        TemplateError::SyntaxError {
            message: message.into(),
            location: Box::new(ErrorLocation::at_line(source_name, line, source)),
        }
    }

    pub fn location(&self) -> &ErrorLocation {
        match self {
            TemplateError::VariableNotFound {
                location,
                ..
            }
            | TemplateError::SyntaxError {
                location,
                ..
            }
            | TemplateError::RenderFailed {
                location,
                ..
            } => location,
        }
    }

    /// A one-line hint for fixing the error.
    #[must_use]
    pub fn suggestion(&self) -> Option<String> {
        match self {
            TemplateError::VariableNotFound {
                suggestions,
                ..
            } => Some(match suggestions.first() {
                Some(closest) => format!("Did you mean '${}'?", closest),
                None => "Declare it as an x- extension field or pass it in the environment"
                    .to_string(),
            }),
            TemplateError::SyntaxError {
                ..
            } => Some(
                "Check #{ } actions for unclosed quotes and unbalanced if/for/end".to_string(),
            ),
            TemplateError::RenderFailed {
                ..
            } => None,
        }
    }

    /// Generate the multi-line message shown by the CLI.
    pub fn format_with_context(&self) -> String {
        let mut msg = String::new();
        let location = self.location();

        match self {
            TemplateError::VariableNotFound {
                variable,
                available_variables,
                suggestions,
                ..
            } => {
                msg.push_str(&format!("Variable: {}\n", variable));
                if !suggestions.is_empty() {
                    msg.push_str("Did you mean one of these?\n");
                    for suggestion in suggestions.iter() {
                        msg.push_str(&format!("  - {}\n", suggestion));
                    }
                }
                if !available_variables.is_empty() {
                    msg.push_str("Available variables:\n");
                    for var in available_variables.iter().take(10) {
                        msg.push_str(&format!("  {}\n", var));
                    }
                    if available_variables.len() > 10 {
                        msg.push_str(&format!(
                            "  ... and {} more\n",
                            available_variables.len() - 10
                        ));
                    }
                }
            }
            TemplateError::SyntaxError {
                message,
                ..
            }
            | TemplateError::RenderFailed {
                message,
                ..
            } => {
                msg.push_str(&format!("Error: {}\n", message));
            }
        }

        if let Some(source) = &location.source_name {
            msg.push_str(&format!("File: {}\n", source));
        }
        if let Some(line) = location.line_number {
            msg.push_str(&format!("Line: {}\n", line));
        }
        if let Some(lines) = &location.context_lines {
            msg.push('\n');
            for (number, text) in lines {
                let marker = if Some(*number) == location.line_number {
                    ">"
                } else {
                    " "
                };
                msg.push_str(&format!("{} {:>4} | {}\n", marker, number, text));
            }
        }

        msg.trim_end().to_string()
    }
}

/// Extract up to `context_size` lines before and after `error_line` (1-based).
pub(crate) fn extract_context_lines(
    content: &str,
    error_line: usize,
    context_size: usize,
) -> Vec<(usize, String)> {
    let lines: Vec<&str> = content.lines().collect();
    let total_lines = lines.len();

    if error_line == 0 || error_line > total_lines {
        return Vec::new();
    }

    let start = error_line.saturating_sub(context_size + 1);
    let end = (error_line + context_size).min(total_lines);

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(idx, line)| (start + idx + 1, line.to_string()))
        .collect()
}
