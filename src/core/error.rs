//! Error handling for yamladapt
//!
//! This module provides the error taxonomy of the adapt pipeline and the
//! user-friendly rendering used by the CLI. The error system follows two rules:
//! 1. **Strongly-typed errors** ([`AdaptError`]) so callers can match on the failure
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions
//!
//! # Error Categories
//!
//! - **Options**: [`AdaptError::MissingOption`], [`AdaptError::InvalidOption`]
//! - **File System**: [`AdaptError::Io`], always carrying the offending path
//! - **Format**: [`AdaptError::Parse`], [`AdaptError::InvalidDocument`],
//!   [`AdaptError::IncludeFormat`], [`AdaptError::ExtensionName`]
//! - **Semantic**: [`AdaptError::CircularInclude`], [`AdaptError::MergeConflict`]
//! - **Template**: [`AdaptError::Template`]
//!
//! Every variant is fatal. The only degraded path in the pipeline is an
//! environment key that cannot be used as a template identifier, which becomes
//! a [`Warning`](crate::diagnostics::Warning) instead of an error.
//!
//! # Examples
//!
//! ```rust,no_run
//! use yamladapt::core::{AdaptError, user_friendly_error};
//!
//! let error = AdaptError::MissingOption { name: "filename".to_string() };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestion
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::templating::TemplateError;

/// File system operations the pipeline performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a document completely
    Read,
    /// Listing a directory named by an include
    ReadDir,
    /// Getting file metadata to tell files from directories
    Metadata,
    /// Resolving a relative path against the working directory
    Resolve,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::ReadDir => write!(f, "reading directory"),
            FileOperation::Metadata => write!(f, "getting metadata of"),
            FileOperation::Resolve => write!(f, "resolving path"),
        }
    }
}

/// The main error type for adapt operations
///
/// Each variant describes one failure mode and carries the path, key or index
/// needed to locate the problem in the user's documents.
#[derive(Error, Debug)]
pub enum AdaptError {
    /// A required option was not supplied
    #[error("missing {name} option")]
    MissingOption {
        /// Name of the option
        name: String,
    },

    /// An option was supplied with the wrong type
    #[error("option '{name}' must be {expected}, got {found}")]
    InvalidOption {
        name: String,
        expected: String,
        found: String,
    },

    /// A file or directory could not be accessed
    #[error("File system error while {operation} '{}'", .path.display())]
    Io {
        operation: FileOperation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structural parse failure of a document
    #[error("failed to parse {context}")]
    Parse {
        /// What was being parsed (a file path or a pipeline stage)
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed but cannot be processed or serialized
    #[error("invalid document: {reason}")]
    InvalidDocument {
        reason: String,
    },

    /// The include directive has the wrong shape
    #[error("{message}")]
    IncludeFormat {
        message: String,
    },

    /// An extension field name is not usable as a template variable
    #[error("invalid extension field name '{name}': {reason}")]
    ExtensionName {
        name: String,
        reason: String,
    },

    /// An included file is already being resolved by one of its ancestors
    #[error("circular include detected: {}", .path.display())]
    CircularInclude {
        path: PathBuf,
        /// Inclusion context at the time the cycle was found, root first
        chain: Vec<PathBuf>,
    },

    /// Two documents disagree on the value of a key
    #[error("conflict at key \"{key}\": cannot merge {target_kind} with {source_kind}")]
    MergeConflict {
        /// Dotted path of the conflicting key
        key: String,
        target_kind: &'static str,
        source_kind: &'static str,
    },

    /// A failure while processing an included file
    #[error("failed to {action} include {}", .path.display())]
    Include {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: Box<AdaptError>,
    },

    /// Template syntax or evaluation failure
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl AdaptError {
    /// Wrap an error raised while processing the include at `path`.
    pub fn include(action: &'static str, path: impl Into<PathBuf>, source: AdaptError) -> Self {
        AdaptError::Include {
            action,
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Build an I/O error carrying the operation and path.
    pub fn io(operation: FileOperation, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AdaptError::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// The innermost error, looking through include wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &AdaptError {
        match self {
            AdaptError::Include {
                source,
                ..
            } => source.root_cause(),
            other => other,
        }
    }
}

/// Error wrapper carrying user-facing details and suggestions
///
/// The CLI converts every failure into an `ErrorContext` before printing it.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Primary error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details, usually the error's cause chain
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// The error's cause chain becomes the details. Known [`AdaptError`] variants
/// get a suggestion describing the usual fix.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let mut context = ErrorContext::new(error.to_string());
    if !causes.is_empty() {
        context = context.with_details(causes.join("\n  → "));
    }

    let Some(adapt_error) = error.downcast_ref::<AdaptError>() else {
        return context;
    };

    match adapt_error.root_cause() {
        AdaptError::MissingOption {
            ..
        } => context.with_suggestion("Pass the document path so includes can be resolved"),
        AdaptError::CircularInclude {
            chain,
            ..
        } => {
            let chain = chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>();
            context.with_suggestion(format!(
                "Remove one include from the cycle (include chain: {})",
                chain.join(" → ")
            ))
        }
        AdaptError::MergeConflict {
            key,
            ..
        } => context.with_suggestion(format!(
            "Define '{key}' in only one document, or give it the same value everywhere"
        )),
        AdaptError::IncludeFormat {
            ..
        } => context.with_suggestion(
            "Write include as a list of paths or of mappings with a 'path' field",
        ),
        AdaptError::ExtensionName {
            ..
        } => context
            .with_suggestion("Use only letters, digits and '_' after the 'x-' prefix in strict mode"),
        AdaptError::Template(template_error) => {
            let mut context = ErrorContext::new(template_error.to_string())
                .with_details(template_error.format_with_context());
            if let Some(suggestion) = template_error.suggestion() {
                context = context.with_suggestion(suggestion);
            }
            context
        }
        _ => context,
    }
}
