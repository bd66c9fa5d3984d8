//! Core types for yamladapt
//!
//! This module holds the error taxonomy shared by every pipeline stage and
//! the helpers the CLI uses to present failures.
//!
//! - [`AdaptError`] - Enumerated error types covering all pipeline failure modes
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to user-friendly format

pub mod error;

pub use error::{AdaptError, ErrorContext, FileOperation, user_friendly_error};

/// Result alias used throughout the pipeline.
pub type Result<T, E = AdaptError> = std::result::Result<T, E>;
