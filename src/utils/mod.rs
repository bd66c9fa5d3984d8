//! Utilities shared by the pipeline stages
//!
//! - [`fs`] - path normalization and file/directory reads that report the
//!   offending path on failure

pub mod fs;

pub use fs::{absolute_path, document_files_in, normalize_path, read_document};
