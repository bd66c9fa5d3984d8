//! Raw-text section handling.
//!
//! - [`classifier`] - pure predicates over a single line
//! - [`extractor`] - splits a document into matched top-level sections and the rest

pub mod classifier;
pub mod extractor;

pub use classifier::{
    extension_declaration, is_comment, is_extension_declaration, is_plain_top_level_key,
    is_top_level_key,
};
pub use extractor::{Sections, extract_sections};
