//! Recursive include resolution with cycle detection.
//!
//! Every included file is resolved before it is merged, so its own includes
//! are already folded in. The inclusion context is the chain of absolute
//! paths from the root document to the file being resolved. Each branch gets
//! its own copy, so siblings never see each other's entries and only a real
//! ancestor loop is reported as circular.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::parse_include_directive;
use crate::constants::INCLUDE_KEY;
use crate::core::{AdaptError, Result};
use crate::document::{Document, merge_documents, parse_document, to_yaml};
use crate::utils::fs::{absolute_path, document_files_in, is_directory, read_document};

/// A line that could hold the `include` key of a block or flow mapping root.
///
/// The key may follow a byte order mark, a `---` document marker or a `?`
/// explicit key indicator. A flow mapping root may open on any line.
static INCLUDE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^\x{FEFF}?(?:---[ \t]+)?(?:\?[ \t]*)?(?:["']?include["']?(?:\s*:|[ \t]*$)|\{)"#,
    )
    .expect("include candidate pattern is valid")
});

/// Resolve the include directive of `body`.
///
/// Relative include paths are resolved against `base_dir`. `context` is the
/// inclusion chain, root first; it must hold absolute, normalized paths.
///
/// A body without an `include` key is returned unchanged. Otherwise every
/// requested file is resolved recursively and deep-merged into the document,
/// in directive order, and the merged document is returned as YAML without
/// the `include` key.
///
/// # Errors
///
/// Returns [`AdaptError::CircularInclude`] when a file is already in
/// `context`, and propagates I/O, parse, directive and merge errors. Errors
/// raised for an included file are wrapped with its path.
pub fn resolve_includes(body: &str, base_dir: &Path, context: &[PathBuf]) -> Result<String> {
    if !INCLUDE_CANDIDATE.is_match(body) {
        return Ok(body.to_string());
    }

    let name = context.last().map_or_else(|| "document".to_string(), |p| p.display().to_string());
    let mut document = parse_document(body, &name)?;
    let Some(directive) = document.remove(INCLUDE_KEY) else {
        return Ok(body.to_string());
    };

    for request in parse_include_directive(&directive)? {
        for path in &request.paths {
            let target = absolute_path(Path::new(path), base_dir)?;
            let files = if is_directory(&target)? {
                document_files_in(&target)?
            } else {
                vec![target]
            };

            for file in files {
                include_file(&mut document, &file, context)?;
            }
        }
    }

    to_yaml(&document)
}

fn include_file(document: &mut Document, file: &Path, context: &[PathBuf]) -> Result<()> {
    if context.iter().any(|ancestor| ancestor == file) {
        return Err(AdaptError::CircularInclude {
            path: file.to_path_buf(),
            chain: context.to_vec(),
        });
    }

    tracing::debug!(depth = context.len(), "including {}", file.display());

    let text = read_document(file)?;
    let mut branch = context.to_vec();
    branch.push(file.to_path_buf());
    let base_dir = file.parent().unwrap_or(Path::new("/"));

    let resolved = resolve_includes(&text, base_dir, &branch)
        .map_err(|e| AdaptError::include("resolve", file, e))?;
    let included = parse_document(&resolved, &file.display().to_string())
        .map_err(|e| AdaptError::include("parse", file, e))?;
    merge_documents(document, included).map_err(|e| AdaptError::include("merge", file, e))
}
