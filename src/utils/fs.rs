//! File system helpers with path context on every error.

use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::DOCUMENT_EXTENSIONS;
use crate::core::{AdaptError, FileOperation, Result};

/// Normalizes a path by resolving `.` and `..` components.
///
/// This is purely lexical: symbolic links are not resolved and the path does
/// not need to exist. A `..` at the root is dropped.
///
/// # Examples
///
/// ```rust
/// use yamladapt::utils::fs::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// let path = Path::new("/foo/./bar/../baz");
/// assert_eq!(normalize_path(path), PathBuf::from("/foo/baz"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Resolve `path` against `base` and make it absolute and normalized.
///
/// A relative `base` is itself resolved against the working directory.
///
/// # Errors
///
/// Returns [`AdaptError::Io`] if the working directory cannot be determined.
pub fn absolute_path(path: &Path, base: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let absolute = std::path::absolute(&joined)
        .map_err(|e| AdaptError::io(FileOperation::Resolve, &joined, e))?;
    Ok(normalize_path(&absolute))
}

/// Read a whole document as UTF-8 text.
///
/// # Errors
///
/// Returns [`AdaptError::Io`] if the file cannot be read and
/// [`AdaptError::InvalidDocument`] if it is not UTF-8.
pub fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| AdaptError::io(FileOperation::Read, path, e))?;
    String::from_utf8(bytes).map_err(|_| AdaptError::InvalidDocument {
        reason: format!("{} is not valid UTF-8", path.display()),
    })
}

/// Whether `path` names a directory.
///
/// # Errors
///
/// Returns [`AdaptError::Io`] if the path cannot be inspected, including when
/// it does not exist.
pub fn is_directory(path: &Path) -> Result<bool> {
    fs::metadata(path)
        .map(|metadata| metadata.is_dir())
        .map_err(|e| AdaptError::io(FileOperation::Metadata, path, e))
}

/// Whether the file name carries one of the document extensions.
#[must_use]
pub fn is_document_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
}

/// All document files below `dir`, depth first, sorted by file name.
///
/// Files without a document extension are skipped.
///
/// # Errors
///
/// Returns [`AdaptError::Io`] if any directory in the tree cannot be read.
pub fn document_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            AdaptError::io(FileOperation::ReadDir, path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if is_document_file(entry.path()) {
            files.push(entry.into_path());
        } else {
            tracing::trace!("skipping non-document file {}", entry.path().display());
        }
    }

    Ok(files)
}
