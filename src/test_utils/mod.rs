//! Test utilities for yamladapt
//!
//! Helpers shared by unit and integration tests: one-time logging setup and
//! temporary document trees for include graphs.
//!
//! # Example
//!
//! ```rust,no_run
//! use yamladapt::test_utils::DocumentTree;
//!
//! let tree = DocumentTree::new(&[
//!     ("main.yaml", "include: [base.yaml]\n"),
//!     ("base.yaml", "name: app\n"),
//! ]);
//! let json = tree.adapt("main.yaml", &[]).unwrap();
//! assert_eq!(json, serde_json::json!({"name": "app"}));
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::adapt::{AdaptOptions, Adapter};
use crate::core::AdaptError;
use crate::templating::Environment;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set that level is used;
/// otherwise `RUST_LOG` is honored, and without it nothing is logged.
///
/// ```bash
/// RUST_LOG=yamladapt=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// A temporary directory of documents.
///
/// The directory is removed when the tree is dropped.
pub struct DocumentTree {
    dir: TempDir,
}

impl DocumentTree {
    /// Create a tree from `(relative path, content)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or a file cannot be created.
    pub fn new(files: &[(&str, &str)]) -> Self {
        let tree = Self {
            dir: TempDir::new().expect("create temp dir"),
        };
        for (name, content) in files {
            tree.write(name, content);
        }
        tree
    }

    /// Write one file, creating parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write document");
        path
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Adapt the document `name` with an explicit environment.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error; warnings are dropped.
    ///
    /// # Panics
    ///
    /// Panics if the document cannot be read or the output is not JSON.
    pub fn adapt(&self, name: &str, env: &[&str]) -> Result<serde_json::Value, AdaptError> {
        let path = self.path(name);
        let body = fs::read(&path).expect("read document");
        let options = AdaptOptions::new()
            .with_filename(path.to_string_lossy())
            .with_env(Environment::from_entries(env.iter().copied()));

        let output = Adapter::new().adapt(&body, &options).output?;
        Ok(serde_json::from_slice(&output).expect("adapter output is JSON"))
    }
}
