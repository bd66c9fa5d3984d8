//! yamladapt - layered YAML configuration to JSON
//!
//! yamladapt turns a YAML document that is spread over several files and
//! parameterized by templates into a single JSON document.
//!
//! # Pipeline
//!
//! 1. **Includes**: a top-level `include` list names files or directories
//!    whose documents are deep-merged into the includer. Includes nest;
//!    cycles are detected and reported with the inclusion chain.
//! 2. **Extension variables**: top-level keys starting with `x-` are rendered
//!    with the environment and bound as template variables (`x-db-host`
//!    becomes `$db_host`).
//! 3. **Templating**: the merged text is rendered with `#{ }` actions,
//!    backed by Tera.
//! 4. **Stripping**: `x-` keys are removed from the rendered document, which
//!    is then serialized as JSON.
//!
//! ```yaml
//! include:
//!   - base.yaml
//! x-domain: "#{ $DOMAIN | default(value='localhost') }"
//! apps:
//!   http:
//!     servers:
//!       main:
//!         listen: ["#{ $domain }:443"]
//! ```
//!
//! # Modules
//!
//! - [`adapt`] - The pipeline entry point, [`adapt::Adapter`]
//! - [`include`] - Include directives and recursive resolution
//! - [`extensions`] - Extension variable binding and stripping
//! - [`templating`] - `#{ }` templates on top of Tera
//! - [`sections`] - Line classification and top-level section extraction
//! - [`document`] - YAML parse/serialize primitives and deep merge
//! - [`diagnostics`] - Non-fatal warnings
//! - [`core`] - Error types and user-facing error rendering
//! - [`config`] - `yamladapt.toml` defaults for the CLI
//! - [`cli`] - The `yamladapt` command line
//! - [`utils`] - Path and file helpers
//!
//! # Library Use
//!
//! ```rust
//! use yamladapt::adapt::{AdaptOptions, Adapter, Environment};
//!
//! let body = b"x-port: 8080\nport: \"#{ $port }\"\n";
//! let options = AdaptOptions::new()
//!     .with_filename("app.yaml")
//!     .with_env(Environment::from_entries(["STAGE=dev"]));
//!
//! let adaptation = Adapter::new().adapt(body, &options);
//! assert_eq!(adaptation.output.unwrap(), br#"{"port":"8080"}"#);
//! ```

pub mod adapt;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod diagnostics;
pub mod document;
pub mod extensions;
pub mod include;
pub mod sections;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
