//! Templating engine for documents.
//!
//! Documents embed template actions between `#{` and `}`. Rendering happens
//! in three steps:
//!
//! 1. [`translate`] rewrites the document into Tera source (see [`syntax`])
//! 2. an environment preamble declares one local per usable `KEY=VALUE` entry
//! 3. Tera renders the result against the [`VariableBindings`] with the
//!    function library from [`filters`] registered
//!
//! # Supported Features
//!
//! - Variable substitution: `#{ $name }`
//! - Conditional logic: `#{ if $debug }...#{ else }...#{ end }`
//! - Loops: `#{ for host in $hosts }...#{ end }`
//! - Assignment: `#{ $port := 8080 }`
//! - Tera filters and the library helpers: `#{ $name | upper | quote }`
//!
//! # Examples
//!
//! ```rust
//! use yamladapt::templating::{Environment, VariableBindings, render};
//!
//! let env = Environment::from_entries(["STAGE=prod"]);
//! let out = render("db: app-#{ $STAGE }\n", &VariableBindings::new(), &env, None).unwrap();
//! assert_eq!(out, "db: app-prod\n");
//! ```

pub mod context;
pub mod error;
pub mod filters;
pub mod renderer;
pub mod syntax;

pub use context::{Environment, VariableBindings, is_template_identifier};
pub use error::{ErrorLocation, TemplateError};
pub use renderer::{TemplateRenderer, environment_preamble, render};
pub use syntax::translate;
