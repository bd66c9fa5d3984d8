//! Global constants used throughout the yamladapt codebase.
//!
//! Reserved document keys, template delimiters and option names live here so
//! the pipeline stages agree on them without importing each other.

/// Prefix marking a top-level key as an extension field.
///
/// Extension fields carry template variables and never reach the output.
pub const EXTENSION_PREFIX: &str = "x-";

/// Top-level key holding the include directive.
pub const INCLUDE_KEY: &str = "include";

/// Field of a mapping-form include request that holds its path list.
pub const INCLUDE_PATH_FIELD: &str = "path";

/// Opening delimiter of a template action.
///
/// `#{` keeps templates apart from YAML flow mappings (`{ }`) and from the
/// braces Tera itself would otherwise interpret.
pub const OPENING_DELIM: &str = "#{";

/// Closing delimiter of a template action.
pub const CLOSING_DELIM: char = '}';

/// Line number recorded on a warning whose source line is unknown.
pub const UNKNOWN_LINE: i64 = -1;

/// File extensions picked up when an include path names a directory.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Option naming the input document.
pub const FILENAME_OPTION: &str = "filename";

/// Option overriding the process environment with `KEY=VALUE` entries.
pub const ENV_OPTION: &str = "env";

/// Context entry carrying environment values for the template preamble.
pub const ENV_CONTEXT_KEY: &str = "__env";

/// Configuration file looked up next to the input document.
pub const CONFIG_FILE_NAME: &str = "yamladapt.toml";
