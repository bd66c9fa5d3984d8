//! Arguments and output helpers shared by the subcommands.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::config::AdapterConfig;
use crate::core::AdaptError;
use crate::diagnostics::Warning;
use crate::include::resolve_includes;
use crate::templating::Environment;
use crate::utils::fs::absolute_path;

/// `FILE` value selecting standard input.
pub const STDIN_ARG: &str = "-";

/// Document name used for standard input without `--filename`.
const STDIN_NAME: &str = "stdin";

/// The input document.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Document to read, or `-` for standard input
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Name of the document for include resolution and diagnostics [default: FILE]
    #[arg(long, value_name = "NAME")]
    pub filename: Option<String>,
}

/// The environment a document is rendered with.
#[derive(Args, Debug, Clone, Default)]
pub struct EnvArgs {
    /// Add an environment entry (repeatable, later entries win)
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env_entry)]
    pub env: Vec<String>,

    /// Do not read the process environment
    #[arg(long)]
    pub no_process_env: bool,
}

impl InputArgs {
    pub fn is_stdin(&self) -> bool {
        self.file == STDIN_ARG
    }

    /// Name the pipeline sees as the `filename` option.
    pub fn document_name(&self) -> String {
        match &self.filename {
            Some(name) => name.clone(),
            None if self.is_stdin() => STDIN_NAME.to_string(),
            None => self.file.clone(),
        }
    }

    /// Path used to look for a configuration file, if the document has one.
    pub fn document_path(&self) -> Option<PathBuf> {
        match &self.filename {
            Some(name) => Some(PathBuf::from(name)),
            None if self.is_stdin() => None,
            None => Some(PathBuf::from(&self.file)),
        }
    }

    /// Load the explicit configuration file, or the one next to the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn load_config(&self, explicit: Option<&Path>) -> Result<AdapterConfig> {
        let document = self.document_path();
        Ok(AdapterConfig::discover(explicit, document.as_deref())?
            .map(|(_, config)| config)
            .unwrap_or_default())
    }

    /// Read the document bytes.
    ///
    /// # Errors
    ///
    /// Returns an error naming the file when it cannot be read.
    pub fn read_body(&self) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        if self.is_stdin() {
            std::io::stdin().read_to_end(&mut body).context("Failed to read standard input")?;
        } else {
            body = std::fs::read(&self.file)
                .with_context(|| format!("Failed to read document: {}", self.file))?;
        }
        Ok(body)
    }

    /// Read the document and resolve its includes.
    ///
    /// # Errors
    ///
    /// Returns read, encoding and include errors.
    pub fn merged_text(&self) -> Result<String> {
        let name = self.document_name();
        let body = self.read_body()?;
        let text = String::from_utf8(body).map_err(|e| AdaptError::InvalidDocument {
            reason: format!("{name} is not valid UTF-8: {e}"),
        })?;

        let root = absolute_path(Path::new(&name), Path::new("."))?;
        let base_dir = root.parent().unwrap_or(Path::new("/"));
        Ok(resolve_includes(&text, base_dir, std::slice::from_ref(&root))?)
    }
}

impl EnvArgs {
    /// Process environment (unless disabled), then configuration entries,
    /// then `--env` entries.
    pub fn environment(&self, config: &AdapterConfig) -> Environment {
        let mut environment = if self.no_process_env {
            Environment::new()
        } else {
            Environment::from_process()
        };
        for entry in config.env_entries() {
            environment.push(entry);
        }
        for entry in &self.env {
            environment.push(entry.clone());
        }
        environment
    }
}

fn parse_env_entry(entry: &str) -> Result<String, String> {
    match entry.split_once('=') {
        Some((key, _)) if !key.is_empty() => Ok(entry.to_string()),
        _ => Err(format!("expected KEY=VALUE, got '{entry}'")),
    }
}

/// Print warnings to stderr, one per line.
pub fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("{}: {}", "warning".yellow().bold(), warning);
    }
}

/// Write `content` followed by a newline to `path`, or to stdout.
///
/// # Errors
///
/// Returns an error naming the file when it cannot be written.
pub fn write_output(path: Option<&Path>, content: &[u8]) -> Result<()> {
    let mut line = content.to_vec();
    line.push(b'\n');

    match path {
        Some(path) => std::fs::write(path, &line)
            .with_context(|| format!("Failed to write output: {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&line).context("Failed to write to standard output")?;
            stdout.flush().context("Failed to write to standard output")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(file: &str) -> InputArgs {
        InputArgs {
            file: file.to_string(),
            filename: None,
        }
    }

    #[test]
    fn test_document_name() {
        assert_eq!(input("conf/app.yaml").document_name(), "conf/app.yaml");
        assert_eq!(input("-").document_name(), "stdin");

        let mut named = input("-");
        named.filename = Some("conf/app.yaml".to_string());
        assert_eq!(named.document_name(), "conf/app.yaml");
        assert_eq!(named.document_path(), Some(PathBuf::from("conf/app.yaml")));
        assert_eq!(input("-").document_path(), None);
    }

    #[test]
    fn test_environment_layering() {
        let args = EnvArgs {
            env: vec!["STAGE=cli".to_string()],
            no_process_env: true,
        };
        let mut config = AdapterConfig::default();
        config.env.insert("STAGE".to_string(), "config".to_string());
        config.env.insert("REGION".to_string(), "eu".to_string());

        let environment = args.environment(&config);
        assert_eq!(environment.get("STAGE"), Some("cli"));
        assert_eq!(environment.get("REGION"), Some("eu"));
        assert_eq!(environment.entries().len(), 3);
    }

    #[test]
    fn test_parse_env_entry() {
        assert_eq!(parse_env_entry("A=1").unwrap(), "A=1");
        assert_eq!(parse_env_entry("A=").unwrap(), "A=");
        assert!(parse_env_entry("A").is_err());
        assert!(parse_env_entry("=1").is_err());
    }
}
