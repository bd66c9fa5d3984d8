//! Extension variable resolution.

use crate::constants::EXTENSION_PREFIX;
use crate::core::{AdaptError, Result};
use crate::document::{key_label, parse_document};
use crate::sections::{extract_sections, is_extension_declaration};
use crate::templating::{Environment, TemplateRenderer, VariableBindings};

use super::NameMode;

/// Resolve the extension fields of `body` into variable bindings.
///
/// The fields are cut out of the raw text, so anchors and aliases inside them
/// stay intact, then rendered with environment bindings only. Extension values
/// therefore cannot reference each other. No warnings are reported here; the
/// full-document render reports them once.
///
/// # Errors
///
/// Returns a template error if the fields do not render, a parse error if the
/// rendered fields are not valid YAML, and [`AdaptError::ExtensionName`] for
/// names rejected by `names`.
///
/// # Examples
///
/// ```rust
/// use yamladapt::extensions::{NameMode, resolve_extension_vars};
/// use yamladapt::templating::Environment;
///
/// let env = Environment::from_entries(["ENV=bar"]);
/// let bindings = resolve_extension_vars("x-foo: #{$ENV}\n", &env, NameMode::Normalize).unwrap();
/// assert_eq!(bindings.get("foo").and_then(|v| v.as_str()), Some("bar"));
/// ```
pub fn resolve_extension_vars(
    body: &str,
    environment: &Environment,
    names: NameMode,
) -> Result<VariableBindings> {
    let sections = extract_sections(body, is_extension_declaration);
    if sections.matched.is_empty() {
        return Ok(VariableBindings::new());
    }

    let rendered = TemplateRenderer::new(environment)
        .with_source_name("extension fields")
        .render(&sections.matched, &VariableBindings::new(), None)?;
    let fields = parse_document(&rendered, "extension fields")?;

    let bindings = fields
        .into_iter()
        .map(|(key, value)| {
            let label = key_label(&key);
            let name = label.strip_prefix(EXTENSION_PREFIX).unwrap_or(&label);
            Ok((binding_name(name, names)?, value))
        })
        .collect::<Result<VariableBindings>>()?;

    tracing::debug!(count = bindings.len(), "resolved extension variables");
    Ok(bindings)
}

/// Turn an extension field name (without `x-`) into a binding identifier.
///
/// # Errors
///
/// In [`NameMode::Strict`], returns [`AdaptError::ExtensionName`] when the
/// name contains `-` or `.`.
pub fn binding_name(name: &str, mode: NameMode) -> Result<String> {
    match mode {
        NameMode::Normalize => Ok(name.replace('-', "_")),
        NameMode::Strict => match name.chars().find(|c| matches!(c, '-' | '.')) {
            Some(c) => Err(AdaptError::ExtensionName {
                name: name.to_string(),
                reason: format!("'{c}' is not allowed in a variable name"),
            }),
            None => Ok(name.to_string()),
        },
    }
}
