//! Function library registered on every render.
//!
//! Tera's built-in filters, tests and functions stay available. On top of
//! them documents get the helpers config templates usually reach for:
//!
//! | Name | Kind | Result |
//! |------|------|--------|
//! | `quote` | filter | `"value"` with `"` and `\` escaped |
//! | `squote` | filter | `'value'` |
//! | `nindent(spaces=n)` | filter | newline, then every line indented by `n` |
//! | `b64enc` / `b64dec` | filter | standard base64 |
//! | `sha256sum` | filter | lowercase hex SHA-256 digest |
//! | `to_yaml` | filter | YAML text of the value |
//! | `required(message=...)` | filter | the value, or an error when null or empty |
//! | `get_env(name=..., default=...)` | function | an entry of the adapt environment |
//!
//! # Examples
//!
//! ```yaml
//! x-image: registry.local/app
//! image: #{ $image | quote }
//! checksum: #{ $image | sha256sum }
//! home: #{ get_env(name="HOME", default="/root") }
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tera::{Tera, Value};

use super::context::Environment;

/// Register the library on `tera`, with `get_env` reading `environment`.
pub fn register(tera: &mut Tera, environment: &Environment) {
    tera.register_filter("quote", quote);
    tera.register_filter("squote", squote);
    tera.register_filter("nindent", nindent);
    tera.register_filter("b64enc", b64enc);
    tera.register_filter("b64dec", b64dec);
    tera.register_filter("sha256sum", sha256sum);
    tera.register_filter("to_yaml", to_yaml);
    tera.register_filter("required", required);
    tera.register_function("get_env", create_get_env_function(environment));
}

/// String form of a value: strings as-is, everything else as JSON text.
fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn quote(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = display_string(value).replace('\\', "\\\\").replace('"', "\\\"");
    Ok(Value::String(format!("\"{text}\"")))
}

fn squote(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(format!("'{}'", display_string(value))))
}

fn nindent(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let spaces = match args.get("spaces") {
        Some(spaces) => spaces
            .as_u64()
            .ok_or_else(|| tera::Error::msg("nindent filter expects `spaces` to be a number"))?,
        None => return Err(tera::Error::msg("nindent filter requires a `spaces` argument")),
    };
    let pad = " ".repeat(usize::try_from(spaces).unwrap_or(usize::MAX).min(1024));
    let text = display_string(value);
    Ok(Value::String(format!("\n{pad}{}", text.replace('\n', &format!("\n{pad}")))))
}

fn b64enc(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(STANDARD.encode(display_string(value))))
}

fn b64dec(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let encoded = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("b64dec filter requires a string"))?;
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| tera::Error::msg(format!("b64dec filter error: {e}")))?;
    String::from_utf8(bytes)
        .map(Value::String)
        .map_err(|_| tera::Error::msg("b64dec filter error: decoded bytes are not UTF-8"))
}

fn sha256sum(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let digest = Sha256::digest(display_string(value).as_bytes());
    Ok(Value::String(hex::encode(digest)))
}

fn to_yaml(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let yaml = serde_yaml::to_string(value)
        .map_err(|e| tera::Error::msg(format!("to_yaml filter error: {e}")))?;
    Ok(Value::String(yaml.trim_end_matches('\n').to_string()))
}

fn required(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let missing = match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if missing {
        let message = args
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("required value is missing");
        return Err(tera::Error::msg(message));
    }
    Ok(value.clone())
}

/// Build `get_env` over a snapshot of the adapt environment.
///
/// Tera ships its own `get_env` reading the process environment; this one
/// replaces it so templates only ever see the environment the caller passed.
pub fn create_get_env_function(environment: &Environment) -> impl tera::Function + 'static {
    let entries: HashMap<String, String> =
        environment.pairs().map(|(k, v)| (k.to_string(), v.to_string())).collect();

    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        let name = args
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| tera::Error::msg("get_env requires a string `name` argument"))?;

        match (entries.get(name), args.get("default")) {
            (Some(value), _) => Ok(Value::String(value.clone())),
            (None, Some(default)) => Ok(default.clone()),
            (None, None) => Err(tera::Error::msg(format!(
                "environment variable `{name}` not found and no default given"
            ))),
        }
    }
}
