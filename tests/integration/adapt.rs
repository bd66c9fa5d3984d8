//! Fixture documents adapted through the library API.

use serial_test::serial;
use std::fs;
use yamladapt::adapt::{AdaptOptions, Adapter, Environment};
use yamladapt::core::AdaptError;
use yamladapt::extensions::{ExtensionPolicy, NameMode, StripMode};
use yamladapt::templating::TemplateError;
use yamladapt::test_utils::init_test_logging;

use crate::{expected_json, fixture};

fn adapt_fixture(name: &str, env: &[&str]) -> serde_json::Value {
    init_test_logging(None);
    let path = fixture(name);
    let body = fs::read(&path).unwrap();
    let options = AdaptOptions::new()
        .with_filename(path.to_string_lossy())
        .with_env(Environment::from_entries(env.iter().copied()));

    let adaptation = Adapter::new().adapt(&body, &options);
    assert!(adaptation.warnings.is_empty(), "unexpected warnings: {:?}", adaptation.warnings);
    serde_json::from_slice(&adaptation.output.unwrap()).unwrap()
}

#[test]
fn test_caddy_fixture() {
    let json = adapt_fixture("caddy/Caddyfile.yaml", &["DOMAIN=example.com"]);
    assert_eq!(json, expected_json("caddy/expected.json"));
}

#[test]
fn test_template_fixture_defaults() {
    let json = adapt_fixture("templates/app.yaml", &[]);
    assert_eq!(json, expected_json("templates/expected.dev.json"));
}

#[test]
fn test_template_fixture_with_environment() {
    let json = adapt_fixture("templates/app.yaml", &["STAGE=prod"]);
    assert_eq!(json, expected_json("templates/expected.prod.json"));
}

#[test]
fn test_missing_environment_value_names_the_variable() {
    let path = fixture("caddy/Caddyfile.yaml");
    let body = fs::read(&path).unwrap();
    let options = AdaptOptions::new()
        .with_filename(path.to_string_lossy())
        .with_env(Environment::new());

    let err = Adapter::new().adapt(&body, &options).output.unwrap_err();
    match err {
        AdaptError::Template(TemplateError::VariableNotFound {
            variable,
            ..
        }) => assert_eq!(variable, "DOMAIN"),
        other => panic!("expected a missing variable, got {other}"),
    }
}

#[test]
fn test_root_only_stripping_keeps_nested_extensions() {
    let path = fixture("templates/app.yaml");
    let body = fs::read(&path).unwrap();
    let options = AdaptOptions::new()
        .with_filename(path.to_string_lossy())
        .with_env(Environment::new())
        .with_extensions(ExtensionPolicy::new(StripMode::RootOnly, NameMode::Normalize));

    let output = Adapter::new().adapt(&body, &options).output.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["metadata"]["x-owner"], "platform");
    assert!(json.get("x-stage").is_none());
}

#[test]
fn test_strict_names_reject_dashes() {
    let options = AdaptOptions::new()
        .with_filename("app.yaml")
        .with_env(Environment::new())
        .with_extensions(ExtensionPolicy::new(StripMode::Recursive, NameMode::Strict));

    let err = Adapter::new().adapt(b"x-db-host: db\nhost: \"#{ $db_host }\"\n", &options).output;
    assert!(matches!(err, Err(AdaptError::ExtensionName { .. })));
}

#[test]
fn test_unusable_environment_keys_warn_once_each() {
    let options = AdaptOptions::new().with_filename("app.yaml").with_env(Environment::from_entries([
        "GOOD=1",
        "BAD%KEY=2",
        "1ST=3",
        "if=4",
    ]));

    let adaptation = Adapter::new().adapt(b"good: \"#{ $GOOD }\"\n", &options);
    let messages: Vec<_> = adaptation.warnings.iter().map(|w| w.message.clone()).collect();
    assert_eq!(
        messages,
        vec![
            "environment variable \"BAD%KEY\" cannot be used in template",
            "environment variable \"1ST\" cannot be used in template",
            "environment variable \"if\" cannot be used in template",
        ]
    );
    assert!(adaptation.warnings.iter().all(|w| w.file == "app.yaml" && !w.has_line()));
    assert_eq!(adaptation.output.unwrap(), br#"{"good":"1"}"#.to_vec());
}

#[test]
fn test_from_map_options() {
    let options = serde_json::json!({
        "filename": "app.yaml",
        "env": ["NAME=svc"],
    });
    let serde_json::Value::Object(map) = options else {
        unreachable!()
    };

    let options = AdaptOptions::from_map(&map).unwrap();
    let output = Adapter::new().adapt(b"name: \"#{ $NAME }\"\n", &options).output.unwrap();
    assert_eq!(output, br#"{"name":"svc"}"#.to_vec());
}

#[test]
#[serial]
fn test_process_environment_is_the_default() {
    // SAFETY: every test that spawns a process is #[serial] with this one, and the
    // remaining reads go through std::env
    unsafe { std::env::set_var("YAMLADAPT_TEST_REGION", "eu-west-1") };

    let options = AdaptOptions::new().with_filename("app.yaml");
    let adaptation = Adapter::new().adapt(b"region: \"#{ $YAMLADAPT_TEST_REGION }\"\n", &options);

    unsafe { std::env::remove_var("YAMLADAPT_TEST_REGION") };
    assert_eq!(adaptation.output.unwrap(), br#"{"region":"eu-west-1"}"#.to_vec());
}
