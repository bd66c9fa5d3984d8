//! The `yamladapt` binary.
//!
//! Every test here spawns a process and is `#[serial]`, so none of them runs
//! while a test changes the process environment.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use std::fs;
use yamladapt::test_utils::DocumentTree;

use crate::{expected_json, fixture};

fn yamladapt() -> Command {
    let mut cmd = Command::cargo_bin("yamladapt").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
#[serial]
fn test_adapt_fixture() {
    let output = yamladapt()
        .arg("adapt")
        .arg(fixture("caddy/Caddyfile.yaml"))
        .args(["--no-process-env", "--env", "DOMAIN=example.com"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output), expected_json("caddy/expected.json"));
}

#[test]
#[serial]
fn test_adapt_from_stdin_with_filename() {
    let path = fixture("templates/app.yaml");
    let output = yamladapt()
        .args(["adapt", "-", "--no-process-env", "--filename"])
        .arg(&path)
        .write_stdin(fs::read(&path).unwrap())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), expected_json("templates/expected.dev.json"));
}

#[test]
#[serial]
fn test_adapt_pretty_to_file() {
    let tree = DocumentTree::new(&[("app.yaml", "x-name: svc\nname: \"#{ $name }\"\n")]);
    let out = tree.path("out.json");

    yamladapt()
        .current_dir(tree.root())
        .args(["adapt", "app.yaml", "--no-process-env", "--pretty", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(&out).unwrap(), "{\n  \"name\": \"svc\"\n}\n");
}

#[test]
#[serial]
fn test_warnings_go_to_stderr() {
    let tree = DocumentTree::new(&[("app.yaml", "level: \"#{ $LEVEL }\"\n")]);

    yamladapt()
        .current_dir(tree.root())
        .args(["adapt", "app.yaml", "--no-process-env", "-e", "BAD%=1", "-e", "LEVEL=info"])
        .assert()
        .success()
        .stdout("{\"level\":\"info\"}\n")
        .stderr(predicate::str::contains(
            "warning: app.yaml:-1: environment variable \"BAD%\" cannot be used in template",
        ));
}

#[test]
#[serial]
fn test_circular_include_fails() {
    let tree = DocumentTree::new(&[
        ("a.yaml", "include: [b.yaml]\n"),
        ("b.yaml", "include: [a.yaml]\n"),
    ]);

    yamladapt()
        .current_dir(tree.root())
        .args(["adapt", "a.yaml", "--no-process-env"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("circular include detected"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
#[serial]
fn test_missing_variable_fails() {
    yamladapt()
        .arg("adapt")
        .arg(fixture("caddy/Caddyfile.yaml"))
        .arg("--no-process-env")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Template variable not found: 'DOMAIN'"));
}

#[test]
#[serial]
fn test_vars_prints_bindings() {
    let output = yamladapt()
        .arg("vars")
        .arg(fixture("caddy/Caddyfile.yaml"))
        .args(["--no-process-env", "--env", "DOMAIN=example.com"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({
            "domain": "example.com",
            "admin_port": 2019,
            "api_upstream": "10.0.0.5:8080",
        })
    );
}

#[test]
#[serial]
fn test_merge_prints_resolved_yaml() {
    let tree = DocumentTree::new(&[
        ("main.yaml", "include: [base.yaml]\nport: \"#{ $port }\"\n"),
        ("base.yaml", "x-port: 8080\nlimits: {cpu: 2}\n"),
    ]);

    let output = yamladapt().current_dir(tree.root()).args(["merge", "main.yaml"]).output().unwrap();
    assert!(output.status.success());

    let merged: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    let expected: serde_yaml::Value =
        serde_yaml::from_str("port: \"#{ $port }\"\nx-port: 8080\nlimits: {cpu: 2}\n").unwrap();
    assert_eq!(merged, expected);
}

#[test]
#[serial]
fn test_config_next_to_document() {
    let tree = DocumentTree::new(&[
        ("app.yaml", "name: \"#{ $NAME }\"\nnested:\n  x-keep: 1\n"),
        ("yamladapt.toml", "[extensions]\nstrip = \"root-only\"\n\n[env]\nNAME = \"from-config\"\n"),
    ]);

    let output = yamladapt()
        .current_dir(tree.root())
        .args(["adapt", "app.yaml", "--no-process-env"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({"name": "from-config", "nested": {"x-keep": 1}})
    );

    let output = yamladapt()
        .current_dir(tree.root())
        .args(["adapt", "app.yaml", "--no-process-env", "--strip", "recursive", "-e", "NAME=cli"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(&output), serde_json::json!({"name": "cli", "nested": {}}));
}

#[test]
#[serial]
fn test_explicit_config_must_exist() {
    let tree = DocumentTree::new(&[("app.yaml", "a: 1\n")]);

    yamladapt()
        .current_dir(tree.root())
        .args(["--config", "missing.toml", "adapt", "app.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
#[serial]
fn test_env_flag_requires_key_value() {
    yamladapt()
        .args(["adapt", "app.yaml", "--env", "NOEQUALS"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}
