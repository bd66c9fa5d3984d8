//! Include graphs built in temporary directories.

use yamladapt::core::AdaptError;
use yamladapt::test_utils::{DocumentTree, init_test_logging};

#[test]
fn test_nested_directories_and_relative_paths() {
    init_test_logging(None);
    let tree = DocumentTree::new(&[
        ("app/main.yaml", "include:\n  - ../shared/common.yaml\n  - path: [conf.d]\nname: app\n"),
        ("shared/common.yaml", "include: [defaults/limits.yml]\nlimits: {memory: 512}\n"),
        ("shared/defaults/limits.yml", "limits: {cpu: 1}\n"),
        ("app/conf.d/10-http.yaml", "listeners: [http]\n"),
        ("app/conf.d/20-tls/cert.yaml", "listeners: [https]\ntls: {enabled: true}\n"),
        ("app/conf.d/30-notes.txt", "listeners: [ignored]\n"),
    ]);

    let json = tree.adapt("app/main.yaml", &[]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "app",
            "limits": {"memory": 512, "cpu": 1},
            "listeners": ["http", "https"],
            "tls": {"enabled": true},
        })
    );
}

#[test]
fn test_included_extension_fields_are_bound() {
    let tree = DocumentTree::new(&[
        ("main.yaml", "include: [vars.yaml]\nurl: \"https://#{ $host }:#{ $port }\"\n"),
        ("vars.yaml", "x-host: \"#{ $HOST }\"\nx-port: 8443\n"),
    ]);

    let json = tree.adapt("main.yaml", &["HOST=example.com"]).unwrap();
    assert_eq!(json, serde_json::json!({"url": "https://example.com:8443"}));
}

#[test]
fn test_three_file_cycle_reports_chain() {
    let tree = DocumentTree::new(&[
        ("a.yaml", "include: [b.yaml]\n"),
        ("b.yaml", "include: [sub/c.yaml]\n"),
        ("sub/c.yaml", "include: [../a.yaml]\n"),
    ]);

    let err = tree.adapt("a.yaml", &[]).unwrap_err();
    match err.root_cause() {
        AdaptError::CircularInclude {
            path,
            chain,
        } => {
            assert!(path.ends_with("a.yaml"));
            let names: Vec<_> =
                chain.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
            assert_eq!(names, vec!["a.yaml", "b.yaml", "c.yaml"]);
        }
        other => panic!("expected a circular include, got {other}"),
    }
}

#[test]
fn test_shared_include_in_sibling_branches() {
    let tree = DocumentTree::new(&[
        ("main.yaml", "include: [web.yaml, api.yaml]\n"),
        ("web.yaml", "include: [tags.yaml]\nweb: true\n"),
        ("api.yaml", "include: [tags.yaml]\napi: true\n"),
        ("tags.yaml", "tags: [shared]\n"),
    ]);

    let json = tree.adapt("main.yaml", &[]).unwrap();
    assert_eq!(json, serde_json::json!({"web": true, "api": true, "tags": ["shared", "shared"]}));
}

#[test]
fn test_conflicting_scalars_name_the_key_path() {
    let tree = DocumentTree::new(&[
        ("main.yaml", "include: [other.yaml]\nserver:\n  port: 80\n"),
        ("other.yaml", "server:\n  port: 443\n"),
    ]);

    let err = tree.adapt("main.yaml", &[]).unwrap_err();
    assert!(err.to_string().starts_with("failed to merge include"));
    match err.root_cause() {
        AdaptError::MergeConflict {
            key,
            ..
        } => assert_eq!(key, "server.port"),
        other => panic!("expected a merge conflict, got {other}"),
    }
}

#[test]
fn test_kind_mismatch_is_a_conflict() {
    let tree = DocumentTree::new(&[
        ("main.yaml", "include: [other.yaml]\nroutes: []\n"),
        ("other.yaml", "routes: {main: /}\n"),
    ]);

    let err = tree.adapt("main.yaml", &[]).unwrap_err();
    assert!(matches!(err.root_cause(), AdaptError::MergeConflict { .. }));
}

#[test]
fn test_malformed_directives() {
    let cases = [
        ("include: base.yaml\n", "include must be a list, got string"),
        ("include: [{file: base.yaml}]\n", "include[0] missing required 'path' field"),
        ("include: [{path: 3}]\n", "include[0].path must be a string or list of strings, got number"),
    ];

    for (body, message) in cases {
        let tree = DocumentTree::new(&[("main.yaml", body), ("base.yaml", "a: 1\n")]);
        let err = tree.adapt("main.yaml", &[]).unwrap_err();
        assert!(matches!(err, AdaptError::IncludeFormat { .. }), "{body}");
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn test_null_include_is_empty() {
    let tree = DocumentTree::new(&[("main.yaml", "include:\nname: app\n")]);
    assert_eq!(tree.adapt("main.yaml", &[]).unwrap(), serde_json::json!({"name": "app"}));
}

#[test]
fn test_missing_include_names_the_path() {
    let tree = DocumentTree::new(&[("main.yaml", "include: [nowhere.yaml]\n")]);
    let err = tree.adapt("main.yaml", &[]).unwrap_err();
    assert!(matches!(err, AdaptError::Io { .. }));
    assert!(err.to_string().contains("nowhere.yaml"));
}
