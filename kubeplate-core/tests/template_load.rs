//! Loading templates from YAML and JSON files.

use std::fs;

use kubeplate_core::{load::load_template, CoreError};
use rstest::rstest;
use tempfile::TempDir;

const YAML_TEMPLATE: &str = r#"
apiVersion: template.openshift.io/v1
kind: Template
metadata:
  name: basic-tier
message: "Created namespaces for ${USERNAME}"
labels:
  toolchain.dev.openshift.com/provider: codeready-toolchain
objects:
  - apiVersion: v1
    kind: Namespace
    metadata:
      name: ${USERNAME}-dev
  - apiVersion: v1
    kind: ConfigMap
    metadata:
      name: settings
      namespace: ${USERNAME}-dev
    data:
      replicas: "${{REPLICAS}}"
parameters:
  - name: USERNAME
    required: true
  - name: REPLICAS
    value: "1"
  - name: SECRET
    generate: expression
    from: "[a-zA-Z0-9]{16}"
"#;

const JSON_TEMPLATE: &str = r#"{
  "kind": "Template",
  "apiVersion": "template.openshift.io/v1",
  "metadata": { "name": "json-tier" },
  "objects": [
    { "apiVersion": "v1", "kind": "Namespace", "metadata": { "name": "${NAME}" } }
  ],
  "parameters": [ { "name": "NAME", "displayName": "Name", "value": "demo" } ]
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write template");
    path
}

#[rstest]
#[case::yaml("tier.yaml", YAML_TEMPLATE, "basic-tier", 2, 3)]
#[case::json("tier.json", JSON_TEMPLATE, "json-tier", 1, 1)]
fn loads_template_documents(
    #[case] file: &str,
    #[case] contents: &str,
    #[case] name: &str,
    #[case] objects: usize,
    #[case] parameters: usize,
) {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, file, contents);
    let template = load_template(&path).expect("load");
    assert_eq!(template.metadata.name.as_deref(), Some(name));
    assert_eq!(template.objects.len(), objects);
    assert_eq!(template.parameters.len(), parameters);
}

#[test]
fn yaml_template_fields_are_mapped() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "tier.yaml", YAML_TEMPLATE);
    let template = load_template(&path).unwrap();

    let username = template.parameter("USERNAME").expect("USERNAME");
    assert!(username.required);
    assert!(!username.has_value());

    let secret = template.parameter("SECRET").expect("SECRET");
    assert_eq!(secret.generate.as_deref(), Some("expression"));
    assert_eq!(secret.from.as_deref(), Some("[a-zA-Z0-9]{16}"));

    assert_eq!(
        template.labels.get("toolchain.dev.openshift.com/provider").map(String::as_str),
        Some("codeready-toolchain")
    );
    assert_eq!(
        template.message.as_deref(),
        Some("Created namespaces for ${USERNAME}")
    );
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_template(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, CoreError::Io { .. }), "got {err:?}");
}

#[test]
fn malformed_yaml_is_parse_error_with_path() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.yaml", "objects: [unterminated");
    let err = load_template(&path).unwrap_err();
    match err {
        CoreError::Parse { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn non_template_kind_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "cm.yaml",
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: x\n",
    );
    let err = load_template(&path).unwrap_err();
    assert!(
        matches!(err, CoreError::NotATemplate { ref kind } if kind == "ConfigMap"),
        "got {err:?}"
    );
}
