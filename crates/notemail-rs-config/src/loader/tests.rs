//! Tests for layered configuration loading.

use super::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Options that only look inside the temp dir.
fn isolated_options(root: &Path, cwd: &Path) -> LayeredConfigOptions {
    LayeredConfigOptions {
        cwd: cwd.to_path_buf(),
        system_config_path: Some(root.join("system.json5")),
        user_config_path: Some(root.join("user.json5")),
        runtime_paths: Vec::new(),
        project_root_markers: vec![".git".to_string()],
    }
}

#[test]
fn empty_config_uses_defaults() {
    let config = NotemailConfig::load_from_str("{}").expect("config");
    assert_eq!(config.vector.top_k, 3);
    assert_eq!(config.vector.overfetch_factor, 3);
    assert_eq!(config.vector.namespace, "notion_mail");
    assert_eq!(config.vector.index_name, "notion-mail");
    assert_eq!(config.assistant.command_temperature, 0.0);
    assert_eq!(config.assistant.summary_temperature, 0.7);
    assert_eq!(config.store.page_size, 100);
    assert_eq!(config.http.timeout_secs, 30);
}

#[test]
fn unknown_section_is_rejected() {
    let err = NotemailConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    assert_eq!(err.to_string(), "inline: `unexpected` is not a known key");
}

#[test]
fn rejects_string_top_k() {
    let err = NotemailConfig::load_from_str(r#"{ vector: { top_k: "three" } }"#).unwrap_err();
    assert_eq!(
        err.to_string(),
        "inline: `vector.top_k` must be a non-negative integer"
    );
}

/// Reject values that parse but break invariants.
#[test]
fn rejects_zero_overfetch_factor() {
    let err =
        NotemailConfig::load_from_str(r#"{ vector: { overfetch_factor: 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn rejects_out_of_range_page_size() {
    let err = NotemailConfig::load_from_str(r#"{ store: { page_size: 500 } }"#).unwrap_err();
    assert!(format!("{err}").contains("page_size"));
}

/// Later layers override earlier ones, runtime last.
#[test]
fn layered_config_precedence() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let project_root = root.join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");

    write_json5(
        &root.join("system.json5"),
        "{ vector: { namespace: \"system\", top_k: 7 }, http: { timeout_secs: 9 } }",
    );
    write_json5(&root.join("user.json5"), "{ vector: { namespace: \"user\" } }");
    write_json5(
        &project_root.join(CONFIG_FILE),
        "{ vector: { namespace: \"project\" }, assistant: { model: \"project-model\" } }",
    );
    write_json5(
        &cwd.join(CONFIG_FILE),
        "{ vector: { namespace: \"cwd\" } }",
    );
    let runtime = root.join("runtime.json5");
    write_json5(&runtime, "{ assistant: { model: \"runtime-model\" } }");

    let options = isolated_options(root, &cwd).with_runtime_path(&runtime);
    let layered = NotemailConfig::load_layered_with_options(options).expect("layered");

    assert_eq!(layered.config.vector.namespace, "cwd");
    assert_eq!(layered.config.vector.top_k, 7);
    assert_eq!(layered.config.http.timeout_secs, 9);
    assert_eq!(layered.config.assistant.model, "runtime-model");
    let sources: Vec<_> = layered.layers.iter().map(|layer| layer.source).collect();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::System,
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd,
            ConfigLayerSource::Runtime,
        ]
    );
}

/// Project and cwd layers pointing at the same file load once.
#[test]
fn layered_config_deduplicates_project_and_cwd() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let project_root = root.join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    write_json5(
        &project_root.join(CONFIG_FILE),
        "{ vector: { top_k: 4 } }",
    );

    let layered = NotemailConfig::load_layered_with_options(isolated_options(root, &project_root))
        .expect("layered");
    assert_eq!(layered.layers.len(), 1);
    assert_eq!(layered.config.vector.top_k, 4);
}

/// A missing runtime layer is an error, unlike optional layers.
#[test]
fn missing_runtime_layer_fails() {
    let temp = TempDir::new().expect("tmp");
    let options =
        isolated_options(temp.path(), temp.path()).with_runtime_path(temp.path().join("nope"));
    let err = NotemailConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("nope"));
}

/// Invalid layers report which layer failed.
#[test]
fn invalid_layer_names_source() {
    let temp = TempDir::new().expect("tmp");
    write_json5(&temp.path().join("user.json5"), "{ http: { retries: 3 } }");
    let err = NotemailConfig::load_layered_with_options(isolated_options(temp.path(), temp.path()))
        .unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("user("));
    assert!(msg.contains("http.retries"));
}

/// Programmatic configs can be built without files.
#[test]
fn builder_replaces_sections() {
    let config = NotemailConfig::builder()
        .vector(crate::VectorConfig {
            top_k: 5,
            ..crate::VectorConfig::default()
        })
        .build();
    assert_eq!(config.vector.top_k, 5);
    assert!(config.validate().is_ok());
}

#[test]
fn schema_key_is_accepted() {
    let config =
        NotemailConfig::load_from_str(r#"{ "$schema": "./notemail.schema.json", http: {} }"#)
            .expect("config");
    assert_eq!(config.http.connect_timeout_secs, 10);
}

#[test]
fn section_must_be_an_object() {
    let err = NotemailConfig::load_from_str("{ store: 3 }").unwrap_err();
    assert!(matches!(err, ConfigError::Field { reason: "must be an object", .. }));
}

#[test]
fn load_from_path_reads_single_file() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join(CONFIG_FILE);
    write_json5(&path, "// comment\n{ assistant: { summary_temperature: 1.2, }, }");
    let config = NotemailConfig::load_from_path(&path).expect("config");
    assert_eq!(config.assistant.summary_temperature, 1.2);
}
