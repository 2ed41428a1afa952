// tests/config_test.rs
use plugin_version::config::{load_config, Config, MissingMarkerPolicy};
use serial_test::serial;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.plugin.source_path, PathBuf::from("src"));
    assert_eq!(config.plugin.version_constant, "VERSION");
    assert_eq!(config.behavior.missing_marker, MissingMarkerPolicy::Skip);
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[plugin]
name = "acme-forms"
version_constant = "ACME_FORMS_VERSION"

[[targets]]
path = "package.json"
pattern = '("version":\s*")[^"]+(")'
stable_only = true
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    assert_eq!(config.plugin.name.as_deref(), Some("acme-forms"));
    assert_eq!(config.plugin.version_constant, "ACME_FORMS_VERSION");
    assert_eq!(config.plugin.source_path, PathBuf::from("src"));
    assert_eq!(config.targets.len(), 1);
    assert!(config.targets[0].stable_only);
    assert_eq!(config.targets[0].replacement, None);
}

#[test]
#[serial]
fn test_behavior_config_from_fixture() {
    let config = load_config(Some(Path::new("tests/fixtures/config_with_behavior.toml")))
        .expect("Failed to load test config");
    assert_eq!(config.behavior.missing_marker, MissingMarkerPolicy::Warn);
    assert_eq!(config.plugin.source_path, PathBuf::from("plugin"));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    assert!(load_config(Some(Path::new("/nonexistent/plugin-version.toml"))).is_err());
}

#[test]
fn test_malformed_config_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[plugin\nname = ").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path())).unwrap_err();
    assert!(err.to_string().contains("invalid TOML"));
}

#[test]
#[serial]
fn test_load_config_from_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("plugin-version.toml"),
        "[plugin]\nname = \"from-cwd\"\n",
    )
    .unwrap();

    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None);
    std::env::set_current_dir(original).unwrap();

    assert_eq!(result.unwrap().plugin.name.as_deref(), Some("from-cwd"));
}
