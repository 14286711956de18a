//! Config file loading tests

use std::fs;
use std::path::PathBuf;

use board_scraper::config::{load_and_validate_config, ConfigError, REQUIRED_FIELDS};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, contents).unwrap();
    path
}

fn full_config() -> Value {
    json!({
        "boards": ["a", "c", "g", "sci"],
        "exclude_boards": false,
        "request_time_limit": 1.5,
        "output_path": "/srv/scrape",
        "save_log": true,
        "clean_log": true
    })
}

#[test]
fn well_formed_config_is_returned_unchanged() {
    let dir = TempDir::new().unwrap();
    let expected = full_config();
    let path = write_config(&dir, &expected.to_string());

    let config = load_and_validate_config(&path).unwrap();
    assert_eq!(Value::Object(config), expected);
}

#[test]
fn values_are_not_type_checked() {
    let dir = TempDir::new().unwrap();
    let expected = json!({
        "boards": "not a list",
        "exclude_boards": 0,
        "request_time_limit": -4,
        "output_path": null,
        "save_log": "yes",
        "clean_log": []
    });
    let path = write_config(&dir, &expected.to_string());

    let config = load_and_validate_config(&path).unwrap();
    assert_eq!(Value::Object(config), expected);
}

#[test]
fn each_missing_subset_is_reported_exactly() {
    let dir = TempDir::new().unwrap();
    // every subset of the six required fields, by bitmask
    for mask in 1u32..(1 << REQUIRED_FIELDS.len()) {
        let mut config = full_config();
        let object = config.as_object_mut().unwrap();
        let mut expected = vec![];
        for (i, field) in REQUIRED_FIELDS.iter().enumerate() {
            if mask & (1 << i) != 0 {
                object.remove(*field);
                expected.push(field.to_string());
            }
        }
        let path = write_config(&dir, &config.to_string());

        match load_and_validate_config(&path) {
            Err(ConfigError::MissingFields(missing)) => assert_eq!(missing, expected),
            other => panic!("expected missing fields for mask {:b}, got {:?}", mask, other),
        }
    }
}

#[test]
fn missing_fields_error_message() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"boards": [], "save_log": true, "clean_log": true}"#);

    let err = load_and_validate_config(&path).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required fields in config: exclude_boards, request_time_limit, output_path"
    );
}

#[test]
fn nonexistent_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.json");

    let err = load_and_validate_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }));
    assert!(err.to_string().starts_with("Config file not found at"));
}

#[test]
fn malformed_json_is_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"boards": ["a",}"#);

    let err = load_and_validate_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidJson { .. }));
    assert!(err.to_string().starts_with("Invalid JSON format in"));
}

#[test]
fn top_level_array_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"["boards"]"#);

    assert!(matches!(
        load_and_validate_config(&path),
        Err(ConfigError::NotAnObject { .. })
    ));
}
