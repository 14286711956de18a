//! JSON config file loading.
//!
//! [`load_and_validate_config`] only checks that the required keys are
//! present and hands the mapping back untouched. [`ScraperConfig`] is the
//! typed view used when the settings are actually resolved.

pub mod settings;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub use settings::{Flags, Settings};

pub const REQUIRED_FIELDS: [&str; 6] = [
    "boards",
    "exclude_boards",
    "request_time_limit",
    "output_path",
    "save_log",
    "clean_log",
];

/// Config file contents as parsed, keyed by field name.
pub type RawConfig = Map<String, Value>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Could not read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON format in {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config in {} is not a JSON object", .path.display())]
    NotAnObject { path: PathBuf },

    #[error("Missing required fields in config: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Reads `config_path` and checks every field in [`REQUIRED_FIELDS`] is present.
pub fn load_and_validate_config(config_path: impl AsRef<Path>) -> Result<RawConfig, ConfigError> {
    let path = config_path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let value: Value = serde_json::from_str(&contents).map_err(|source| ConfigError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })?;
    let config = match value {
        Value::Object(config) => config,
        _ => {
            return Err(ConfigError::NotAnObject {
                path: path.to_path_buf(),
            })
        }
    };

    let missing = missing_fields(&config);
    if !missing.is_empty() {
        return Err(ConfigError::MissingFields(missing));
    }

    Ok(config)
}

/// Required fields absent from `config`, in [`REQUIRED_FIELDS`] order.
pub fn missing_fields(config: &RawConfig) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| !config.contains_key(**field))
        .map(|field| field.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScraperConfig {
    pub boards: Vec<String>,
    pub exclude_boards: bool,
    pub request_time_limit: f64,
    pub output_path: PathBuf,
    pub save_log: bool,
    pub clean_log: bool,
}

impl TryFrom<RawConfig> for ScraperConfig {
    type Error = ConfigError;

    fn try_from(config: RawConfig) -> Result<Self, Self::Error> {
        let config: ScraperConfig = serde_json::from_value(Value::Object(config))
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        if !(config.request_time_limit >= 1.0) {
            return Err(ConfigError::InvalidValue(format!(
                "request_time_limit should be at least 1, now is {}",
                config.request_time_limit
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawConfig {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn missing_fields_keep_canonical_order() {
        let config = raw(json!({"save_log": true, "boards": []}));
        assert_eq!(
            missing_fields(&config),
            vec!["exclude_boards", "request_time_limit", "output_path", "clean_log"]
        );
    }

    #[test]
    fn missing_fields_message_lists_names() {
        let err = ConfigError::MissingFields(vec!["boards".into(), "save_log".into()]);
        assert_eq!(err.to_string(), "Missing required fields in config: boards, save_log");
    }

    #[test]
    fn typed_config_from_raw() {
        let config = raw(json!({
            "boards": ["g", "sci"],
            "exclude_boards": false,
            "request_time_limit": 2,
            "output_path": "/tmp/out",
            "save_log": true,
            "clean_log": false,
            "comment": "extra keys are ignored"
        }));
        let config = ScraperConfig::try_from(config).unwrap();
        assert_eq!(config.boards, vec!["g", "sci"]);
        assert_eq!(config.request_time_limit, 2.0);
        assert_eq!(config.output_path, PathBuf::from("/tmp/out"));
        assert!(!config.clean_log);
    }

    #[test]
    fn typed_config_rejects_wrong_types_and_low_limit() {
        let wrong_type = raw(json!({
            "boards": "g",
            "exclude_boards": false,
            "request_time_limit": 2,
            "output_path": ".",
            "save_log": true,
            "clean_log": true
        }));
        assert!(matches!(
            ScraperConfig::try_from(wrong_type),
            Err(ConfigError::InvalidValue(_))
        ));

        let too_fast = raw(json!({
            "boards": [],
            "exclude_boards": false,
            "request_time_limit": 0.5,
            "output_path": ".",
            "save_log": true,
            "clean_log": true
        }));
        assert!(matches!(
            ScraperConfig::try_from(too_fast),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
