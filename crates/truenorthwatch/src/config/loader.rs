use std::path::{Path, PathBuf};

use crate::config::schema::{Config, ScorerKind};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Returns the canonical config path: `~/.truenorthwatch/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".truenorthwatch").join("config.json"))
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    for placeholder in ["{party}", "{year}"] {
        if !config.fetch.url_template.contains(placeholder) {
            return Err(ConfigError::Validation {
                message: format!("fetch.url_template must contain '{}'", placeholder),
            });
        }
    }

    if config.fetch.use_archive && !config.fetch.archive_template.contains("{url}") {
        return Err(ConfigError::Validation {
            message: "fetch.archive_template must contain '{url}'".to_string(),
        });
    }

    if config.scorer.kind == ScorerKind::Http
        && config
            .scorer
            .endpoint
            .as_deref()
            .is_none_or(|e| e.trim().is_empty())
    {
        return Err(ConfigError::Validation {
            message: "scorer.endpoint is required when scorer.kind is 'http'".to_string(),
        });
    }

    let timeouts = [
        ("fetch.timeout_secs", config.fetch.timeout_secs),
        ("scorer.timeout_secs", config.scorer.timeout_secs),
        ("pipeline.fetch_timeout_secs", config.pipeline.fetch_timeout_secs),
        (
            "pipeline.scoring_timeout_secs",
            config.pipeline.scoring_timeout_secs,
        ),
    ];
    for (name, value) in timeouts {
        if value == 0 {
            return Err(ConfigError::Validation {
                message: format!("{} must be greater than zero", name),
            });
        }
    }

    Ok(())
}
