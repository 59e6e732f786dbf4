use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrueNorthError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),

    #[error("Scorer error: {0}")]
    Scorer(#[from] crate::stance::ScorerError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Fetcher error: {0}")]
    Fetch(#[from] crate::fetch::FetchError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid category table: {reason}")]
    InvalidTaxonomy { reason: String },

    #[error("Missing secret: environment variable '{name}' is not set")]
    MissingSecret { name: String },
}

pub type Result<T> = std::result::Result<T, TrueNorthError>;
