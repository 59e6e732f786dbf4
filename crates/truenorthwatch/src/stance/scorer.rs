//! The sentiment-scoring capability consumed by the stance analyzer.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::categorizer::Category;

/// Errors a scorer can report for a single classification call.
#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Scoring service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse scorer response: {0}")]
    ResponseParse(String),

    #[error("Scorer returned no labels")]
    EmptyResponse,

    #[error("Scorer returned unrecognized label '{0}'")]
    UnknownLabel(String),

    #[error("Scoring timed out after {0:?}")]
    Timeout(Duration),
}

/// A scorer failure attributed to the category whose text was being scored.
#[derive(Debug, Error)]
#[error("Scoring failed for category '{category}': {source}")]
pub struct ScoringError {
    pub category: Category,
    #[source]
    pub source: ScorerError,
}

/// Best label for a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLabel {
    pub label: String,
    #[serde(default)]
    pub score: f64,
}

impl ScoreLabel {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Classifies text into a single polarity label.
///
/// Implementations own their retry behaviour; callers treat each call as
/// potentially slow.
#[async_trait]
pub trait TextScorer: Send + Sync {
    async fn classify(&self, text: &str) -> Result<ScoreLabel, ScorerError>;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}
