//! Stance derivation: scoring categorized text into a polarity per category.

pub mod analyzer;
pub mod label;
pub mod lexicon;
pub mod remote;
pub mod scorer;

use std::sync::Arc;
use std::time::Duration;

pub use analyzer::{
    truncate_chars, Analysis, ScoringFailurePolicy, StanceAnalyzer, StanceResult,
    MAX_SCORED_CHARS,
};
pub use label::Stance;
pub use lexicon::LexiconScorer;
pub use remote::HttpScorer;
pub use scorer::{ScoreLabel, ScorerError, ScoringError, TextScorer};

use crate::config::{ScorerConfig, ScorerKind};
use crate::error::TrueNorthError;

/// Builds the scorer selected in the configuration.
pub fn scorer_from_config(config: &ScorerConfig) -> Result<Arc<dyn TextScorer>, TrueNorthError> {
    match config.kind {
        ScorerKind::Lexicon => Ok(Arc::new(LexiconScorer::new())),
        ScorerKind::Http => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                crate::error::ConfigError::Validation {
                    message: "scorer.endpoint is required when scorer.kind is 'http'".to_string(),
                }
            })?;
            let api_token = match &config.api_token_env {
                Some(name) => Some(std::env::var(name).map_err(|_| {
                    crate::error::ConfigError::MissingSecret { name: name.clone() }
                })?),
                None => None,
            };
            let scorer = HttpScorer::new(
                endpoint,
                api_token,
                Duration::from_secs(config.timeout_secs),
                config.max_retries,
            )?;
            Ok(Arc::new(scorer))
        }
    }
}
