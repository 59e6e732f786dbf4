use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::label::Stance;
use super::scorer::{ScorerError, ScoringError, TextScorer};
use crate::categorizer::{CategorizedText, Category, CategoryMap};

/// Longest prefix of a category's text, in characters, handed to the scorer.
pub const MAX_SCORED_CHARS: usize = 512;

/// Stance per category. Every category is present.
pub type StanceResult = CategoryMap<Stance>;

/// What to do when the scorer fails for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringFailurePolicy {
    /// Abort the whole analysis with the first failure.
    #[default]
    Fail,
    /// Record the failure and use `neutral` for that category.
    Neutral,
}

/// Stances plus any scorer failures that were replaced with `neutral`.
#[derive(Debug)]
pub struct Analysis {
    pub stances: StanceResult,
    pub substituted: Vec<ScoringError>,
}

pub struct StanceAnalyzer {
    scorer: Arc<dyn TextScorer>,
    timeout: Option<Duration>,
    policy: ScoringFailurePolicy,
}

impl StanceAnalyzer {
    pub fn new(scorer: Arc<dyn TextScorer>) -> Self {
        Self {
            scorer,
            timeout: None,
            policy: ScoringFailurePolicy::default(),
        }
    }

    /// Bounds every individual scoring call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_policy(mut self, policy: ScoringFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Derives a stance for every category.
    ///
    /// Blank categories are `neutral` without a scorer call. The remaining
    /// categories are scored concurrently on their first
    /// [`MAX_SCORED_CHARS`] characters.
    pub async fn analyze(&self, categorized: &CategorizedText) -> Result<Analysis, ScoringError> {
        let pending = categorized
            .iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(category, text)| async move {
                (category, self.score_category(category, text).await)
            });
        let scored = join_all(pending).await;

        let mut stances = StanceResult::default();
        let mut substituted = Vec::new();

        for (category, result) in scored {
            match result {
                Ok(stance) => stances[category] = stance,
                Err(source) => {
                    let error = ScoringError { category, source };
                    match self.policy {
                        ScoringFailurePolicy::Fail => return Err(error),
                        ScoringFailurePolicy::Neutral => {
                            log::warn!("{}; using neutral", error);
                            substituted.push(error);
                        }
                    }
                }
            }
        }

        Ok(Analysis {
            stances,
            substituted,
        })
    }

    async fn score_category(&self, category: Category, text: &str) -> Result<Stance, ScorerError> {
        let input = truncate_chars(text, MAX_SCORED_CHARS);
        debug!(
            category = %category,
            chars = input.chars().count(),
            scorer = self.scorer.name(),
            "scoring category"
        );

        let label = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.scorer.classify(input))
                .await
                .map_err(|_| ScorerError::Timeout(limit))??,
            None => self.scorer.classify(input).await?,
        };

        Stance::from_label(&label.label)
    }
}

/// The first `max` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
