use thiserror::Error;

use crate::categorizer::Category;
use crate::db::DatabaseError;
use crate::stance::ScoringError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Party not found: {party_id}")]
    PartyNotFound { party_id: i64 },

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Problems the pipeline recovered from.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineWarning {
    /// The platform could not be fetched; every stance defaulted to neutral.
    FetchUnavailable { reason: String },
    /// Scoring failed for a category and neutral was stored instead.
    ScoringSubstituted { category: Category, error: String },
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineWarning::FetchUnavailable { reason } => {
                write!(f, "Platform unavailable: {}", reason)
            }
            PipelineWarning::ScoringSubstituted { category, error } => {
                write!(f, "Used neutral for '{}': {}", category, error)
            }
        }
    }
}
