//! Platform text retrieval.
//!
//! Fetchers never fail: problems are reported as
//! [`FetchOutcome::Unavailable`] so callers can tell a missing platform
//! apart from platform text.

pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use http::{FetchError, HttpPlatformFetcher};

/// Raw platform text for one party and election.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformText {
    pub party_name: String,
    pub election_year: i32,
    pub text: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(PlatformText),
    Unavailable { reason: String },
}

impl FetchOutcome {
    /// The text to categorize; empty when the platform was unavailable.
    pub fn text(&self) -> &str {
        match self {
            FetchOutcome::Fetched(platform) => &platform.text,
            FetchOutcome::Unavailable { .. } => "",
        }
    }
}

#[async_trait]
pub trait PlatformFetcher: Send + Sync {
    async fn fetch_platform(&self, party_name: &str, election_year: i32) -> FetchOutcome;
}
