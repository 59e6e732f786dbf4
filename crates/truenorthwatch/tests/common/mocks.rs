//! Test doubles for the fetcher and scorer seams.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use truenorthwatch::fetch::{FetchOutcome, PlatformFetcher, PlatformText};
use truenorthwatch::stance::{ScoreLabel, ScorerError, TextScorer};

/// Serves a fixed platform text and counts calls.
pub struct CountingFetcher {
    text: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl CountingFetcher {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every fetch reports the platform as unavailable.
    pub fn unavailable() -> Self {
        Self {
            text: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleeps before answering, widening race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlatformFetcher for CountingFetcher {
    async fn fetch_platform(&self, party_name: &str, election_year: i32) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.text {
            Some(text) => FetchOutcome::Fetched(PlatformText {
                party_name: party_name.to_string(),
                election_year,
                text: text.clone(),
                fetched_at: Utc::now(),
            }),
            None => FetchOutcome::Unavailable {
                reason: "Server returned status 404".to_string(),
            },
        }
    }
}

/// Returns one label for every input and records what it was given.
pub struct CountingScorer {
    label: &'static str,
    inputs: Mutex<Vec<String>>,
}

impl CountingScorer {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    /// Length in characters of the longest input seen.
    pub fn longest_input(&self) -> usize {
        self.inputs
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.chars().count())
            .max()
            .unwrap_or(0)
    }
}

#[async_trait]
impl TextScorer for CountingScorer {
    async fn classify(&self, text: &str) -> Result<ScoreLabel, ScorerError> {
        self.inputs.lock().unwrap().push(text.to_string());
        Ok(ScoreLabel::new(self.label, 0.99))
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Fails every call.
pub struct BrokenScorer;

#[async_trait]
impl TextScorer for BrokenScorer {
    async fn classify(&self, _text: &str) -> Result<ScoreLabel, ScorerError> {
        Err(ScorerError::Status {
            status: 503,
            body: "model loading".to_string(),
        })
    }

    fn name(&self) -> &str {
        "broken"
    }
}
