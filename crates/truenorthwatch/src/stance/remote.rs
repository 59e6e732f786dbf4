//! Scorer backed by a hosted text-classification endpoint
//! (Hugging Face Inference API request/response shape).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::scorer::{ScoreLabel, ScorerError, TextScorer};

#[derive(Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a str,
}

/// Endpoints answer either `[[{label, score}, ...]]` or `[{label, score}, ...]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<ScoreLabel>>),
    Flat(Vec<ScoreLabel>),
}

impl ClassificationResponse {
    fn best(self) -> Option<ScoreLabel> {
        let labels: Vec<ScoreLabel> = match self {
            ClassificationResponse::Nested(batches) => batches.into_iter().flatten().collect(),
            ClassificationResponse::Flat(labels) => labels,
        };
        labels
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

pub struct HttpScorer {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    max_retries: u32,
}

impl HttpScorer {
    pub fn new(
        endpoint: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, ScorerError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_token,
            max_retries,
        })
    }

    async fn try_classify(&self, text: &str) -> Result<ScoreLabel, ScorerError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&ClassificationRequest { inputs: text });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScorerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// 500ms doubling per attempt, saturating instead of overflowing.
fn retry_backoff(attempt: u32) -> Duration {
    Duration::from_millis(500_u64.saturating_mul(2_u64.saturating_pow(attempt)))
}

#[async_trait]
impl TextScorer for HttpScorer {
    async fn classify(&self, text: &str) -> Result<ScoreLabel, ScorerError> {
        let mut attempt = 0;
        loop {
            match self.try_classify(text).await {
                Ok(label) => return Ok(label),
                Err(e) if attempt < self.max_retries && is_transient(&e) => {
                    let backoff = retry_backoff(attempt);
                    log::warn!(
                        "Scoring attempt {} failed ({}), retrying in {:?}",
                        attempt + 1,
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn parse_response(body: &str) -> Result<ScoreLabel, ScorerError> {
    let response: ClassificationResponse =
        serde_json::from_str(body).map_err(|e| ScorerError::ResponseParse(e.to_string()))?;
    response.best().ok_or(ScorerError::EmptyResponse)
}

/// Rate limits, server errors and connection problems are worth retrying.
fn is_transient(error: &ScorerError) -> bool {
    match error {
        ScorerError::Status { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
        }
        ScorerError::Request(e) => e.is_timeout() || e.is_connect(),
        _ => false,
    }
}
