use serde::{Deserialize, Serialize};

use crate::stance::ScoringFailurePolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// SQLite file; `~/.truenorthwatch/data/truenorthwatch.db` when absent.
    #[serde(default)]
    pub database_path: Option<String>,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub scorer: ScorerConfig,
    #[serde(default)]
    pub pipeline: PipelineSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            database_path: None,
            fetch: FetchConfig::default(),
            scorer: ScorerConfig::default(),
            pipeline: PipelineSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Platform page URL; `{party}` is the party slug, `{year}` the election year.
    #[serde(default = "default_url_template")]
    pub url_template: String,
    /// Route requests through the Wayback Machine.
    #[serde(default = "default_true")]
    pub use_archive: bool,
    /// Archive URL; `{url}` is the platform URL, `{year}` the election year.
    #[serde(default = "default_archive_template")]
    pub archive_template: String,
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_url_template() -> String {
    "https://{party}.ca/platform/{year}".to_string()
}

fn default_archive_template() -> String {
    "https://web.archive.org/web/{year}*/{url}".to_string()
}

fn default_true() -> bool {
    true
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("TrueNorthWatch/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            use_archive: true,
            archive_template: default_archive_template(),
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    #[default]
    Lexicon,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    #[serde(default)]
    pub kind: ScorerKind,
    /// Classification endpoint, required for `http`.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Name of the environment variable holding the API token.
    #[serde(default)]
    pub api_token_env: Option<String>,
    #[serde(default = "default_scorer_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_scorer_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            kind: ScorerKind::Lexicon,
            endpoint: None,
            api_token_env: None,
            timeout_secs: default_scorer_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Upper bound on the platform fetch.
    #[serde(default = "default_pipeline_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// Upper bound on each category's scoring call, retries included.
    #[serde(default = "default_pipeline_scoring_timeout")]
    pub scoring_timeout_secs: u64,
    #[serde(default)]
    pub on_scoring_failure: ScoringFailurePolicy,
}

fn default_pipeline_fetch_timeout() -> u64 {
    30
}

fn default_pipeline_scoring_timeout() -> u64 {
    120
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_pipeline_fetch_timeout(),
            scoring_timeout_secs: default_pipeline_scoring_timeout(),
            on_scoring_failure: ScoringFailurePolicy::default(),
        }
    }
}
