use std::time::Duration;

use crate::config::Config;
use crate::stance::ScoringFailurePolicy;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper bound on one platform fetch, retries included.
    pub fetch_timeout: Duration,
    /// Upper bound on one category's scoring call.
    pub scoring_timeout: Duration,
    pub on_scoring_failure: ScoringFailurePolicy,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            fetch_timeout: Duration::from_secs(config.pipeline.fetch_timeout_secs),
            scoring_timeout: Duration::from_secs(config.pipeline.scoring_timeout_secs),
            on_scoring_failure: config.pipeline.on_scoring_failure,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_converts_seconds() {
        let mut config = Config::default();
        config.pipeline.fetch_timeout_secs = 5;
        config.pipeline.scoring_timeout_secs = 7;
        config.pipeline.on_scoring_failure = ScoringFailurePolicy::Neutral;

        let pipeline = PipelineConfig::from_config(&config);
        assert_eq!(pipeline.fetch_timeout, Duration::from_secs(5));
        assert_eq!(pipeline.scoring_timeout, Duration::from_secs(7));
        assert_eq!(pipeline.on_scoring_failure, ScoringFailurePolicy::Neutral);
    }
}
