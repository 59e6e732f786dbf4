//! Offline lexicon scorer.
//!
//! Sums word polarities from small positive and negative word lists tuned
//! for platform language. A negation flips the polarity of the next word.
//! Useful when no classification endpoint is configured, and in tests.

use std::collections::HashMap;

use async_trait::async_trait;

use super::scorer::{ScoreLabel, ScorerError, TextScorer};

const POSITIVE: &[(&str, f64)] = &[
    ("improve", 0.6),
    ("improving", 0.6),
    ("strengthen", 0.6),
    ("support", 0.5),
    ("supporting", 0.5),
    ("invest", 0.5),
    ("investing", 0.5),
    ("investment", 0.5),
    ("protect", 0.6),
    ("protecting", 0.6),
    ("expand", 0.5),
    ("secure", 0.5),
    ("affordable", 0.5),
    ("growth", 0.6),
    ("opportunity", 0.6),
    ("opportunities", 0.6),
    ("benefit", 0.5),
    ("benefits", 0.5),
    ("fair", 0.5),
    ("better", 0.5),
    ("strong", 0.5),
    ("stronger", 0.6),
    ("prosperity", 0.8),
    ("prosperous", 0.8),
    ("success", 0.7),
    ("help", 0.4),
    ("build", 0.4),
    ("create", 0.4),
    ("boost", 0.6),
    ("safe", 0.5),
    ("safer", 0.5),
    ("clean", 0.4),
    ("healthy", 0.5),
    ("modernize", 0.5),
    ("commit", 0.4),
    ("committed", 0.4),
    ("ensure", 0.3),
    ("restore", 0.5),
    ("thrive", 0.8),
    ("excellent", 0.8),
    ("good", 0.5),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("cut", -0.5),
    ("cuts", -0.5),
    ("crisis", -0.8),
    ("fail", -0.7),
    ("failed", -0.7),
    ("failure", -0.7),
    ("waste", -0.7),
    ("wasteful", -0.7),
    ("corrupt", -0.9),
    ("corruption", -0.9),
    ("scandal", -0.9),
    ("risk", -0.4),
    ("threat", -0.6),
    ("threats", -0.6),
    ("danger", -0.7),
    ("dangerous", -0.7),
    ("decline", -0.6),
    ("harm", -0.7),
    ("harmful", -0.7),
    ("unfair", -0.6),
    ("worse", -0.6),
    ("weak", -0.5),
    ("broken", -0.7),
    ("chaos", -0.8),
    ("abandon", -0.6),
    ("abandoned", -0.6),
    ("burden", -0.5),
    ("costly", -0.5),
    ("damage", -0.7),
    ("deficit", -0.5),
    ("debt", -0.4),
    ("expensive", -0.5),
    ("lost", -0.5),
    ("problem", -0.4),
    ("problems", -0.4),
    ("reckless", -0.8),
    ("slash", -0.6),
    ("unaffordable", -0.7),
    ("bad", -0.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "without", "don't", "won't", "cannot", "can't", "isn't", "neither",
    "nor",
];

/// Average polarity beyond which text is labelled positive or negative.
const DEFAULT_THRESHOLD: f64 = 0.1;

pub struct LexiconScorer {
    weights: HashMap<&'static str, f64>,
    threshold: f64,
}

impl LexiconScorer {
    pub fn new() -> Self {
        let weights = POSITIVE.iter().chain(NEGATIVE.iter()).copied().collect();
        Self {
            weights,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Average polarity of the lexicon words in `text`, in `[-1, 1]`.
    /// Returns 0 when no lexicon word occurs.
    pub fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let mut total = 0.0;
        let mut hits = 0usize;
        let mut negate = false;

        for token in tokenize(&lowered) {
            if NEGATIONS.contains(&token) {
                negate = true;
                continue;
            }
            if let Some(weight) = self.weights.get(token) {
                total += if negate { -weight } else { *weight };
                hits += 1;
            }
            negate = false;
        }

        if hits == 0 {
            0.0
        } else {
            (total / hits as f64).clamp(-1.0, 1.0)
        }
    }

    fn label_for(&self, polarity: f64) -> &'static str {
        if polarity > self.threshold {
            "positive"
        } else if polarity < -self.threshold {
            "negative"
        } else {
            "neutral"
        }
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextScorer for LexiconScorer {
    async fn classify(&self, text: &str) -> Result<ScoreLabel, ScorerError> {
        let polarity = self.polarity(text);
        Ok(ScoreLabel::new(self.label_for(polarity), polarity.abs()))
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
}
