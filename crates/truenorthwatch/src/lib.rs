pub mod categorizer;
pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod stance;

pub use categorizer::{CategorizedText, Categorizer, Category, CategoryMap, Taxonomy};
pub use config::{load_config, Config};
pub use db::stance_repo::PlatformStanceRecord;
pub use db::{Database, SqliteStanceStore, StanceStore};
pub use error::{ConfigError, Result, TrueNorthError};
pub use fetch::{FetchOutcome, HttpPlatformFetcher, PlatformFetcher};
pub use pipeline::{PipelineConfig, PipelineError, PipelineOutcome, PlatformPipeline};
pub use stance::{Stance, StanceAnalyzer, StanceResult, TextScorer};
