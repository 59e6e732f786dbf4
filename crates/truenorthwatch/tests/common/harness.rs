//! Test harness for pipeline integration tests.
//!
//! The `TestHarness` struct owns an in-memory database with one registered
//! party and builds pipelines over it with injected collaborators.

#![allow(dead_code)]

use std::sync::Arc;

use truenorthwatch::db::{party_repo, stance_repo, Database, SqliteStanceStore};
use truenorthwatch::fetch::PlatformFetcher;
use truenorthwatch::pipeline::{PipelineConfig, PlatformPipeline};
use truenorthwatch::stance::TextScorer;
use truenorthwatch::Categorizer;

pub struct TestHarness {
    pub db: Database,
    pub party_id: i64,
    pub config: PipelineConfig,
}

impl TestHarness {
    /// In-memory database with the "Liberal" party registered.
    pub fn new() -> Self {
        Self::with_party("Liberal")
    }

    pub fn with_party(name: &str) -> Self {
        let db = Database::open_in_memory().expect("Failed to create test database");
        let party = party_repo::insert(&db, name).expect("Failed to insert party");
        Self {
            db,
            party_id: party.id,
            config: PipelineConfig::default(),
        }
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// A pipeline over this harness's database.
    pub fn pipeline(
        &self,
        fetcher: Arc<dyn PlatformFetcher>,
        scorer: Arc<dyn TextScorer>,
    ) -> PlatformPipeline {
        PlatformPipeline::new(
            self.config.clone(),
            Categorizer::builtin().expect("builtin categories are valid"),
            scorer,
            fetcher,
            Arc::new(SqliteStanceStore::new(self.db.clone())),
        )
    }

    pub fn stored_count(&self, party_id: i64, election_year: i32) -> u64 {
        stance_repo::count_by_party_year(&self.db, party_id, election_year)
            .expect("Failed to count stances")
    }
}
