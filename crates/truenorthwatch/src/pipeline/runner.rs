use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info_span, Instrument};

use crate::categorizer::Categorizer;
use crate::config::Config;
use crate::db::stance_repo::{NewStanceRecord, PlatformStanceRecord};
use crate::db::StanceStore;
use crate::error::TrueNorthError;
use crate::fetch::{FetchOutcome, HttpPlatformFetcher, PlatformFetcher};
use crate::stance::{scorer_from_config, StanceAnalyzer, TextScorer};

use super::config::PipelineConfig;
use super::context::PipelineContext;
use super::error::{PipelineError, PipelineWarning};
use super::progress::{NoopProgress, PipelinePhase, ProgressEvent, ProgressReporter};

type RunKey = (i64, i32);

/// Where the returned records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StanceSource {
    Cached,
    Computed,
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub records: Vec<PlatformStanceRecord>,
    pub source: StanceSource,
    pub warnings: Vec<PipelineWarning>,
}

type InFlight = Mutex<HashMap<RunKey, Arc<tokio::sync::Mutex<()>>>>;

/// Per-key run lock. Dropping it, on completion or cancellation, removes the
/// map entry once no other caller holds or waits on the same key.
struct KeyLock<'a> {
    in_flight: &'a InFlight,
    key: RunKey,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl Drop for KeyLock<'_> {
    fn drop(&mut self) {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // One reference in the map, one here.
        if Arc::strong_count(&self.lock) == 2 {
            in_flight.remove(&self.key);
        }
    }
}

/// Computes and stores platform stances once per party and election year.
pub struct PlatformPipeline {
    config: PipelineConfig,
    categorizer: Categorizer,
    analyzer: StanceAnalyzer,
    fetcher: Arc<dyn PlatformFetcher>,
    store: Arc<dyn StanceStore>,
    in_flight: InFlight,
}

impl PlatformPipeline {
    pub fn new(
        config: PipelineConfig,
        categorizer: Categorizer,
        scorer: Arc<dyn TextScorer>,
        fetcher: Arc<dyn PlatformFetcher>,
        store: Arc<dyn StanceStore>,
    ) -> Self {
        let analyzer = StanceAnalyzer::new(scorer)
            .with_timeout(config.scoring_timeout)
            .with_policy(config.on_scoring_failure);

        Self {
            config,
            categorizer,
            analyzer,
            fetcher,
            store,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Production constructor: builtin categories, HTTP fetcher and the
    /// configured scorer.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn StanceStore>,
    ) -> Result<Self, TrueNorthError> {
        let categorizer = Categorizer::builtin()?;
        let scorer = scorer_from_config(&config.scorer)?;
        let fetcher = HttpPlatformFetcher::new(config.fetch.clone())?;

        Ok(Self::new(
            PipelineConfig::from_config(config),
            categorizer,
            scorer,
            Arc::new(fetcher),
            store,
        ))
    }

    /// Returns the stored stances for the party and year, computing and
    /// storing them first if there are none.
    pub async fn get_or_compute_platform_stances(
        &self,
        party_id: i64,
        election_year: i32,
    ) -> Result<Vec<PlatformStanceRecord>, PipelineError> {
        self.run(party_id, election_year, &NoopProgress)
            .await
            .map(|outcome| outcome.records)
    }

    /// Runs the full pipeline, reporting progress along the way.
    pub async fn run(
        &self,
        party_id: i64,
        election_year: i32,
        progress: &dyn ProgressReporter,
    ) -> Result<PipelineOutcome, PipelineError> {
        let span = info_span!("pipeline", party_id, election_year);

        async {
            let result = self.run_steps(party_id, election_year, progress).await;
            match &result {
                Ok(outcome) => {
                    log::info!(
                        "Stances for party {} in {}: {} records ({:?}, {} warnings)",
                        party_id,
                        election_year,
                        outcome.records.len(),
                        outcome.source,
                        outcome.warnings.len()
                    );
                    progress.report(ProgressEvent::Completed {
                        records: outcome.records.len(),
                    });
                }
                Err(e) => {
                    log::error!(
                        "Pipeline failed for party {} in {}: {}",
                        party_id,
                        election_year,
                        e
                    );
                    progress.report(ProgressEvent::Failed {
                        error: e.to_string(),
                    });
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_steps(
        &self,
        party_id: i64,
        election_year: i32,
        progress: &dyn ProgressReporter,
    ) -> Result<PipelineOutcome, PipelineError> {
        // Step 1: Cache check
        if let Some(outcome) = self.step_check_cache(party_id, election_year).await? {
            progress.report(ProgressEvent::CacheHit);
            return Ok(outcome);
        }

        let key_lock = self.key_lock((party_id, election_year));
        let _held = key_lock.lock.lock().await;
        self.compute_unless_cached(party_id, election_year, progress)
            .await
    }

    async fn compute_unless_cached(
        &self,
        party_id: i64,
        election_year: i32,
        progress: &dyn ProgressReporter,
    ) -> Result<PipelineOutcome, PipelineError> {
        // Another caller may have finished while we waited.
        if let Some(outcome) = self.step_check_cache(party_id, election_year).await? {
            progress.report(ProgressEvent::CacheHit);
            return Ok(outcome);
        }
        self.compute(PipelineContext::new(party_id, election_year), progress)
            .await
    }

    async fn compute(
        &self,
        mut ctx: PipelineContext,
        progress: &dyn ProgressReporter,
    ) -> Result<PipelineOutcome, PipelineError> {
        // Step 2: Party lookup
        progress.report(ProgressEvent::Phase {
            phase: PipelinePhase::LookingUpParty,
            message: "Looking up party...".to_string(),
        });
        self.step_lookup_party(&mut ctx)
            .instrument(info_span!("lookup_party"))
            .await?;

        // Step 3: Fetch platform
        progress.report(ProgressEvent::Phase {
            phase: PipelinePhase::Fetching,
            message: "Fetching platform text...".to_string(),
        });
        self.step_fetch(&mut ctx)
            .instrument(info_span!("fetch_platform"))
            .await;

        // Step 4: Categorize
        {
            let _step = info_span!("categorize").entered();
            progress.report(ProgressEvent::Phase {
                phase: PipelinePhase::Categorizing,
                message: "Categorizing platform text...".to_string(),
            });
            self.step_categorize(&mut ctx);
        }

        // Step 5: Analyze
        progress.report(ProgressEvent::Phase {
            phase: PipelinePhase::Analyzing,
            message: "Scoring stances...".to_string(),
        });
        self.step_analyze(&mut ctx)
            .instrument(info_span!("analyze"))
            .await?;

        // Step 6: Persist and re-read
        progress.report(ProgressEvent::Phase {
            phase: PipelinePhase::Persisting,
            message: "Storing stances...".to_string(),
        });
        let records = self
            .step_persist(&ctx)
            .instrument(info_span!("persist"))
            .await?;

        Ok(PipelineOutcome {
            records,
            source: StanceSource::Computed,
            warnings: ctx.warnings,
        })
    }

    async fn step_check_cache(
        &self,
        party_id: i64,
        election_year: i32,
    ) -> Result<Option<PipelineOutcome>, PipelineError> {
        let records = self
            .store
            .find_stance_records(party_id, election_year)
            .await?;
        if records.is_empty() {
            return Ok(None);
        }

        debug!(records = records.len(), "using stored stances");
        Ok(Some(PipelineOutcome {
            records,
            source: StanceSource::Cached,
            warnings: Vec::new(),
        }))
    }

    async fn step_lookup_party(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let name = self
            .store
            .find_party_name(ctx.party_id)
            .await?
            .ok_or(PipelineError::PartyNotFound {
                party_id: ctx.party_id,
            })?;

        ctx.party_name = Some(name);
        Ok(())
    }

    async fn step_fetch(&self, ctx: &mut PipelineContext) {
        let party_name = ctx.party_name.as_deref().unwrap_or_default();
        let limit = self.config.fetch_timeout;

        let outcome = match tokio::time::timeout(
            limit,
            self.fetcher.fetch_platform(party_name, ctx.election_year),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => FetchOutcome::Unavailable {
                reason: format!("fetch timed out after {}s", limit.as_secs()),
            },
        };

        if let FetchOutcome::Unavailable { reason } = &outcome {
            log::warn!(
                "Platform for {} in {} unavailable, all stances default to neutral: {}",
                party_name,
                ctx.election_year,
                reason
            );
            ctx.warnings.push(PipelineWarning::FetchUnavailable {
                reason: reason.clone(),
            });
        }

        ctx.fetched = Some(outcome);
    }

    fn step_categorize(&self, ctx: &mut PipelineContext) {
        let text = ctx.fetched.as_ref().map(FetchOutcome::text).unwrap_or_default();
        let categorized = self.categorizer.categorize(text);
        debug!(
            matched = Categorizer::matched_categories(&categorized).len(),
            "categorized platform"
        );
        ctx.categorized = Some(categorized);
    }

    async fn step_analyze(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let categorized = ctx.categorized.take().unwrap_or_default();
        let analysis = self.analyzer.analyze(&categorized).await?;

        ctx.warnings
            .extend(
                analysis
                    .substituted
                    .into_iter()
                    .map(|e| PipelineWarning::ScoringSubstituted {
                        category: e.category,
                        error: e.source.to_string(),
                    }),
            );
        ctx.stances = Some(analysis.stances);
        Ok(())
    }

    async fn step_persist(
        &self,
        ctx: &PipelineContext,
    ) -> Result<Vec<PlatformStanceRecord>, PipelineError> {
        let stances = ctx.stances.clone().unwrap_or_default();
        let created_at = Utc::now();
        let batch: Vec<NewStanceRecord> = stances
            .iter()
            .map(|(category, stance)| NewStanceRecord {
                party_id: ctx.party_id,
                election_year: ctx.election_year,
                category,
                stance: *stance,
                created_at,
            })
            .collect();

        let expected = batch.len();
        let inserted = self.store.insert_stance_records(batch).await?;
        if inserted < expected {
            debug!(inserted, expected, "some stances were already stored");
        }

        Ok(self
            .store
            .find_stance_records(ctx.party_id, ctx.election_year)
            .await?)
    }

    fn key_lock(&self, key: RunKey) -> KeyLock<'_> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let lock = in_flight.entry(key).or_default().clone();
        KeyLock {
            in_flight: &self.in_flight,
            key,
            lock,
        }
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
