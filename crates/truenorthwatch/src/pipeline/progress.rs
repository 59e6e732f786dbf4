use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

/// Pipeline phase, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    LookingUpParty,
    Fetching,
    Categorizing,
    Analyzing,
    Persisting,
}

/// Events emitted by the pipeline during a run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Stored stances were found; nothing is computed.
    CacheHit,
    Phase {
        phase: PipelinePhase,
        message: String,
    },
    Completed {
        records: usize,
    },
    Failed {
        error: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for callers that don't track progress.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Progress of one run as sent to subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunProgressEvent {
    CacheHit {
        party_id: i64,
        election_year: i32,
    },
    Phase {
        party_id: i64,
        election_year: i32,
        phase: PipelinePhase,
        message: String,
    },
    Completed {
        party_id: i64,
        election_year: i32,
        records: usize,
    },
    Failed {
        party_id: i64,
        election_year: i32,
        error: String,
    },
}

/// Forwards pipeline events for one run to a broadcast channel.
pub struct BroadcastProgress {
    party_id: i64,
    election_year: i32,
    sender: Arc<broadcast::Sender<RunProgressEvent>>,
}

impl BroadcastProgress {
    pub fn new(
        party_id: i64,
        election_year: i32,
        sender: Arc<broadcast::Sender<RunProgressEvent>>,
    ) -> Self {
        Self {
            party_id,
            election_year,
            sender,
        }
    }
}

impl ProgressReporter for BroadcastProgress {
    fn report(&self, event: ProgressEvent) {
        let party_id = self.party_id;
        let election_year = self.election_year;
        let event = match event {
            ProgressEvent::CacheHit => RunProgressEvent::CacheHit {
                party_id,
                election_year,
            },
            ProgressEvent::Phase { phase, message } => RunProgressEvent::Phase {
                party_id,
                election_year,
                phase,
                message,
            },
            ProgressEvent::Completed { records } => RunProgressEvent::Completed {
                party_id,
                election_year,
                records,
            },
            ProgressEvent::Failed { error } => RunProgressEvent::Failed {
                party_id,
                election_year,
                error,
            },
        };
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }
}
