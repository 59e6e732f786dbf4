//! The platform stance pipeline: cache check, party lookup, fetch,
//! categorize, analyze, persist.

pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod runner;

pub use config::PipelineConfig;
pub use context::PipelineContext;
pub use error::{PipelineError, PipelineWarning};
pub use progress::{
    BroadcastProgress, NoopProgress, PipelinePhase, ProgressEvent, ProgressReporter,
    RunProgressEvent,
};
pub use runner::{PipelineOutcome, PlatformPipeline, StanceSource};
