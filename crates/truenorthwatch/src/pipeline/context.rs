use crate::categorizer::CategorizedText;
use crate::fetch::FetchOutcome;
use crate::stance::StanceResult;

use super::error::PipelineWarning;

pub struct PipelineContext {
    // Input
    pub party_id: i64,
    pub election_year: i32,

    // Set by the party lookup
    pub party_name: Option<String>,

    pub fetched: Option<FetchOutcome>,
    pub categorized: Option<CategorizedText>,
    pub stances: Option<StanceResult>,

    // Non-fatal warnings
    pub warnings: Vec<PipelineWarning>,
}

impl PipelineContext {
    pub fn new(party_id: i64, election_year: i32) -> Self {
        Self {
            party_id,
            election_year,
            party_name: None,
            fetched: None,
            categorized: None,
            stances: None,
            warnings: Vec::new(),
        }
    }
}
