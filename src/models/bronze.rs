use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::RawObservation;

/// Where a bronze batch came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub source_path: String,
    /// SHA-256 of the raw input file
    pub source_sha: String,
    /// Revision of the code that ingested the batch, if known
    pub git_commit_hash: Option<String>,
    /// UTC wall clock
    pub ingested_at: NaiveDateTime,
}

/// One ingested batch: raw observations plus the provenance shared by every row
#[derive(Debug, Clone, PartialEq)]
pub struct BronzeBatch {
    pub batch_id: String,
    pub observations: Vec<RawObservation>,
    pub provenance: Provenance,
}

impl BronzeBatch {
    pub fn new(
        batch_id: impl Into<String>,
        observations: Vec<RawObservation>,
        provenance: Provenance,
    ) -> Self {
        Self {
            batch_id: batch_id.into(),
            observations,
            provenance,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
