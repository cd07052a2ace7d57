use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::index::Record;
use crate::error::ValidationError;

/// Outcome of loading one entity's records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub entity: String,
    pub accepted: usize,
    pub rejected: Vec<RejectedRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    /// Position of the record in its input batch (0-based)
    pub row: usize,
    pub error: ValidationError,
}

impl BatchReport {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            accepted: 0,
            rejected: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.accepted + self.rejected.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Rejection counts per violation kind, e.g. `dangling_reference -> 3`.
    pub fn violation_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for rejected in &self.rejected {
            for violation in &rejected.error.violations {
                let kind = serde_json::to_value(violation)
                    .ok()
                    .and_then(|v| v.get("kind").and_then(|k| k.as_str()).map(str::to_string))
                    .unwrap_or_else(|| "unknown".to_string());
                *counts.entry(kind).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Records for several entities parsed from one per-match file.
///
/// ```json
/// { "entities": { "Team": [{"team_id": "t1", "team_name": "Home FC"}], "Match": [] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchBatch {
    #[serde(default)]
    pub entities: BTreeMap<String, Vec<Record>>,
}

impl MatchBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, entity: impl Into<String>, records: Vec<Record>) -> Self {
        self.entities.entry(entity.into()).or_default().extend(records);
        self
    }

    pub fn record_count(&self) -> usize {
        self.entities.values().map(Vec::len).sum()
    }
}
