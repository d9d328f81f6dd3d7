//! Scorecard domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted scoring result for one rollout. Append-only from the engine's
/// perspective; the `date` field drives the eligibility cutoff for later
/// cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardRecord {
    pub id: Uuid,
    pub service: String,
    /// Scoring reference date.
    pub date: DateTime<Utc>,
    pub total_score: f64,
    /// Opaque computed metrics from the scoring function.
    pub metrics: serde_json::Value,
}

impl ScorecardRecord {
    pub fn new(service: impl Into<String>, date: DateTime<Utc>, total_score: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            service: service.into(),
            date,
            total_score,
            metrics: serde_json::Value::Null,
        }
    }

    pub fn with_metrics(mut self, metrics: serde_json::Value) -> Self {
        self.metrics = metrics;
        self
    }
}

/// In-memory scoring result for one service group, collected into the batch
/// handed to the publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub service: String,
    /// Start marker of the rollout that was scored.
    pub rollout_start: Option<DateTime<Utc>>,
    pub total_score: f64,
    /// Opaque computed metrics.
    pub metrics: serde_json::Value,
}

impl Scorecard {
    /// Convert into the persisted form, dated with the scoring reference date.
    pub fn into_record(self, date: DateTime<Utc>) -> ScorecardRecord {
        ScorecardRecord::new(self.service, date, self.total_score).with_metrics(self.metrics)
    }
}
