//! Port for the external scoring function.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::EngineResult;
use crate::domain::models::config::{PlatformInstanceConfig, WeightConfig};
use crate::domain::models::scorecard::Scorecard;

/// Everything the scoring function needs for one service group.
#[derive(Debug, Clone)]
pub struct ScoreRequest {
    /// Service identifier (repository name).
    pub service: String,
    /// Rollout start marker for the group.
    pub rollout_start: Option<DateTime<Utc>>,
    /// Scoring weights for the service.
    pub weights: WeightConfig,
    /// Platform instance the service deploys through.
    pub instance: PlatformInstanceConfig,
    /// Access token for the instance.
    pub platform_token: String,
}

/// Converts a rollout's telemetry into a scorecard. The point algorithm is a
/// collaborator behind this seam; the engine only distinguishes
/// `EngineError::InvalidScoreConfiguration` (skip the group) from everything
/// else (abort the cycle).
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, request: ScoreRequest) -> EngineResult<Scorecard>;
}
