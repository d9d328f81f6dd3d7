//! Platform-backed scoring adapter.
//!
//! Fetches rollout telemetry for a service from its deployment platform
//! instance and converts it into a scorecard using the service's weight
//! configuration. HTTP 4xx responses and undecodable telemetry are reported
//! as invalid scoring configuration, the class the driver skips a group on.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::config::WeightConfig;
use crate::domain::models::scorecard::Scorecard;
use crate::domain::ports::scorer::{ScoreRequest, Scorer};

/// Telemetry returned by the platform for one rollout window.
#[derive(Debug, Clone, Deserialize)]
pub struct RolloutTelemetry {
    /// Total rollout duration in minutes.
    pub duration_minutes: f64,
    /// Hotfixes shipped during the rollout.
    pub hotfixes: u32,
    /// Rollbacks performed.
    pub rollbacks: u32,
    /// Downtime in minutes.
    pub downtime_minutes: f64,
    /// Whether the rollout failed to deploy.
    #[serde(default)]
    pub failed: bool,
}

/// Weighted point total for one rollout. Hour-rate categories are charged
/// per hour of duration or downtime; count categories per occurrence.
pub fn compute_points(telemetry: &RolloutTelemetry, weights: &WeightConfig) -> f64 {
    let mut total = 0.0;
    total += telemetry.duration_minutes / 60.0 * weights.rollout_time;
    total += f64::from(telemetry.hotfixes) * weights.hotfix;
    total += f64::from(telemetry.rollbacks) * weights.rollback;
    total += telemetry.downtime_minutes / 60.0 * weights.downtime;
    if telemetry.failed {
        total += weights.failure;
    }
    total
}

pub struct PlatformScorer {
    http: Client,
}

impl PlatformScorer {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

impl Default for PlatformScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scorer for PlatformScorer {
    async fn score(&self, request: ScoreRequest) -> EngineResult<Scorecard> {
        let url = format!(
            "{}/rollouts/{}/telemetry",
            request.instance.base_url.trim_end_matches('/'),
            request.service
        );

        let mut http_request = self.http.get(&url).bearer_auth(&request.platform_token);
        if let Some(since) = request.rollout_start {
            http_request = http_request.query(&[("since", since.to_rfc3339())]);
        }

        let response = http_request.send().await.map_err(|e| {
            EngineError::ScoringFailed {
                service: request.service.clone(),
                detail: format!("telemetry request failed: {}", e),
            }
        })?;

        let status = response.status();
        if status.is_client_error() {
            return Err(EngineError::InvalidScoreConfiguration {
                service: request.service.clone(),
                detail: format!("platform rejected telemetry request with {}", status),
            });
        }
        if !status.is_success() {
            return Err(EngineError::ScoringFailed {
                service: request.service.clone(),
                detail: format!("platform returned {}", status),
            });
        }

        let telemetry: RolloutTelemetry = response.json().await.map_err(|e| {
            EngineError::InvalidScoreConfiguration {
                service: request.service.clone(),
                detail: format!("undecodable telemetry: {}", e),
            }
        })?;

        let total_score = compute_points(&telemetry, &request.weights);
        let metrics = json!({
            "duration_minutes": telemetry.duration_minutes,
            "hotfixes": telemetry.hotfixes,
            "rollbacks": telemetry.rollbacks,
            "downtime_minutes": telemetry.downtime_minutes,
            "failed": telemetry.failed,
        });

        Ok(Scorecard {
            service: request.service,
            rollout_start: request.rollout_start,
            total_score,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_points_weights_each_category() {
        let telemetry = RolloutTelemetry {
            duration_minutes: 120.0,
            hotfixes: 2,
            rollbacks: 1,
            downtime_minutes: 30.0,
            failed: false,
        };
        let weights = WeightConfig::default();

        // 2h * 1.0 + 2 * 5.0 + 1 * 10.0 + 0.5h * 10.0
        let total = compute_points(&telemetry, &weights);
        assert!((total - 27.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failed_rollout_charges_failure_weight() {
        let telemetry = RolloutTelemetry {
            duration_minutes: 0.0,
            hotfixes: 0,
            rollbacks: 0,
            downtime_minutes: 0.0,
            failed: true,
        };

        let total = compute_points(&telemetry, &WeightConfig::default());
        assert!((total - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clean_rollout_scores_duration_only() {
        let telemetry = RolloutTelemetry {
            duration_minutes: 90.0,
            hotfixes: 0,
            rollbacks: 0,
            downtime_minutes: 0.0,
            failed: false,
        };

        let total = compute_points(&telemetry, &WeightConfig::default());
        assert!((total - 1.5).abs() < f64::EPSILON);
    }
}
