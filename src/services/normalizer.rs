//! Completion normalization: decide whether the cycle commits to scoring.
//!
//! The most-recently-ended eligible deployment is the sole trigger. Scoring
//! proceeds once the buffer has fully elapsed since its end, or once an open
//! record is old enough to be considered stuck, in which case it is forced
//! closed and the closure persisted before scoring continues.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::errors::EngineResult;
use crate::domain::models::config::ScoringConfig;
use crate::domain::models::deployment::DeploymentRecord;
use crate::domain::ports::deployment_repository::DeploymentRepository;

/// Outcome of the normalization check for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The buffer has elapsed; score this cycle.
    Proceed,
    /// The most recent rollout completed too recently; wait.
    WaitingRecentEnd {
        service: String,
        ended: DateTime<Utc>,
    },
    /// The most recent rollout is still visibly in progress; wait.
    WaitingInProgress { service: String },
}

impl Decision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }
}

pub struct CompletionNormalizer {
    deployments: Arc<dyn DeploymentRepository>,
    scoring: ScoringConfig,
}

impl CompletionNormalizer {
    pub fn new(deployments: Arc<dyn DeploymentRepository>, scoring: ScoringConfig) -> Self {
        Self {
            deployments,
            scoring,
        }
    }

    /// Decide whether to score this cycle, given the most-recently-ended
    /// eligible deployment.
    ///
    /// On the stuck path the record is mutated in place and the closure
    /// persisted; a failed write propagates so the cycle never scores a
    /// record the store still considers in progress. Comparisons are strict,
    /// so a record exactly at a threshold is not yet past it.
    pub async fn decide(
        &self,
        latest: &mut DeploymentRecord,
        now: DateTime<Utc>,
    ) -> EngineResult<Decision> {
        let buffer_elapsed = now - self.scoring.buffer();
        let stuck_cutoff = now - self.scoring.stuck_threshold();

        if let Some(ended) = latest.ended() {
            if ended < buffer_elapsed {
                return Ok(Decision::Proceed);
            }
            info!(
                service = %latest.service,
                ended = %ended,
                "Most recent rollout completed less than {} days ago; waiting to score",
                self.scoring.buffer_days
            );
            return Ok(Decision::WaitingRecentEnd {
                service: latest.service.clone(),
                ended,
            });
        }

        match latest.started {
            Some(started) if started < stuck_cutoff => {
                warn!(
                    service = %latest.service,
                    started = %started,
                    "Rollout never recorded an end and is past the stuck threshold; forcing closure"
                );
                latest.force_close(now);
                self.deployments.replace(latest).await?;
                Ok(Decision::Proceed)
            }
            _ => {
                info!(service = %latest.service, "Most recent rollout is still in progress");
                Ok(Decision::WaitingInProgress {
                    service: latest.service.clone(),
                })
            }
        }
    }
}
