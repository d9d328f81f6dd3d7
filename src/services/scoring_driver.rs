//! Per-group scoring with failure isolation.
//!
//! Groups are processed strictly sequentially. Configuration-resolution
//! failures are fatal to the cycle; an invalid scoring configuration skips
//! only the group that raised it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::scorecard::Scorecard;
use crate::domain::ports::config_provider::ConfigProvider;
use crate::domain::ports::credential_provider::CredentialProvider;
use crate::domain::ports::deployment_repository::DeploymentRepository;
use crate::domain::ports::scorer::{ScoreRequest, Scorer};
use crate::services::grouping::RolloutGroup;

/// Result of driving one service group through scoring.
#[derive(Debug, Clone)]
pub enum GroupOutcome {
    Scored(Scorecard),
    Skipped {
        service: String,
        rollout_start: Option<DateTime<Utc>>,
        reason: String,
    },
}

impl GroupOutcome {
    pub fn scorecard(&self) -> Option<&Scorecard> {
        match self {
            Self::Scored(scorecard) => Some(scorecard),
            Self::Skipped { .. } => None,
        }
    }
}

/// Extract the successfully scored batch from a list of outcomes.
pub fn scored_batch(outcomes: &[GroupOutcome]) -> Vec<Scorecard> {
    outcomes
        .iter()
        .filter_map(|o| o.scorecard().cloned())
        .collect()
}

pub struct ScoringDriver {
    config: Arc<dyn ConfigProvider>,
    credentials: Arc<dyn CredentialProvider>,
    scorer: Arc<dyn Scorer>,
    deployments: Arc<dyn DeploymentRepository>,
}

impl ScoringDriver {
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        credentials: Arc<dyn CredentialProvider>,
        scorer: Arc<dyn Scorer>,
        deployments: Arc<dyn DeploymentRepository>,
    ) -> Self {
        Self {
            config,
            credentials,
            scorer,
            deployments,
        }
    }

    /// Score every group in order, collecting one outcome per group.
    ///
    /// Open members are force-closed (and the closures persisted) before
    /// their group is scored, so no record is ever scored while the store
    /// still shows it in progress.
    pub async fn score_groups(
        &self,
        groups: &mut [RolloutGroup],
        now: DateTime<Utc>,
    ) -> EngineResult<Vec<GroupOutcome>> {
        let mut outcomes = Vec::with_capacity(groups.len());

        for group in groups.iter_mut() {
            self.close_open_members(group, now).await?;

            info!(
                service = %group.service,
                rollouts = group.deployments.len(),
                "Scoring rollouts"
            );

            let service_config = self
                .config
                .service_config(&group.service)
                .ok_or_else(|| EngineError::MissingServiceConfig(group.service.clone()))?;
            let instance_config = self
                .config
                .instance_config(&service_config.instance)
                .ok_or_else(|| EngineError::MissingInstanceConfig(service_config.instance.clone()))?;

            let platform_token = self
                .credentials
                .get_secret(&instance_config.vault_uri, &instance_config.pat_secret_name)
                .await?;

            let request = ScoreRequest {
                service: group.service.clone(),
                rollout_start: group.rollout_start(),
                weights: service_config.weights,
                instance: instance_config,
                platform_token,
            };

            match self.scorer.score(request).await {
                Ok(scorecard) => {
                    info!(
                        service = %group.service,
                        total_score = scorecard.total_score,
                        "Created scorecard"
                    );
                    outcomes.push(GroupOutcome::Scored(scorecard));
                }
                Err(EngineError::InvalidScoreConfiguration { service, detail }) => {
                    error!(
                        service = %service,
                        rollout_start = ?group.rollout_start(),
                        %detail,
                        "Skipping rollout with invalid scoring configuration"
                    );
                    outcomes.push(GroupOutcome::Skipped {
                        service,
                        rollout_start: group.rollout_start(),
                        reason: detail,
                    });
                }
                Err(other) => return Err(other),
            }
        }

        Ok(outcomes)
    }

    async fn close_open_members(
        &self,
        group: &mut RolloutGroup,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        for deployment in group.deployments.iter_mut() {
            if deployment.force_close(now) {
                self.deployments.replace(deployment).await?;
            }
        }
        Ok(())
    }
}
