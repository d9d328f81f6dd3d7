//! One scheduled scoring cycle.
//!
//! Drives the full batch: list records, select eligible rollouts, decide
//! whether the window has stabilized, group by service, score each group,
//! and hand the batch to the publisher. Strictly sequential; structured log
//! lines at every decision point so an operator can reconstruct why a cycle
//! scored nothing, something, or aborted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::errors::EngineResult;
use crate::domain::models::config::{Config, Environment, PublishConfig, ScoringConfig};
use crate::domain::ports::config_provider::ConfigProvider;
use crate::domain::ports::credential_provider::CredentialProvider;
use crate::domain::ports::deployment_repository::DeploymentRepository;
use crate::domain::ports::publisher::Publisher;
use crate::domain::ports::scorecard_repository::ScorecardRepository;
use crate::domain::ports::scorer::Scorer;
use crate::services::eligibility::{latest_scorecard_date, select_eligible};
use crate::services::grouping::group_by_service;
use crate::services::normalizer::{CompletionNormalizer, Decision};
use crate::services::scoring_driver::{scored_batch, GroupOutcome, ScoringDriver};

/// What one cycle concluded.
#[derive(Debug)]
pub enum CycleDecision {
    /// No deployment ended after the last scorecard's cutoff.
    NothingToScore,
    /// Eligible deployments exist but the window has not stabilized.
    Waiting(Decision),
    /// Groups were driven through scoring and the batch was published.
    Scored {
        outcomes: Vec<GroupOutcome>,
        published: usize,
    },
}

/// Summary of one cycle, for observability and tests.
#[derive(Debug)]
pub struct CycleReport {
    pub deployments_found: usize,
    pub scorecards_found: usize,
    pub eligible: usize,
    pub decision: CycleDecision,
}

pub struct ScoringCycle {
    deployments: Arc<dyn DeploymentRepository>,
    scorecards: Arc<dyn ScorecardRepository>,
    credentials: Arc<dyn CredentialProvider>,
    publisher: Arc<dyn Publisher>,
    driver: ScoringDriver,
    normalizer: CompletionNormalizer,
    scoring: ScoringConfig,
    publish: PublishConfig,
    environment: Environment,
}

impl ScoringCycle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        deployments: Arc<dyn DeploymentRepository>,
        scorecards: Arc<dyn ScorecardRepository>,
        config: Arc<dyn ConfigProvider>,
        credentials: Arc<dyn CredentialProvider>,
        scorer: Arc<dyn Scorer>,
        publisher: Arc<dyn Publisher>,
        settings: &Config,
    ) -> Self {
        let driver = ScoringDriver::new(
            config,
            credentials.clone(),
            scorer,
            deployments.clone(),
        );
        let normalizer =
            CompletionNormalizer::new(deployments.clone(), settings.scoring.clone());
        Self {
            deployments,
            scorecards,
            credentials,
            publisher,
            driver,
            normalizer,
            scoring: settings.scoring.clone(),
            publish: settings.publish.clone(),
            environment: settings.environment,
        }
    }

    /// Run one batch cycle at the given reference time.
    pub async fn run(&self, now: DateTime<Utc>) -> EngineResult<CycleReport> {
        info!(environment = self.environment.as_str(), "Starting scoring cycle");

        let scorecards = self.scorecards.list_all().await?;
        let deployments = self.deployments.list_all().await?;
        info!(
            scorecards = scorecards.len(),
            deployments = deployments.len(),
            "Fetched record collections"
        );

        let mut eligible = select_eligible(&deployments, &scorecards, self.scoring.buffer());
        info!(
            eligible = eligible.len(),
            "Found deployments which occurred after the last scorecard"
        );

        let report = |eligible_count: usize, decision: CycleDecision| CycleReport {
            deployments_found: deployments.len(),
            scorecards_found: scorecards.len(),
            eligible: eligible_count,
            decision,
        };

        let Some(last) = eligible.last_mut() else {
            match latest_scorecard_date(&scorecards) {
                Some(date) => info!(
                    last_scorecard = %date,
                    "No rollouts occurred after the last recorded scorecard"
                ),
                None => info!("No rollouts and no scorecards in the store"),
            }
            return Ok(report(0, CycleDecision::NothingToScore));
        };

        let decision = self.normalizer.decide(last, now).await?;
        if !decision.is_proceed() {
            return Ok(report(eligible.len(), CycleDecision::Waiting(decision)));
        }

        info!("Rollouts will be scored; fetching publish token");
        let publish_token = self
            .credentials
            .get_secret(&self.publish.token_vault, &self.publish.token_secret)
            .await?;

        let eligible_count = eligible.len();
        let mut groups = group_by_service(eligible);
        let outcomes = self.driver.score_groups(&mut groups, now).await?;

        let batch = scored_batch(&outcomes);
        let published = batch.len();
        info!(
            services = %batch
                .iter()
                .map(|s| s.service.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            "Uploading results"
        );
        self.publisher
            .publish(batch, &publish_token, self.environment.skip_review())
            .await?;

        Ok(report(
            eligible_count,
            CycleDecision::Scored {
                outcomes,
                published,
            },
        ))
    }
}
