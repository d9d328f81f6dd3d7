//! End-to-end cycle tests over an in-memory record store.

mod helpers;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use rollcall::adapters::sqlite::{SqliteDeploymentRepository, SqliteScorecardRepository};
use rollcall::domain::errors::{EngineError, EngineResult};
use rollcall::domain::models::{
    Closure, Config, DeploymentRecord, PlatformInstanceConfig, Scorecard, ScorecardRecord,
    ServiceConfig, WeightConfig,
};
use rollcall::domain::ports::{
    CredentialProvider, DeploymentRepository, Publisher, ScorecardRepository, ScoreRequest, Scorer,
};
use rollcall::infrastructure::config::ConfigCatalog;
use rollcall::services::cycle::{CycleDecision, ScoringCycle};
use rollcall::services::normalizer::Decision;
use rollcall::services::scoring_driver::GroupOutcome;

use helpers::database::{setup_test_db, teardown_test_db};

fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, n, 0, 0, 0).unwrap()
}

fn test_config(services: &[&str]) -> Config {
    let mut config = Config::default();
    config.instances.push(PlatformInstanceConfig {
        name: "dnceng".to_string(),
        base_url: "https://platform.example.test".to_string(),
        vault_uri: "https://vault.example.test".to_string(),
        pat_secret_name: "platform-pat".to_string(),
    });
    for service in services {
        config.services.push(ServiceConfig {
            service: (*service).to_string(),
            instance: "dnceng".to_string(),
            weights: WeightConfig::default(),
        });
    }
    config
}

struct FakeSecrets;

#[async_trait]
impl CredentialProvider for FakeSecrets {
    async fn get_secret(&self, _vault: &str, name: &str) -> EngineResult<String> {
        Ok(format!("secret:{}", name))
    }
}

/// Scorer that scores 10 points per rollout, rejecting configured services.
struct FakeScorer {
    reject: Vec<String>,
}

impl FakeScorer {
    fn accepting_all() -> Self {
        Self { reject: vec![] }
    }

    fn rejecting(services: &[&str]) -> Self {
        Self {
            reject: services.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

#[async_trait]
impl Scorer for FakeScorer {
    async fn score(&self, request: ScoreRequest) -> EngineResult<Scorecard> {
        if self.reject.contains(&request.service) {
            return Err(EngineError::InvalidScoreConfiguration {
                service: request.service,
                detail: "unparseable pipeline definition".to_string(),
            });
        }
        Ok(Scorecard {
            service: request.service,
            rollout_start: request.rollout_start,
            total_score: 10.0,
            metrics: json!({ "hotfixes": 0 }),
        })
    }
}

#[derive(Default)]
struct RecordingPublisher {
    calls: Mutex<Vec<(Vec<Scorecard>, String, bool)>>,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(
        &self,
        scorecards: Vec<Scorecard>,
        publish_token: &str,
        skip_review: bool,
    ) -> EngineResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((scorecards, publish_token.to_string(), skip_review));
        Ok(())
    }
}

struct Fixture {
    pool: sqlx::SqlitePool,
    deployments: Arc<SqliteDeploymentRepository>,
    scorecards: Arc<SqliteScorecardRepository>,
    publisher: Arc<RecordingPublisher>,
    cycle: ScoringCycle,
}

async fn fixture(config: Config, scorer: FakeScorer) -> Fixture {
    let pool = setup_test_db().await;
    let deployments = Arc::new(SqliteDeploymentRepository::new(pool.clone()));
    let scorecards = Arc::new(SqliteScorecardRepository::new(pool.clone()));
    let publisher = Arc::new(RecordingPublisher::default());

    let cycle = ScoringCycle::new(
        deployments.clone(),
        scorecards.clone(),
        Arc::new(ConfigCatalog::from_config(&config)),
        Arc::new(FakeSecrets),
        Arc::new(scorer),
        publisher.clone(),
        &config,
    );

    Fixture {
        pool,
        deployments,
        scorecards,
        publisher,
        cycle,
    }
}

#[tokio::test]
async fn test_waits_while_latest_rollout_is_in_progress() {
    // Scorecard day 1; service x ended day 6, service y started day 4 and
    // never ended. At day 7 the open rollout is exactly at the stuck
    // threshold, which is not past it, so the cycle waits.
    let fx = fixture(test_config(&["x", "y"]), FakeScorer::accepting_all()).await;

    fx.scorecards
        .append(&ScorecardRecord::new("x", day(1), 5.0))
        .await
        .unwrap();
    fx.deployments
        .insert(&DeploymentRecord::new("x").with_started(day(5)).with_ended(day(6)))
        .await
        .unwrap();
    fx.deployments
        .insert(&DeploymentRecord::new("y").with_started(day(4)))
        .await
        .unwrap();

    let report = fx.cycle.run(day(7)).await.unwrap();

    assert_eq!(report.eligible, 2);
    assert!(matches!(
        report.decision,
        CycleDecision::Waiting(Decision::WaitingInProgress { ref service }) if service == "y"
    ));

    // No mutation, no publication.
    let stored = fx.deployments.list_all().await.unwrap();
    assert!(stored.iter().any(|d| d.service == "y" && d.is_open()));
    assert!(fx.publisher.calls.lock().unwrap().is_empty());

    teardown_test_db(fx.pool).await;
}

#[tokio::test]
async fn test_waits_when_latest_rollout_ended_too_recently() {
    let fx = fixture(test_config(&["x"]), FakeScorer::accepting_all()).await;

    fx.scorecards
        .append(&ScorecardRecord::new("x", day(1), 5.0))
        .await
        .unwrap();
    fx.deployments
        .insert(&DeploymentRecord::new("x").with_started(day(5)).with_ended(day(6)))
        .await
        .unwrap();

    let report = fx.cycle.run(day(7)).await.unwrap();

    assert!(matches!(
        report.decision,
        CycleDecision::Waiting(Decision::WaitingRecentEnd { ref service, ended })
            if service == "x" && ended == day(6)
    ));
    assert!(fx.publisher.calls.lock().unwrap().is_empty());

    teardown_test_db(fx.pool).await;
}

#[tokio::test]
async fn test_stuck_rollout_is_closed_then_scored() {
    // Same store as the in-progress scenario, but at day 11 the open
    // rollout's start age (7 days) is past the stuck threshold (3 days):
    // forced closure, then both services are scored and published.
    let fx = fixture(test_config(&["x", "y"]), FakeScorer::accepting_all()).await;

    fx.scorecards
        .append(&ScorecardRecord::new("x", day(1), 5.0))
        .await
        .unwrap();
    fx.deployments
        .insert(&DeploymentRecord::new("x").with_started(day(5)).with_ended(day(6)))
        .await
        .unwrap();
    fx.deployments
        .insert(&DeploymentRecord::new("y").with_started(day(4)))
        .await
        .unwrap();

    let report = fx.cycle.run(day(11)).await.unwrap();

    let CycleDecision::Scored {
        outcomes,
        published,
    } = report.decision
    else {
        panic!("expected a scored cycle, got {:?}", report.decision);
    };
    assert_eq!(published, 2);
    assert_eq!(outcomes.len(), 2);

    // The open record was force-closed and the closure persisted.
    let stored = fx.deployments.list_all().await.unwrap();
    let y = stored.iter().find(|d| d.service == "y").unwrap();
    assert_eq!(y.closure, Closure::Forced { at: day(11) });

    // Publisher saw both scorecards, with review skipped outside production.
    let calls = fx.publisher.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (batch, token, skip_review) = &calls[0];
    let services: Vec<_> = batch.iter().map(|s| s.service.as_str()).collect();
    assert_eq!(services, vec!["x", "y"]);
    assert_eq!(batch[1].rollout_start, Some(day(4)));
    assert_eq!(token, "secret:publish-token");
    assert!(*skip_review);

    teardown_test_db(fx.pool).await;
}

#[tokio::test]
async fn test_no_eligible_deployments_is_a_quiet_cycle() {
    let fx = fixture(test_config(&["x"]), FakeScorer::accepting_all()).await;

    fx.scorecards
        .append(&ScorecardRecord::new("x", day(20), 5.0))
        .await
        .unwrap();
    let old = DeploymentRecord::new("x").with_started(day(2)).with_ended(day(3));
    fx.deployments.insert(&old).await.unwrap();

    let report = fx.cycle.run(day(25)).await.unwrap();

    assert_eq!(report.eligible, 0);
    assert!(matches!(report.decision, CycleDecision::NothingToScore));

    // No store mutation and no publication.
    let stored = fx.deployments.list_all().await.unwrap();
    assert_eq!(stored, vec![old]);
    assert!(fx.publisher.calls.lock().unwrap().is_empty());

    teardown_test_db(fx.pool).await;
}

#[tokio::test]
async fn test_group_failure_does_not_suppress_later_groups() {
    let fx = fixture(
        test_config(&["x", "y", "z"]),
        FakeScorer::rejecting(&["y"]),
    )
    .await;

    fx.scorecards
        .append(&ScorecardRecord::new("x", day(1), 5.0))
        .await
        .unwrap();
    for (service, end) in [("x", 5u32), ("y", 6), ("z", 7)] {
        fx.deployments
            .insert(
                &DeploymentRecord::new(service)
                    .with_started(day(end - 1))
                    .with_ended(day(end)),
            )
            .await
            .unwrap();
    }

    let report = fx.cycle.run(day(15)).await.unwrap();

    let CycleDecision::Scored {
        outcomes,
        published,
    } = report.decision
    else {
        panic!("expected a scored cycle, got {:?}", report.decision);
    };
    assert_eq!(published, 2);
    assert!(matches!(
        &outcomes[1],
        GroupOutcome::Skipped { service, .. } if service == "y"
    ));

    let calls = fx.publisher.calls.lock().unwrap();
    let services: Vec<_> = calls[0].0.iter().map(|s| s.service.as_str()).collect();
    assert_eq!(services, vec!["x", "z"]);

    teardown_test_db(fx.pool).await;
}

#[tokio::test]
async fn test_missing_service_config_aborts_the_cycle() {
    // "x" is configured but "mystery" is not: fatal, nothing published.
    let fx = fixture(test_config(&["x"]), FakeScorer::accepting_all()).await;

    fx.scorecards
        .append(&ScorecardRecord::new("x", day(1), 5.0))
        .await
        .unwrap();
    fx.deployments
        .insert(&DeploymentRecord::new("mystery").with_started(day(4)).with_ended(day(5)))
        .await
        .unwrap();
    fx.deployments
        .insert(&DeploymentRecord::new("x").with_started(day(5)).with_ended(day(6)))
        .await
        .unwrap();

    let result = fx.cycle.run(day(15)).await;
    assert!(matches!(
        result,
        Err(EngineError::MissingServiceConfig(s)) if s == "mystery"
    ));
    assert!(fx.publisher.calls.lock().unwrap().is_empty());

    teardown_test_db(fx.pool).await;
}

#[tokio::test]
async fn test_rerun_after_scoring_cycle_is_idempotent_on_the_store() {
    // A cycle that forced a closure leaves the store in a state where an
    // immediate rerun performs no further deployment mutation.
    let fx = fixture(test_config(&["y"]), FakeScorer::accepting_all()).await;

    fx.scorecards
        .append(&ScorecardRecord::new("y", day(1), 5.0))
        .await
        .unwrap();
    fx.deployments
        .insert(&DeploymentRecord::new("y").with_started(day(4)))
        .await
        .unwrap();

    fx.cycle.run(day(11)).await.unwrap();
    let after_first = fx.deployments.list_all().await.unwrap();

    fx.cycle.run(day(11)).await.unwrap();
    let after_second = fx.deployments.list_all().await.unwrap();

    assert_eq!(after_first, after_second);

    teardown_test_db(fx.pool).await;
}
