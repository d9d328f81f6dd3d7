//! Implementation of the `rollcall run` command: one scoring cycle.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::Args;

use crate::adapters::platform::{PlatformScorer, ScorecardUploader};
use crate::adapters::sqlite::{
    initialize_database, SqliteDeploymentRepository, SqliteScorecardRepository,
};
use crate::cli::load_config;
use crate::domain::models::config::Environment;
use crate::infrastructure::config::ConfigCatalog;
use crate::infrastructure::credentials::EnvCredentialProvider;
use crate::services::cycle::{CycleDecision, ScoringCycle};
use crate::services::normalizer::Decision;
use crate::services::scoring_driver::GroupOutcome;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the configured environment (production or staging)
    #[arg(long)]
    pub environment: Option<String>,
}

pub async fn execute(args: RunArgs, config_path: Option<&PathBuf>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(environment) = &args.environment {
        config.environment = match environment.as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            other => bail!("unknown environment '{}'; expected production or staging", other),
        };
    }

    let pool = initialize_database(&config.database.path, config.database.max_connections).await?;
    let deployments = Arc::new(SqliteDeploymentRepository::new(pool.clone()));
    let scorecards = Arc::new(SqliteScorecardRepository::new(pool));

    let cycle = ScoringCycle::new(
        deployments,
        scorecards.clone(),
        Arc::new(ConfigCatalog::from_config(&config)),
        Arc::new(EnvCredentialProvider),
        Arc::new(PlatformScorer::new()),
        Arc::new(ScorecardUploader::new(
            scorecards,
            config.publish.review_url.clone(),
        )),
        &config,
    );

    let report = cycle.run(Utc::now()).await?;

    println!(
        "Cycle complete: {} deployments, {} scorecards, {} eligible",
        report.deployments_found, report.scorecards_found, report.eligible
    );
    match &report.decision {
        CycleDecision::NothingToScore => {
            println!("Nothing to score this cycle");
        }
        CycleDecision::Waiting(Decision::WaitingRecentEnd { service, ended }) => {
            println!("Waiting: {} completed at {} (buffer not elapsed)", service, ended);
        }
        CycleDecision::Waiting(Decision::WaitingInProgress { service }) => {
            println!("Waiting: rollout of {} is still in progress", service);
        }
        CycleDecision::Waiting(Decision::Proceed) => unreachable!("proceed is not a waiting state"),
        CycleDecision::Scored {
            outcomes,
            published,
        } => {
            for outcome in outcomes {
                match outcome {
                    GroupOutcome::Scored(scorecard) => {
                        println!("  scored {} ({:.1})", scorecard.service, scorecard.total_score);
                    }
                    GroupOutcome::Skipped { service, reason, .. } => {
                        println!("  skipped {}: {}", service, reason);
                    }
                }
            }
            println!("Published {} scorecard(s)", published);
        }
    }

    Ok(())
}
