//! Implementation of the `rollcall seed` command.
//!
//! Eligibility compares deployments against the most recent scorecard date;
//! with an empty scorecard table every historical deployment would be
//! selected. Seeding a baseline scorecard gives the engine its starting
//! cutoff.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::Args;

use crate::adapters::sqlite::{initialize_database, SqliteScorecardRepository};
use crate::cli::load_config;
use crate::domain::models::scorecard::ScorecardRecord;
use crate::domain::ports::scorecard_repository::ScorecardRepository;

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Service the baseline scorecard is attributed to
    #[arg(long)]
    pub service: String,

    /// Baseline date (YYYY-MM-DD); deployments ending before this date plus
    /// the buffer will never be scored
    #[arg(long)]
    pub date: String,
}

pub async fn execute(args: SeedArgs, config_path: Option<&PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;

    let date = NaiveDate::parse_from_str(&args.date, "%Y-%m-%d")
        .context("date must be formatted YYYY-MM-DD")?
        .and_hms_opt(0, 0, 0)
        .context("date has no midnight")?;
    let date = Utc.from_utc_datetime(&date);

    let pool = initialize_database(&config.database.path, config.database.max_connections).await?;
    let repo = SqliteScorecardRepository::new(pool);

    let record = ScorecardRecord::new(&args.service, date, 0.0);
    repo.append(&record).await?;

    println!("Seeded baseline scorecard for '{}' dated {}", args.service, date);
    Ok(())
}
