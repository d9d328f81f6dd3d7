//! Command-line interface.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::domain::models::config::Config;
use crate::infrastructure::config::ConfigLoader;

#[derive(Parser, Debug)]
#[command(name = "rollcall", version, about = "Rollout audit engine: scores stabilized deployments and publishes scorecards")]
pub struct Cli {
    /// Path to a configuration file (defaults to rollcall.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or upgrade the record store schema
    Init(commands::init::InitArgs),
    /// Insert a baseline scorecard so eligibility has a cutoff
    Seed(commands::seed::SeedArgs),
    /// Run one scoring cycle
    Run(commands::run::RunArgs),
}

/// Load configuration, preferring an explicit file when given.
pub fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

pub fn handle_error(err: anyhow::Error) {
    eprintln!("error: {:#}", err);
    std::process::exit(1);
}
