//! Implementation of the `rollcall init` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::load_config;
use crate::domain::models::config::Config;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long, short)]
    pub force: bool,
}

pub async fn execute(args: InitArgs, config_path: Option<&PathBuf>) -> Result<()> {
    let config_file = config_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from("rollcall.yaml"));

    if args.force || !Path::new(&config_file).exists() {
        let starter = serde_yaml::to_string(&Config::default())
            .context("Failed to render starter configuration")?;
        fs::write(&config_file, starter)
            .await
            .with_context(|| format!("Failed to write {}", config_file.display()))?;
        println!("Wrote starter configuration to {}", config_file.display());
    }

    let config = load_config(Some(&config_file))?;
    let pool = initialize_database(&config.database.path, config.database.max_connections).await?;
    pool.close().await;

    println!("Initialized record store at {}", config.database.path);
    Ok(())
}
