//! Rollcall CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rollcall::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => rollcall::cli::commands::init::execute(args, cli.config.as_ref()).await,
        Commands::Seed(args) => rollcall::cli::commands::seed::execute(args, cli.config.as_ref()).await,
        Commands::Run(args) => rollcall::cli::commands::run::execute(args, cli.config.as_ref()).await,
    };

    if let Err(err) = result {
        rollcall::cli::handle_error(err);
    }
}
