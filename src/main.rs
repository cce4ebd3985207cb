mod cli;
mod config;
mod db;
mod errors;
mod external;
mod jobs;
mod logging;
mod models;
mod services;
mod state;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use crate::cli::{Cli, Commands, SyncArgs};
use crate::config::SyncConfig;
use crate::external::alphavantage::AlphaVantage;
use crate::logging::LoggingConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let args = Cli::parse();
    let config = SyncConfig::from_env()?;

    // Storage credentials are acquired once, up front; anything wrong here is
    // fatal before a single fetch is attempted.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres (check DATABASE_URL)")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    let provider = AlphaVantage::from_env()
        .context("failed to create Alpha Vantage client (check ALPHA_VANTAGE_API_KEY)")?;

    let state = AppState {
        pool,
        price_provider: Arc::new(provider),
    };

    match args.command.unwrap_or_else(|| Commands::Sync(SyncArgs::default())) {
        Commands::Sync(args) => cli::sync(&state, &config, args).await?,
        Commands::Price(args) => cli::price(&state, args).await?,
        Commands::History(args) => cli::history(&state, args).await?,
        Commands::Trade(cmd) => cli::trade(&state, cmd).await?,
    }

    Ok(())
}
