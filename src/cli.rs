//! Command-line interface
//!
//! Provides commands for:
//! - `sync`: run the daily price sync once (the default)
//! - `price`: look up the latest daily close for a symbol
//! - `history`: show stored observations for a symbol
//! - `trade`: trade journal operations

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::SyncConfig;
use crate::external::price_provider::PriceProvider;
use crate::jobs::price_sync_job;
use crate::models::CreateTradePoint;
use crate::services::{price_service, trade_service};
use crate::state::AppState;

/// ETF daily close-price sync
#[derive(Parser)]
#[command(name = "etfsync")]
#[command(about = "Fetches daily ETF closing prices and stores the latest per symbol")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run; defaults to `sync`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the price sync once over the configured symbols
    Sync(SyncArgs),
    /// Look up the latest daily close for a symbol (no write)
    Price(PriceArgs),
    /// Show stored observations for a symbol
    History(HistoryArgs),
    /// Trade journal operations
    #[command(subcommand)]
    Trade(TradeCommands),
}

#[derive(Args, Default)]
pub struct SyncArgs {
    /// Symbols to sync (comma-separated); defaults to the configured list
    #[arg(long, short, value_delimiter = ',')]
    pub symbols: Option<Vec<String>>,
}

#[derive(Args)]
pub struct PriceArgs {
    /// Ticker symbol, e.g. VOO
    pub symbol: String,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Ticker symbol, e.g. VOO
    pub symbol: String,

    /// Only the most recent N observations
    #[arg(long, short)]
    pub days: Option<i64>,

    /// Only the single latest stored observation
    #[arg(long, conflicts_with = "days")]
    pub latest: bool,
}

#[derive(Subcommand)]
pub enum TradeCommands {
    /// Record (or overwrite) a buy/sell point at the current close price
    Add(TradeAddArgs),
    /// Delete a recorded trade point
    Remove(TradeRemoveArgs),
    /// List trade points within a look-back period
    List(TradeListArgs),
}

#[derive(Args)]
pub struct TradeAddArgs {
    /// Ticker symbol
    #[arg(long, short)]
    pub symbol: String,

    /// Trade date (YYYY-MM-DD)
    #[arg(long, short)]
    pub date: String,

    /// Trade side: buy or sell
    #[arg(long)]
    pub side: String,

    /// Traded amount in account currency
    #[arg(long, short)]
    pub amount: f64,
}

#[derive(Args)]
pub struct TradeRemoveArgs {
    /// Ticker symbol
    #[arg(long, short)]
    pub symbol: String,

    /// Trade date (YYYY-MM-DD)
    #[arg(long, short)]
    pub date: String,
}

#[derive(Args)]
pub struct TradeListArgs {
    /// Look-back period: 1m, 3m, 1y, 3y or 5y
    #[arg(long, short, default_value = "1m")]
    pub period: String,
}

/// Execute the sync command. Per-symbol failures are already logged by the
/// job; the process still exits 0 so a partially failed batch is not fatal.
pub async fn sync(state: &AppState, config: &SyncConfig, args: SyncArgs) -> Result<()> {
    let symbols = match args.symbols {
        Some(list) => crate::config::normalize_symbols(list),
        None => config.symbols.clone(),
    };

    price_sync_job::run(state, &symbols).await;
    Ok(())
}

/// Execute the price command: one quote, no write.
pub async fn price(state: &AppState, args: PriceArgs) -> Result<()> {
    let symbol = args.symbol.trim().to_uppercase();
    let close = state.price_provider.latest_daily_close(&symbol).await?;
    info!("[{}] latest close {} on {}", symbol, close.close, close.date);
    Ok(())
}

/// Execute the history command against stored observations only.
pub async fn history(state: &AppState, args: HistoryArgs) -> Result<()> {
    let symbol = args.symbol.trim().to_uppercase();

    if args.latest {
        let latest = price_service::get_latest(&state.pool, &symbol).await?;
        info!(
            "[{}] latest stored close {} for {} (recorded {})",
            symbol, latest.close_price, latest.date, latest.recorded_at
        );
        return Ok(());
    }

    let observations = match args.days {
        Some(days) => price_service::get_window(&state.pool, &symbol, days).await?,
        None => price_service::get_history(&state.pool, &symbol).await?,
    };

    if observations.is_empty() {
        info!("[{}] no stored observations", symbol);
        return Ok(());
    }

    for obs in observations {
        info!("[{}] {} close {}", symbol, obs.date, obs.close_price);
    }

    Ok(())
}

/// Execute a trade journal command.
pub async fn trade(state: &AppState, cmd: TradeCommands) -> Result<()> {
    match cmd {
        TradeCommands::Add(args) => {
            let input = CreateTradePoint {
                symbol: args.symbol.trim().to_uppercase(),
                date: parse_date(&args.date)?,
                side: args.side,
                amount: args.amount,
            };
            let trade = trade_service::record_trade(
                &state.pool,
                state.price_provider.as_ref(),
                input,
            )
            .await?;
            info!(
                "[{}] recorded {} of {} on {} at close {}",
                trade.symbol, trade.side, trade.amount, trade.date, trade.price
            );
        }
        TradeCommands::Remove(args) => {
            let symbol = args.symbol.trim().to_uppercase();
            let date = parse_date(&args.date)?;
            trade_service::remove_trade(&state.pool, &symbol, date).await?;
            info!("[{}] removed trade point for {}", symbol, date);
        }
        TradeCommands::List(args) => {
            let trades = trade_service::list_trades(&state.pool, &args.period).await?;
            info!("{} trade points in the last {}", trades.len(), args.period);
            for t in trades {
                info!(
                    "[{}] {} {} {} at close {}",
                    t.symbol, t.date, t.side, t.amount, t.price
                );
            }
        }
    }
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date {:?} (expected YYYY-MM-DD): {}", raw, e))
}
