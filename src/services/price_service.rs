use sqlx::PgPool;
use tracing::error;

use crate::db;
use crate::errors::AppError;
use crate::external::price_provider::{DailyClose, PriceProvider, PriceProviderError};
use crate::models::PriceObservation;

pub async fn get_history(pool: &PgPool, symbol: &str) -> Result<Vec<PriceObservation>, AppError> {
    db::price_queries::fetch_all(pool, symbol).await.map_err(|e| {
        error!("Failed to fetch price history for {}: {}", symbol, e);
        AppError::Db(e)
    })
}

/// Most recent `days` stored observations, oldest first.
pub async fn get_window(
    pool: &PgPool,
    symbol: &str,
    days: i64,
) -> Result<Vec<PriceObservation>, AppError> {
    db::price_queries::fetch_window(pool, symbol, days)
        .await
        .map_err(|e| {
            error!("Failed to fetch price window for {}: {}", symbol, e);
            AppError::Db(e)
        })
}

pub async fn get_latest(pool: &PgPool, symbol: &str) -> Result<PriceObservation, AppError> {
    db::price_queries::fetch_latest(pool, symbol)
        .await
        .map_err(|e| {
            error!("Failed to fetch latest price for {}: {}", symbol, e);
            AppError::Db(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("No price data stored for {}", symbol)))
}

/// Single-pass fetch-then-upsert for one symbol. No retry: a failed fetch or
/// a failed write surfaces as an error for the caller to log and move past.
pub async fn sync_latest(
    pool: &PgPool,
    provider: &dyn PriceProvider,
    symbol: &str,
) -> Result<DailyClose, AppError> {
    let close = match provider.latest_daily_close(symbol).await {
        Ok(close) => close,
        Err(PriceProviderError::RateLimited) => return Err(AppError::RateLimited),
        Err(e) => return Err(AppError::External(e.to_string())),
    };

    db::price_queries::upsert_latest(pool, symbol, &close)
        .await
        .map_err(|e| {
            error!("Failed to store close for {} ({}): {}", symbol, close.date, e);
            AppError::Db(e)
        })?;

    Ok(close)
}
