use chrono::{Months, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{CreateTradePoint, TradePoint};

/// Record (or overwrite) a trade point. The entry price is the symbol's
/// current close as reported by the provider; the trade is not recorded when
/// the quote cannot be fetched.
pub async fn record_trade(
    pool: &PgPool,
    provider: &dyn PriceProvider,
    input: CreateTradePoint,
) -> Result<TradePoint, AppError> {
    validate(&input)?;

    let quote = match provider.latest_daily_close(&input.symbol).await {
        Ok(quote) => quote,
        Err(PriceProviderError::RateLimited) => return Err(AppError::RateLimited),
        Err(e) => return Err(AppError::External(e.to_string())),
    };

    let trade = TradePoint {
        id: Uuid::new_v4(),
        symbol: input.symbol,
        date: input.date,
        side: input.side.to_lowercase(),
        amount: input.amount,
        price: quote.close,
        created_at: Utc::now(),
    };

    db::trade_queries::upsert(pool, &trade).await.map_err(|e| {
        error!(
            "Failed to store trade point for {} ({}): {}",
            trade.symbol, trade.date, e
        );
        AppError::Db(e)
    })?;

    Ok(trade)
}

pub async fn remove_trade(pool: &PgPool, symbol: &str, date: NaiveDate) -> Result<(), AppError> {
    let deleted = db::trade_queries::delete(pool, symbol, date).await?;

    if deleted == 0 {
        return Err(AppError::NotFound(format!(
            "No trade recorded for {} on {}",
            symbol, date
        )));
    }

    Ok(())
}

pub async fn list_trades(pool: &PgPool, period: &str) -> Result<Vec<TradePoint>, AppError> {
    let from = period_start(Utc::now().date_naive(), period)?;

    db::trade_queries::fetch_since(pool, from)
        .await
        .map_err(AppError::Db)
}

fn validate(input: &CreateTradePoint) -> Result<(), AppError> {
    if input.symbol.trim().is_empty() {
        return Err(AppError::Validation("symbol must not be empty".into()));
    }

    match input.side.to_lowercase().as_str() {
        "buy" | "sell" => {}
        other => {
            return Err(AppError::Validation(format!(
                "side must be buy or sell, got {:?}",
                other
            )))
        }
    }

    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(AppError::Validation(
            "amount must be a positive number".into(),
        ));
    }

    Ok(())
}

/// Start of the look-back window for a period selector.
fn period_start(today: NaiveDate, period: &str) -> Result<NaiveDate, AppError> {
    let months = match period {
        "1m" => 1,
        "3m" => 3,
        "1y" => 12,
        "3y" => 36,
        "5y" => 60,
        other => {
            return Err(AppError::Validation(format!(
                "unknown period {:?}, expected one of 1m, 3m, 1y, 3y, 5y",
                other
            )))
        }
    };

    today
        .checked_sub_months(Months::new(months))
        .ok_or_else(|| AppError::Validation(format!("period {} underflows the calendar", period)))
}
