use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::TradePoint;

/// Upsert a trade point keyed by (symbol, date); a second entry for the same
/// day replaces the first.
pub async fn upsert(pool: &PgPool, trade: &TradePoint) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO trade_points (id, symbol, date, side, amount, price, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        ON CONFLICT (symbol, date)
        DO UPDATE SET side = EXCLUDED.side,
                      amount = EXCLUDED.amount,
                      price = EXCLUDED.price
        "#,
    )
    .bind(trade.id)
    .bind(&trade.symbol)
    .bind(trade.date)
    .bind(&trade.side)
    .bind(trade.amount)
    .bind(trade.price)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns the number of rows deleted (0 when no such trade exists).
pub async fn delete(pool: &PgPool, symbol: &str, date: NaiveDate) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM trade_points
        WHERE symbol = $1 AND date = $2
        "#,
    )
    .bind(symbol)
    .bind(date)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn fetch_since(pool: &PgPool, from: NaiveDate) -> Result<Vec<TradePoint>, sqlx::Error> {
    sqlx::query_as::<_, TradePoint>(
        r#"
        SELECT id, symbol, date, side, amount, price, created_at
        FROM trade_points
        WHERE date >= $1
        ORDER BY date ASC
        "#,
    )
    .bind(from)
    .fetch_all(pool)
    .await
}
