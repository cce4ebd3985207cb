use sqlx::PgPool;
use uuid::Uuid;

use crate::external::price_provider::DailyClose;
use crate::models::PriceObservation;

/// Upsert the latest close for a symbol. `recorded_at` is assigned by the
/// database server on every write, overwrites included.
pub async fn upsert_latest(
    pool: &PgPool,
    symbol: &str,
    point: &DailyClose,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO price_observations (id, symbol, date, close_price, recorded_at)
        VALUES ($1, $2, $3, $4, NOW())
        ON CONFLICT (symbol, date)
        DO UPDATE SET close_price = EXCLUDED.close_price, recorded_at = NOW()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(symbol)
    .bind(point.date)
    .bind(point.close)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fetch_latest(
    pool: &PgPool,
    symbol: &str,
) -> Result<Option<PriceObservation>, sqlx::Error> {
    sqlx::query_as::<_, PriceObservation>(
        r#"
        SELECT id, symbol, date, close_price, recorded_at
        FROM price_observations
        WHERE symbol = $1
        ORDER BY date DESC
        LIMIT 1
        "#,
    )
    .bind(symbol)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_all(
    pool: &PgPool,
    symbol: &str,
) -> Result<Vec<PriceObservation>, sqlx::Error> {
    sqlx::query_as::<_, PriceObservation>(
        r#"
        SELECT id, symbol, date, close_price, recorded_at
        FROM price_observations
        WHERE symbol = $1
        ORDER BY date ASC
        "#,
    )
    .bind(symbol)
    .fetch_all(pool)
    .await
}

/// Fetch the most recent N observations for a symbol, oldest first.
pub async fn fetch_window(
    pool: &PgPool,
    symbol: &str,
    days: i64,
) -> Result<Vec<PriceObservation>, sqlx::Error> {
    sqlx::query_as::<_, PriceObservation>(
        r#"
        SELECT id, symbol, date, close_price, recorded_at
        FROM price_observations
        WHERE symbol = $1
        ORDER BY date DESC
        LIMIT $2
        "#,
    )
    .bind(symbol)
    .bind(days)
    .fetch_all(pool)
    .await
    .map(|mut rows| {
        rows.reverse();
        rows
    })
}
