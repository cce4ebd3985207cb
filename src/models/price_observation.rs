use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// One persisted close per (symbol, date); re-syncing the same day overwrites
// the row instead of appending.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceObservation {
    pub id: Uuid,
    pub symbol: String,
    pub date: NaiveDate,
    pub close_price: f64,
    pub recorded_at: DateTime<Utc>,
}
