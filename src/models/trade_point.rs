use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recorded buy/sell point, with the symbol's close price captured at the
/// time the trade was entered.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TradePoint {
    pub id: Uuid,
    pub symbol: String,
    pub date: NaiveDate,
    pub side: String,
    pub amount: f64,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTradePoint {
    pub symbol: String,
    pub date: NaiveDate,
    pub side: String,
    pub amount: f64,
}
