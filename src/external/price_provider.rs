use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Most recent daily close known for a symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider error: {0}")]
    Api(String),

    // Signalled in the response body, not via HTTP status
    #[error("rate limited")]
    RateLimited,

    #[error("empty or missing price series")]
    EmptySeries,

    #[error("parse error: {0}")]
    Parse(String),
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetch the latest available daily close for `symbol`.
    async fn latest_daily_close(&self, symbol: &str) -> Result<DailyClose, PriceProviderError>;
}
