use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::external::price_provider::{DailyClose, PriceProvider, PriceProviderError};

const QUERY_URL: &str = "https://www.alphavantage.co/query";

pub struct AlphaVantage {
    client: reqwest::Client,
    api_key: String,
}

impl AlphaVantage {
    pub fn from_env() -> Result<Self, PriceProviderError> {
        let api_key = std::env::var("ALPHA_VANTAGE_API_KEY")
            .map_err(|_| PriceProviderError::Api("ALPHA_VANTAGE_API_KEY not set".into()))?;

        Ok(Self::new(api_key))
    }

    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DailySeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<BTreeMap<String, DailyBar>>,

    // Throttled requests come back as
    // { "Note": "Thank you for using Alpha Vantage! ... 5 calls per minute ..." }
    #[serde(rename = "Note")]
    note: Option<String>,

    // { "Error Message": "Invalid API call. ..." }
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "4. close")]
    close: String,
}

/// Pick the most recent close out of a daily-series payload.
///
/// Date keys are "YYYY-MM-DD", so lexicographic order matches chronological
/// order and the BTreeMap's last entry is the latest trading day.
fn latest_close(body: DailySeriesResponse) -> Result<DailyClose, PriceProviderError> {
    if body.note.is_some() {
        return Err(PriceProviderError::RateLimited);
    }

    if let Some(msg) = body.error_message {
        return Err(PriceProviderError::Api(msg));
    }

    let series = body.series.ok_or(PriceProviderError::EmptySeries)?;
    let (date_str, bar) = series
        .iter()
        .next_back()
        .ok_or(PriceProviderError::EmptySeries)?;

    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

    let close = bar
        .close
        .parse::<f64>()
        .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

    Ok(DailyClose { date, close })
}

#[async_trait]
impl PriceProvider for AlphaVantage {
    async fn latest_daily_close(&self, symbol: &str) -> Result<DailyClose, PriceProviderError> {
        let resp = self
            .client
            .get(QUERY_URL)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "compact"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let body = resp
            .json::<DailySeriesResponse>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        latest_close(body)
    }
}
