use tracing::{error, info};

use crate::services::price_service;
use crate::state::AppState;

/// Outcome counts for one sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub items_processed: i32,
    pub items_failed: i32,
}

impl SyncReport {
    pub fn tally<T, E>(outcomes: &[Result<T, E>]) -> Self {
        let mut report = SyncReport::default();

        for outcome in outcomes {
            match outcome {
                Ok(_) => report.items_processed += 1,
                Err(_) => report.items_failed += 1,
            }
        }

        report
    }
}

/// Run one pass over `symbols`: fetch the latest close and upsert it.
///
/// Symbols are handled strictly in sequence and independently. A fetch or
/// write failure for one symbol is logged and the loop moves on; the batch
/// itself never fails.
pub async fn run(state: &AppState, symbols: &[String]) -> SyncReport {
    info!("Starting price sync for {} symbols", symbols.len());

    let mut outcomes = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let outcome =
            price_service::sync_latest(&state.pool, state.price_provider.as_ref(), symbol).await;

        match &outcome {
            Ok(close) => {
                info!("[{}] saved close {} for {}", symbol, close.close, close.date);
            }
            Err(e) => {
                error!("[{}] sync failed: {}", symbol, e);
            }
        }

        outcomes.push(outcome);
    }

    let report = SyncReport::tally(&outcomes);
    info!(
        "Price sync completed: {} synced, {} failed",
        report.items_processed, report.items_failed
    );

    report
}
