/// Price sync pipeline tests
///
/// Model the sync contract against an in-memory store and a scripted quote
/// provider:
/// - latest-date selection over ISO date keys
/// - error / rate-limit / empty payloads produce no write
/// - re-running upserts instead of duplicating
/// - one symbol's failure never aborts the batch
///
/// NOTE: These tests validate the pipeline rules and data shapes. Runs
/// against a live Postgres and the real Alpha Vantage endpoint are exercised
/// manually.

use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Provider side: scripted responses
// ---------------------------------------------------------------------------

/// The response shapes the provider can hand back for a symbol.
enum Payload {
    /// date string -> "4. close" string, as Alpha Vantage returns it
    Series(BTreeMap<String, String>),
    ErrorMessage(String),
    RateLimitNote(String),
    Empty,
    Transport(String),
}

/// Extract the latest (date, close) pair, or a printable failure reason.
fn fetch(payload: &Payload) -> Result<(String, f64), String> {
    match payload {
        Payload::Series(series) => {
            // ISO date keys sort lexicographically == chronologically
            let (date, raw_close) = series
                .iter()
                .next_back()
                .ok_or_else(|| "empty time series".to_string())?;
            let close = raw_close
                .parse::<f64>()
                .map_err(|e| format!("unparseable close: {}", e))?;
            Ok((date.clone(), close))
        }
        Payload::ErrorMessage(msg) => Err(format!("provider error: {}", msg)),
        Payload::RateLimitNote(note) => Err(format!("rate limited: {}", note)),
        Payload::Empty => Err("empty time series".to_string()),
        Payload::Transport(msg) => Err(format!("network error: {}", msg)),
    }
}

// ---------------------------------------------------------------------------
// Storage side: keyed upserts with injectable failures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct StoredObservation {
    date: String,
    price: f64,
    writes: u32,
}

#[derive(Default)]
struct InMemoryStore {
    rows: HashMap<(String, String), StoredObservation>,
    deny_symbols: Vec<String>,
}

impl InMemoryStore {
    fn upsert(&mut self, symbol: &str, date: &str, price: f64) -> Result<(), String> {
        if self.deny_symbols.iter().any(|s| s == symbol) {
            return Err(format!("permission denied writing {}", symbol));
        }

        self.rows
            .entry((symbol.to_string(), date.to_string()))
            .and_modify(|row| {
                row.price = price;
                row.writes += 1;
            })
            .or_insert(StoredObservation {
                date: date.to_string(),
                price,
                writes: 1,
            });

        Ok(())
    }

    fn get(&self, symbol: &str, date: &str) -> Option<&StoredObservation> {
        self.rows.get(&(symbol.to_string(), date.to_string()))
    }

    fn rows_for(&self, symbol: &str) -> usize {
        self.rows.keys().filter(|(s, _)| s == symbol).count()
    }
}

// ---------------------------------------------------------------------------
// The pipeline under test: sequential, independently failable steps
// ---------------------------------------------------------------------------

fn run_sync(
    symbols: &[&str],
    quotes: &HashMap<String, Payload>,
    store: &mut InMemoryStore,
) -> (u32, u32) {
    let mut processed = 0;
    let mut failed = 0;

    for symbol in symbols {
        let payload = match quotes.get(*symbol) {
            Some(p) => p,
            None => {
                failed += 1;
                continue;
            }
        };

        let outcome = fetch(payload)
            .and_then(|(date, price)| store.upsert(symbol, &date, price));

        match outcome {
            Ok(()) => processed += 1,
            Err(_) => failed += 1,
        }
    }

    (processed, failed)
}

fn series(entries: &[(&str, &str)]) -> Payload {
    Payload::Series(
        entries
            .iter()
            .map(|(d, c)| (d.to_string(), c.to_string()))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn persists_the_close_at_the_latest_date() {
    let mut quotes = HashMap::new();
    quotes.insert(
        "VOO".to_string(),
        series(&[("2024-01-05", "410.12"), ("2024-01-04", "409.00")]),
    );

    let mut store = InMemoryStore::default();
    let (processed, failed) = run_sync(&["VOO"], &quotes, &mut store);

    assert_eq!((processed, failed), (1, 0));
    let row = store.get("VOO", "2024-01-05").expect("row written");
    assert_eq!(row.date, "2024-01-05");
    assert_eq!(row.price, 410.12);
    assert_eq!(store.rows_for("VOO"), 1);
}

#[test]
fn rate_limit_note_writes_nothing() {
    let mut quotes = HashMap::new();
    quotes.insert(
        "VOO".to_string(),
        Payload::RateLimitNote("rate limit exceeded".to_string()),
    );

    let mut store = InMemoryStore::default();
    let (processed, failed) = run_sync(&["VOO"], &quotes, &mut store);

    assert_eq!((processed, failed), (0, 1));
    assert_eq!(store.rows_for("VOO"), 0);
}

#[test]
fn provider_error_and_empty_series_write_nothing() {
    let mut quotes = HashMap::new();
    quotes.insert(
        "VTI".to_string(),
        Payload::ErrorMessage("Invalid API call.".to_string()),
    );
    quotes.insert("QQQ".to_string(), Payload::Empty);

    let mut store = InMemoryStore::default();
    let (processed, failed) = run_sync(&["VTI", "QQQ"], &quotes, &mut store);

    assert_eq!((processed, failed), (0, 2));
    assert!(store.rows.is_empty());
}

#[test]
fn rerunning_overwrites_instead_of_duplicating() {
    let mut quotes = HashMap::new();
    quotes.insert("VOO".to_string(), series(&[("2024-01-05", "410.12")]));

    let mut store = InMemoryStore::default();
    run_sync(&["VOO"], &quotes, &mut store);

    // Same trading day, corrected price on the second run
    quotes.insert("VOO".to_string(), series(&[("2024-01-05", "411.00")]));
    run_sync(&["VOO"], &quotes, &mut store);

    let row = store.get("VOO", "2024-01-05").expect("row written");
    assert_eq!(row.price, 411.00);
    assert_eq!(row.writes, 2);
    assert_eq!(store.rows_for("VOO"), 1);
}

#[test]
fn one_symbol_fetch_failure_does_not_stop_the_batch() {
    let mut quotes = HashMap::new();
    quotes.insert(
        "VOO".to_string(),
        Payload::Transport("connection reset".to_string()),
    );
    quotes.insert("VTI".to_string(), series(&[("2024-01-05", "243.50")]));
    quotes.insert("QQQ".to_string(), series(&[("2024-01-05", "409.30")]));

    let mut store = InMemoryStore::default();
    let (processed, failed) = run_sync(&["VOO", "VTI", "QQQ"], &quotes, &mut store);

    assert_eq!((processed, failed), (2, 1));
    assert!(store.get("VTI", "2024-01-05").is_some());
    assert!(store.get("QQQ", "2024-01-05").is_some());
    assert!(store.get("VOO", "2024-01-05").is_none());
}

#[test]
fn one_symbol_write_failure_does_not_stop_the_batch() {
    let mut quotes = HashMap::new();
    quotes.insert("VOO".to_string(), series(&[("2024-01-05", "410.12")]));
    quotes.insert("VTI".to_string(), series(&[("2024-01-05", "243.50")]));

    let mut store = InMemoryStore {
        deny_symbols: vec!["VOO".to_string()],
        ..Default::default()
    };
    let (processed, failed) = run_sync(&["VOO", "VTI"], &quotes, &mut store);

    assert_eq!((processed, failed), (1, 1));
    assert!(store.get("VOO", "2024-01-05").is_none());
    assert!(store.get("VTI", "2024-01-05").is_some());
}

#[test]
fn unparseable_close_counts_as_a_failure() {
    let mut quotes = HashMap::new();
    quotes.insert("VOO".to_string(), series(&[("2024-01-05", "n/a")]));

    let mut store = InMemoryStore::default();
    let (processed, failed) = run_sync(&["VOO"], &quotes, &mut store);

    assert_eq!((processed, failed), (0, 1));
    assert!(store.rows.is_empty());
}
