use anyhow::{bail, Context};

/// Symbols tracked when no override is configured.
const DEFAULT_SYMBOLS: [&str; 3] = ["VOO", "VTI", "QQQ"];

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub database_url: String,
    pub symbols: Vec<String>,
}

impl SyncConfig {
    /// Read configuration from the environment. The symbol list is fixed for
    /// the process lifetime: either the built-in default or the
    /// `ETF_SYMBOLS` override, resolved once here.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let symbols = match std::env::var("ETF_SYMBOLS") {
            Ok(raw) => parse_symbols(&raw),
            Err(_) => DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        };

        if symbols.is_empty() {
            bail!("ETF_SYMBOLS is set but contains no symbols");
        }

        Ok(Self {
            database_url,
            symbols,
        })
    }
}

/// Parse a comma-separated symbol list, dropping empty entries.
pub fn parse_symbols(raw: &str) -> Vec<String> {
    normalize_symbols(raw.split(',').map(str::to_string).collect())
}

pub fn normalize_symbols(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
