//! Offline option chains from CSV snapshots.
//!
//! Each ticker has a file `<data_dir>/<ticker>.csv` (lower-case name) with
//! header `name,posix_close_date,ticker,type,strike,bid,ask`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use odss_core::{ChainError, OptionChainProvider, OptionContract, OptionType};

#[derive(Debug, Deserialize)]
struct ChainRow {
    name: String,
    posix_close_date: i64,
    ticker: String,
    #[serde(rename = "type")]
    option_type: OptionType,
    strike: Decimal,
    bid: Decimal,
    ask: Decimal,
}

impl From<ChainRow> for OptionContract {
    fn from(row: ChainRow) -> Self {
        Self {
            contract_name: row.name,
            expiration: row.posix_close_date,
            ticker: row.ticker.to_uppercase(),
            option_type: row.option_type,
            strike: row.strike,
            bid: row.bid,
            ask: row.ask,
        }
    }
}

/// Serves chains from local snapshot files.
#[derive(Debug, Clone)]
pub struct DemoChainProvider {
    data_dir: PathBuf,
}

impl DemoChainProvider {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn chain_path(&self, ticker: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.csv", ticker.trim().to_lowercase()))
    }

    /// Parses snapshot CSV text for `ticker`.
    ///
    /// # Errors
    /// Returns `ChainError::Malformed` naming the first bad row.
    pub fn parse(ticker: &str, bytes: &[u8]) -> Result<Vec<OptionContract>, ChainError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(bytes);

        reader
            .deserialize::<ChainRow>()
            .enumerate()
            .map(|(index, row)| {
                row.map(OptionContract::from)
                    .map_err(|e| ChainError::Malformed {
                        ticker: ticker.to_string(),
                        reason: format!("row {}: {e}", index + 1),
                    })
            })
            .collect()
    }
}

#[async_trait]
impl OptionChainProvider for DemoChainProvider {
    async fn fetch(&self, ticker: &str) -> Result<Vec<OptionContract>, ChainError> {
        let path = self.chain_path(ticker);
        let bytes = tokio::fs::read(&path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ChainError::NotFound {
                    ticker: ticker.to_string(),
                }
            } else {
                ChainError::Io {
                    ticker: ticker.to_string(),
                    source,
                }
            }
        })?;

        let contracts = Self::parse(ticker, &bytes)?;
        debug!(ticker, path = %path.display(), contracts = contracts.len(), "Loaded demo chain");
        Ok(contracts)
    }

    fn name(&self) -> &str {
        "demo"
    }
}
