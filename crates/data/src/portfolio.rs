//! Portfolio file ingestion.
//!
//! Format: `ticker,buy,sell,shares`. One row per held security; a row whose
//! ticker is `cashposition` carries the cash balance in its `shares` column.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use odss_core::{CashPosition, CoreError, Holding};

/// Reserved ticker marking the cash row.
pub const CASH_TICKER: &str = "cashposition";

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("failed to open portfolio {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("portfolio row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("portfolio row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("portfolio row {row}: {source}")]
    Holding {
        row: usize,
        #[source]
        source: CoreError,
    },
}

#[derive(Debug, Deserialize)]
struct PortfolioRow {
    ticker: String,
    buy: Option<Decimal>,
    sell: Option<Decimal>,
    shares: Decimal,
}

/// Parsed portfolio: holdings in file order plus the cash balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Portfolio {
    pub holdings: Vec<Holding>,
    pub cash: CashPosition,
}

impl Portfolio {
    /// Reads and validates a portfolio CSV file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or any row is invalid.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, PortfolioError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| PortfolioError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let portfolio = Self::from_reader(file)?;

        info!(
            path = %path.display(),
            holdings = portfolio.holdings.len(),
            cash = %portfolio.cash,
            "Portfolio loaded"
        );
        Ok(portfolio)
    }

    /// Parses portfolio CSV from any reader.
    ///
    /// If several cash rows are present the last one wins.
    ///
    /// # Errors
    /// Returns an error on malformed CSV, duplicate tickers, non-whole or negative
    /// share counts, missing prices, or holdings with `buy < sell`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PortfolioError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut holdings = Vec::new();
        let mut seen = HashSet::new();
        let mut cash = CashPosition::ZERO;

        for (index, result) in csv_reader.deserialize::<PortfolioRow>().enumerate() {
            let row = index + 1;
            let record = result.map_err(|source| PortfolioError::Csv { row, source })?;

            if record.ticker.eq_ignore_ascii_case(CASH_TICKER) {
                cash = CashPosition::new(record.shares)
                    .map_err(|source| PortfolioError::Holding { row, source })?;
                debug!(row, cash = %cash, "Cash position row");
                continue;
            }

            let shares =
                whole_shares(record.shares).ok_or_else(|| PortfolioError::InvalidRow {
                    row,
                    reason: format!(
                        "shares must be a non-negative whole number, got {}",
                        record.shares
                    ),
                })?;
            let buy = record.buy.ok_or_else(|| missing(row, "buy"))?;
            let sell = record.sell.ok_or_else(|| missing(row, "sell"))?;

            let holding = Holding::new(&record.ticker, shares, buy, sell)
                .map_err(|source| PortfolioError::Holding { row, source })?;

            if !seen.insert(holding.ticker.clone()) {
                return Err(PortfolioError::InvalidRow {
                    row,
                    reason: format!("duplicate ticker {}", holding.ticker),
                });
            }
            holdings.push(holding);
        }

        Ok(Self { holdings, cash })
    }

    #[must_use]
    pub fn tickers(&self) -> Vec<&str> {
        self.holdings.iter().map(|h| h.ticker.as_str()).collect()
    }
}

fn whole_shares(shares: Decimal) -> Option<u64> {
    if shares < Decimal::ZERO || !shares.fract().is_zero() {
        return None;
    }
    shares.to_u64()
}

fn missing(row: usize, column: &str) -> PortfolioError {
    PortfolioError::InvalidRow {
        row,
        reason: format!("missing {column} price"),
    }
}
