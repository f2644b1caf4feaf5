//! Typed errors for domain validation and option-chain retrieval.

use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures when building domain records.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Holding row failed validation.
    #[error("invalid holding {ticker}: {reason}")]
    InvalidHolding {
        /// Ticker of the rejected holding.
        ticker: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Cash balance below zero.
    #[error("cash position cannot be negative: {0}")]
    NegativeCash(Decimal),

    /// Unrecognized contract type string.
    #[error("unknown option type: {0}")]
    UnknownOptionType(String),

    /// Unrecognized strategy name.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

/// Errors raised by an option-chain provider.
///
/// The optimizer never sees these: the pipeline logs them and treats the
/// security as having no contracts.
#[derive(Debug, Error)]
pub enum ChainError {
    /// No chain is available for the ticker.
    #[error("no option chain for {ticker}")]
    NotFound {
        /// Requested ticker.
        ticker: String,
    },

    /// Reading a local chain file failed.
    #[error("failed to read option chain for {ticker}: {source}")]
    Io {
        /// Requested ticker.
        ticker: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A row or payload could not be interpreted.
    #[error("malformed option chain for {ticker}: {reason}")]
    Malformed {
        /// Requested ticker.
        ticker: String,
        /// Parser message.
        reason: String,
    },

    /// Remote request failed.
    #[error("request for {ticker} failed: {message}")]
    Network {
        /// Requested ticker.
        ticker: String,
        /// Transport or status message.
        message: String,
    },
}
