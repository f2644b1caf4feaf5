use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ChainError;
use crate::types::OptionContract;

/// Source of option-chain snapshots for a single underlying.
#[async_trait]
pub trait OptionChainProvider: Send + Sync {
    /// Returns every contract currently listed for `ticker`.
    async fn fetch(&self, ticker: &str) -> Result<Vec<OptionContract>, ChainError>;

    /// Returns the chain for `ticker` as seen at `now`.
    ///
    /// Stateless providers ignore the clock; caching providers use it to decide
    /// whether a stored chain is still fresh.
    async fn fetch_as_of(
        &self,
        ticker: &str,
        _now: DateTime<Utc>,
    ) -> Result<Vec<OptionContract>, ChainError> {
        self.fetch(ticker).await
    }

    fn name(&self) -> &str;
}

#[async_trait]
impl<P: OptionChainProvider + ?Sized> OptionChainProvider for std::sync::Arc<P> {
    async fn fetch(&self, ticker: &str) -> Result<Vec<OptionContract>, ChainError> {
        (**self).fetch(ticker).await
    }

    async fn fetch_as_of(
        &self,
        ticker: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<OptionContract>, ChainError> {
        (**self).fetch_as_of(ticker, now).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
