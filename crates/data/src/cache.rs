//! Time-to-live cache in front of any chain provider.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use odss_core::{ChainError, OptionChainProvider, OptionContract};

#[derive(Debug, Clone)]
struct CachedChain {
    fetched_at: DateTime<Utc>,
    contracts: Vec<OptionContract>,
}

/// Serves a ticker's chain from memory until it is `ttl` old, then refetches.
///
/// Failed fetches are never cached.
pub struct CachedChainProvider<P> {
    inner: P,
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedChain>>,
}

impl<P: OptionChainProvider> CachedChainProvider<P> {
    #[must_use]
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn is_fresh(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        // A clock that moved backwards counts as fresh
        (now - fetched_at).to_std().map_or(true, |age| age < self.ttl)
    }
}

#[async_trait]
impl<P: OptionChainProvider> OptionChainProvider for CachedChainProvider<P> {
    async fn fetch(&self, ticker: &str) -> Result<Vec<OptionContract>, ChainError> {
        self.fetch_as_of(ticker, Utc::now()).await
    }

    /// Returns the chain for `ticker`, refetching if the cached copy is stale at `now`.
    ///
    /// A miss propagates the inner provider's error.
    async fn fetch_as_of(
        &self,
        ticker: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<OptionContract>, ChainError> {
        let key = ticker.trim().to_uppercase();

        {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(&key) {
                if self.is_fresh(entry.fetched_at, now) {
                    debug!(ticker = %key, fetched_at = %entry.fetched_at, "Chain cache hit");
                    return Ok(entry.contracts.clone());
                }
            }
        }

        let contracts = self.inner.fetch_as_of(&key, now).await?;
        self.entries.lock().await.insert(
            key,
            CachedChain {
                fetched_at: now,
                contracts: contracts.clone(),
            },
        );
        Ok(contracts)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
