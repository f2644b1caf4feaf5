//! Builds the configured chain provider.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use odss_core::{ChainSource, DataConfig, OptionChainProvider};

use crate::cache::CachedChainProvider;
use crate::demo_chain::DemoChainProvider;
use crate::live_chain::LiveChainProvider;

/// Returns a TTL-cached provider for `source`.
///
/// # Errors
/// Returns an error if the live HTTP client cannot be built.
pub fn chain_provider(
    config: &DataConfig,
    source: ChainSource,
) -> Result<Arc<dyn OptionChainProvider>> {
    let ttl = Duration::from_secs(config.cache_ttl_secs);
    info!(%source, ttl_secs = config.cache_ttl_secs, "Using option chain source");

    let provider: Arc<dyn OptionChainProvider> = match source {
        ChainSource::Demo => Arc::new(CachedChainProvider::new(
            DemoChainProvider::new(&config.data_dir),
            ttl,
        )),
        ChainSource::Live => {
            let live = LiveChainProvider::new(
                config.live_base_url.clone(),
                Duration::from_secs(config.request_timeout_secs),
            )?
            .with_rate_limit(config.requests_per_minute);
            Arc::new(CachedChainProvider::new(live, ttl))
        }
    };

    Ok(provider)
}
