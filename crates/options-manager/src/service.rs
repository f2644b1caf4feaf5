//! One recommendation run: fetch chains, select per security, allocate cash.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use odss_core::{CashPosition, Holding, OptionChainProvider, OptionContract};

use crate::report::RecommendationReport;
use crate::strategy::Strategy;

/// Run a full recommendation pass for `holdings` as of `now`.
///
/// Chains are fetched concurrently. A provider failure for one ticker is
/// logged and treated as an empty chain, so that security contributes nothing.
pub async fn run<P>(
    provider: &P,
    strategy: &Strategy,
    holdings: &[Holding],
    cash: CashPosition,
    now: DateTime<Utc>,
) -> RecommendationReport
where
    P: OptionChainProvider + ?Sized,
{
    info!(
        provider = provider.name(),
        strategy = strategy.name(),
        holdings = holdings.len(),
        cash = %cash,
        "Recommendation run started"
    );

    let chains = fetch_chains(provider, holdings, now).await;
    let report = evaluate(strategy, &chains, cash, now);

    info!(
        recommendations = report.recommendations.len(),
        income_per_day = %report.total_income_per_day(),
        committed_cash = %report.committed_cash(),
        "Recommendation run complete"
    );

    report
}

/// Fetch every holding's chain as of `now`, pairing each holding with its contracts.
pub async fn fetch_chains<P>(
    provider: &P,
    holdings: &[Holding],
    now: DateTime<Utc>,
) -> Vec<(Holding, Vec<OptionContract>)>
where
    P: OptionChainProvider + ?Sized,
{
    let fetches = holdings.iter().map(|holding| async move {
        let contracts = match provider.fetch_as_of(&holding.ticker, now).await {
            Ok(contracts) => contracts,
            Err(e) => {
                warn!(ticker = %holding.ticker, error = %e, "Option chain unavailable");
                Vec::new()
            }
        };
        (holding.clone(), contracts)
    });

    join_all(fetches).await
}

/// Pure evaluation over already-fetched chains.
#[must_use]
pub fn evaluate(
    strategy: &Strategy,
    chains: &[(Holding, Vec<OptionContract>)],
    cash: CashPosition,
    now: DateTime<Utc>,
) -> RecommendationReport {
    let epoch = now.timestamp();
    let selections: Vec<_> = chains
        .iter()
        .map(|(holding, contracts)| {
            if contracts.is_empty() {
                debug!(ticker = %holding.ticker, "No option data; skipping");
            }
            (holding.clone(), strategy.select(contracts, holding, epoch))
        })
        .collect();

    RecommendationReport::assemble(strategy.name(), now, cash, &selections)
}
