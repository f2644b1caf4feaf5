//! Capital allocation across cash-secured puts, and call sizing from share counts.
//!
//! Puts are ranked by what each could earn if it alone received all the cash,
//! then funded greedily in that order from a depleting balance. This is a
//! knapsack approximation: no backtracking, no combination search.

use rust_decimal::Decimal;
use tracing::{debug, info};

use odss_core::{affordable_contracts, Candidate, CashPosition, Holding, Recommendation};

/// A put candidate with its greedy priority.
#[derive(Debug, Clone)]
struct RankedPut<'a> {
    candidate: &'a Candidate,
    /// `income_per_dollar` times the contracts affordable with the full balance.
    actual_earnable: Decimal,
}

/// Allocates `cash` across `put_candidates`.
///
/// Returns the funded puts in priority order. Candidates that cannot afford a
/// single contract from what is left are skipped; later, cheaper candidates are
/// still tried. Total committed capital never exceeds `cash`.
#[must_use]
pub fn allocate(put_candidates: &[Candidate], cash: CashPosition) -> Vec<Recommendation> {
    let mut ranked: Vec<RankedPut<'_>> = put_candidates
        .iter()
        .map(|candidate| {
            let max_contracts_if_alone =
                affordable_contracts(cash.amount(), candidate.capital_per_contract());
            RankedPut {
                candidate,
                actual_earnable: candidate
                    .income_per_dollar
                    .saturating_mul(Decimal::from(max_contracts_if_alone)),
            }
        })
        .collect();

    // Stable: equal priorities keep input order
    ranked.sort_by(|a, b| b.actual_earnable.cmp(&a.actual_earnable));

    let mut cash_remaining = cash.amount();
    let mut accepted = Vec::new();

    for put in ranked {
        let capital = put.candidate.capital_per_contract();
        let count = affordable_contracts(cash_remaining, capital);
        if count == 0 {
            debug!(
                ticker = %put.candidate.ticker,
                contract = %put.candidate.name,
                required = %capital,
                remaining = %cash_remaining,
                "Insufficient cash for put"
            );
            continue;
        }

        cash_remaining -= capital.saturating_mul(Decimal::from(count));
        debug!(
            ticker = %put.candidate.ticker,
            contract = %put.candidate.name,
            count,
            earnable = %put.actual_earnable,
            remaining = %cash_remaining,
            "Put funded"
        );
        accepted.push(Recommendation::from_candidate(put.candidate, count));
    }

    info!(
        candidates = put_candidates.len(),
        accepted = accepted.len(),
        cash = %cash,
        uncommitted = %cash_remaining,
        "Put allocation complete"
    );

    accepted
}

/// Sizes a covered call to the shares held: one contract per 100 shares.
///
/// A holding under 100 shares still yields a recommendation, with zero contracts.
#[must_use]
pub fn size_call(holding: &Holding, call: &Candidate) -> Recommendation {
    Recommendation::from_candidate(call, holding.coverable_contracts())
}
