//! Per-security contract selection for the "naive best daily income" policy.
//!
//! For one holding and its option chain, picks at most one call to write
//! against the shares already owned and at most one cash-secured put.
//! Calls are ranked by absolute daily income; puts by daily income per dollar
//! of capital at risk, since puts compete for the same cash pool.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use odss_core::{
    Candidate, Holding, OptionContract, OptionType, SECONDS_PER_DAY, SHARES_PER_CONTRACT,
};

const DAYS_PER_YEAR: i64 = 365;

/// Tuning knobs for the naive best daily policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaiveBestDailyParams {
    /// Annualized drift applied to strikes (e.g., 0.20 = 20% per year).
    pub depreciation_rate: Decimal,
    /// Contracts must bid strictly above this.
    pub min_contract_price: Decimal,
}

impl Default for NaiveBestDailyParams {
    fn default() -> Self {
        Self {
            depreciation_rate: Decimal::new(20, 2),
            min_contract_price: Decimal::ZERO,
        }
    }
}

/// Best call and best put for one security. Either side may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub call: Option<Candidate>,
    pub put: Option<Candidate>,
}

impl Selection {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.call.is_none() && self.put.is_none()
    }
}

/// Figures derived for one contract at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractMetrics {
    pub days_from_now: Decimal,
    pub income_per_day: Decimal,
    pub income_per_dollar: Decimal,
    /// Strike after a full life of adverse drift; calls must clear `sell_min` with it.
    pub depreciated_strike: Decimal,
    /// Strike after a full life of favorable drift; puts must stay under `buy_max` with it.
    pub appreciated_strike: Decimal,
}

impl ContractMetrics {
    /// Evaluates `contract` as of `now` (epoch seconds).
    ///
    /// Contracts expiring within a day are treated as one day out. Returns `None`
    /// for a non-positive strike, which cannot be normalized per dollar, and for
    /// prices too large to evaluate without overflow.
    #[must_use]
    pub fn evaluate(
        contract: &OptionContract,
        now: i64,
        depreciation_rate: Decimal,
    ) -> Option<Self> {
        if contract.strike <= Decimal::ZERO {
            return None;
        }

        let time_from_now = contract.expiration.saturating_sub(now).max(SECONDS_PER_DAY);
        let days_from_now =
            Decimal::from(time_from_now) / Decimal::from(SECONDS_PER_DAY) + Decimal::ONE;
        let shares = Decimal::from(SHARES_PER_CONTRACT);

        let capital = contract.strike.checked_mul(shares)?;
        let income_per_day = contract.bid.checked_mul(shares)?.checked_div(days_from_now)?;
        let income_per_dollar = income_per_day.checked_div(capital)?;

        let drift = (days_from_now / Decimal::from(DAYS_PER_YEAR)).checked_mul(depreciation_rate)?;
        let shift = contract.strike.checked_mul(drift)?;
        let depreciated_strike = contract.strike.checked_sub(shift)?;
        let appreciated_strike = contract.strike.checked_add(shift)?;

        Some(Self {
            days_from_now,
            income_per_day,
            income_per_dollar,
            depreciated_strike,
            appreciated_strike,
        })
    }
}

/// Selects the best call and put for `holding` from `contracts`.
///
/// Ties keep the contract that appears first in `contracts`. An empty chain
/// yields an empty selection.
#[must_use]
pub fn select_best(
    contracts: &[OptionContract],
    holding: &Holding,
    now: i64,
    params: &NaiveBestDailyParams,
) -> Selection {
    if contracts.is_empty() {
        debug!(ticker = %holding.ticker, "No option data");
        return Selection::default();
    }

    let mut best_call: Option<(&OptionContract, ContractMetrics)> = None;
    let mut best_put: Option<(&OptionContract, ContractMetrics)> = None;

    for contract in contracts
        .iter()
        .filter(|c| c.bid > params.min_contract_price)
    {
        let Some(metrics) = ContractMetrics::evaluate(contract, now, params.depreciation_rate)
        else {
            continue;
        };

        match contract.option_type {
            OptionType::Call => {
                if metrics.depreciated_strike < holding.sell_min {
                    continue;
                }
                let better = best_call
                    .as_ref()
                    .map_or(true, |(_, best)| metrics.income_per_day > best.income_per_day);
                if better {
                    best_call = Some((contract, metrics));
                }
            }
            OptionType::Put => {
                if metrics.appreciated_strike > holding.buy_max {
                    continue;
                }
                let better = best_put
                    .as_ref()
                    .map_or(true, |(_, best)| metrics.income_per_dollar > best.income_per_dollar);
                if better {
                    best_put = Some((contract, metrics));
                }
            }
        }
    }

    let selection = Selection {
        call: best_call.map(|(c, m)| to_candidate(c, &m)),
        put: best_put.map(|(c, m)| to_candidate(c, &m)),
    };

    debug!(
        ticker = %holding.ticker,
        contracts = contracts.len(),
        call = selection.call.as_ref().map(|c| c.name.as_str()),
        put = selection.put.as_ref().map(|c| c.name.as_str()),
        "Selected contracts"
    );

    selection
}

fn to_candidate(contract: &OptionContract, metrics: &ContractMetrics) -> Candidate {
    Candidate {
        name: contract.contract_name.clone(),
        ticker: contract.ticker.clone(),
        option_type: contract.option_type,
        strike: contract.strike,
        bid: contract.bid,
        ask: contract.ask,
        income_per_day: metrics.income_per_day,
        income_per_dollar: metrics.income_per_dollar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const NOW: i64 = 1_800_000_000;

    fn contract(
        name: &str,
        kind: OptionType,
        strike: Decimal,
        bid: Decimal,
        days: i64,
    ) -> OptionContract {
        OptionContract {
            contract_name: name.to_string(),
            expiration: NOW + days * SECONDS_PER_DAY,
            ticker: "MSFT".to_string(),
            option_type: kind,
            strike,
            bid,
            ask: bid + dec!(0.10),
        }
    }

    fn holding(buy_max: Decimal, sell_min: Decimal, shares: u64) -> Holding {
        Holding::new("MSFT", shares, buy_max, sell_min).unwrap()
    }

    #[test]
    fn metrics_follow_days_out() {
        // 72 days out -> 73 days counted
        let c = contract("C1", OptionType::Call, dec!(100), dec!(7.30), 72);
        let m = ContractMetrics::evaluate(&c, NOW, dec!(0.20)).unwrap();
        assert_eq!(m.days_from_now, dec!(73));
        assert_eq!(m.income_per_day, dec!(10));
        assert_eq!(m.income_per_dollar, dec!(0.001));
        assert_eq!(m.depreciated_strike, dec!(96));
        assert_eq!(m.appreciated_strike, dec!(104));
    }

    #[test]
    fn near_expiry_is_floored_to_one_day() {
        let mut c = contract("C1", OptionType::Call, dec!(100), dec!(1), 0);
        c.expiration = NOW + 60;
        let m = ContractMetrics::evaluate(&c, NOW, dec!(0.20)).unwrap();
        assert_eq!(m.days_from_now, dec!(2));
        assert_eq!(m.income_per_day, dec!(50));

        c.expiration = NOW - 10 * SECONDS_PER_DAY;
        let expired = ContractMetrics::evaluate(&c, NOW, dec!(0.20)).unwrap();
        assert_eq!(expired.days_from_now, dec!(2));
    }

    #[test]
    fn non_positive_strike_is_skipped() {
        let c = contract("C0", OptionType::Call, dec!(0), dec!(1), 10);
        assert!(ContractMetrics::evaluate(&c, NOW, dec!(0.20)).is_none());
    }

    #[test]
    fn overflowing_prices_are_skipped() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let huge_strike = contract("HUGE", OptionType::Put, huge, dec!(1), 10);
        assert!(ContractMetrics::evaluate(&huge_strike, NOW, dec!(0.20)).is_none());

        let huge_bid = contract("RICH", OptionType::Call, dec!(100), huge, 10);
        assert!(ContractMetrics::evaluate(&huge_bid, NOW, dec!(0.20)).is_none());

        let contracts = vec![
            contract("P50", OptionType::Put, dec!(50), dec!(7.30), 72),
            huge_strike,
            huge_bid,
        ];
        let unbounded = Holding::new("MSFT", 300, Decimal::MAX, dec!(0)).unwrap();
        let selection = select_best(&contracts, &unbounded, NOW, &NaiveBestDailyParams::default());
        assert_eq!(selection.put.unwrap().name, "P50");
        assert!(selection.call.is_none());
    }

    #[test]
    fn empty_chain_selects_nothing() {
        let selection = select_best(
            &[],
            &holding_with(500, 0),
            NOW,
            &NaiveBestDailyParams::default(),
        );
        assert!(selection.is_empty());
    }

    fn holding_with(buy_max: i64, sell_min: i64) -> Holding {
        holding(Decimal::from(buy_max), Decimal::from(sell_min), 300)
    }

    #[test]
    fn picks_highest_daily_income_call_above_floor() {
        let contracts = vec![
            // depreciated 96 -> qualifies, 10/day
            contract("LOW", OptionType::Call, dec!(100), dec!(7.30), 72),
            // depreciated 86.4 -> below floor 90 despite the richest bid
            contract("RICH", OptionType::Call, dec!(90), dec!(20.00), 72),
            // depreciated 105.6 -> qualifies, 20/day
            contract("BEST", OptionType::Call, dec!(110), dec!(14.60), 72),
        ];
        let selection = select_best(
            &contracts,
            &holding_with(500, 90),
            NOW,
            &NaiveBestDailyParams::default(),
        );
        let call = selection.call.unwrap();
        assert_eq!(call.name, "BEST");
        assert_eq!(call.income_per_day, dec!(20));
        assert!(selection.put.is_none());
    }

    #[test]
    fn picks_highest_income_per_dollar_put_below_ceiling() {
        let contracts = vec![
            // appreciated 52 -> qualifies; 10/day on 5000 = 0.002
            contract("P50", OptionType::Put, dec!(50), dec!(7.30), 72),
            // appreciated 31.2 -> qualifies; 9/day on 3000 = 0.003
            contract("P30", OptionType::Put, dec!(30), dec!(6.57), 72),
            // appreciated 62.4 -> above ceiling 55
            contract("P60", OptionType::Put, dec!(60), dec!(30.00), 72),
        ];
        let selection = select_best(
            &contracts,
            &holding_with(55, 10),
            NOW,
            &NaiveBestDailyParams::default(),
        );
        let put = selection.put.unwrap();
        assert_eq!(put.name, "P30");
        assert_eq!(put.income_per_dollar, dec!(0.003));
        assert!(selection.call.is_none());
    }

    #[test]
    fn ties_keep_first_enumerated() {
        let contracts = vec![
            contract("FIRST", OptionType::Call, dec!(100), dec!(7.30), 72),
            contract("SECOND", OptionType::Call, dec!(100), dec!(7.30), 72),
            contract("PFIRST", OptionType::Put, dec!(50), dec!(1.00), 72),
            contract("PSECOND", OptionType::Put, dec!(50), dec!(1.00), 72),
        ];
        let selection = select_best(
            &contracts,
            &holding_with(100, 50),
            NOW,
            &NaiveBestDailyParams::default(),
        );
        assert_eq!(selection.call.unwrap().name, "FIRST");
        assert_eq!(selection.put.unwrap().name, "PFIRST");
    }

    #[test]
    fn bid_must_exceed_min_contract_price() {
        let contracts = vec![
            contract("ZERO", OptionType::Call, dec!(100), dec!(0), 30),
            contract("CHEAP", OptionType::Call, dec!(100), dec!(0.20), 30),
        ];
        let params = NaiveBestDailyParams {
            min_contract_price: dec!(0.20),
            ..NaiveBestDailyParams::default()
        };
        let selection = select_best(&contracts, &holding_with(500, 0), NOW, &params);
        assert!(selection.call.is_none());

        let selection = select_best(
            &contracts,
            &holding_with(500, 0),
            NOW,
            &NaiveBestDailyParams::default(),
        );
        assert_eq!(selection.call.unwrap().name, "CHEAP");
    }

    #[test]
    fn no_qualifying_contract_leaves_side_empty() {
        let contracts = vec![
            contract("C", OptionType::Call, dec!(50), dec!(2), 30),
            contract("P", OptionType::Put, dec!(200), dec!(2), 30),
        ];
        let selection = select_best(
            &contracts,
            &holding_with(150, 100),
            NOW,
            &NaiveBestDailyParams::default(),
        );
        assert!(selection.is_empty());
    }

    #[test]
    fn selections_respect_strike_band() {
        let params = NaiveBestDailyParams::default();
        let mut contracts = Vec::new();
        for (i, strike) in [40, 45, 50, 55, 60, 65, 70].into_iter().enumerate() {
            let days = 10 + 40 * i as i64;
            let bid = Decimal::from(strike) / dec!(20) + Decimal::from(i as i64);
            let strike = Decimal::from(strike);
            contracts.push(contract(&format!("C{i}"), OptionType::Call, strike, bid, days));
            contracts.push(contract(&format!("P{i}"), OptionType::Put, strike, bid, days));
        }
        let h = holding_with(58, 52);

        let selection = select_best(&contracts, &h, NOW, &params);

        let qualifying_calls: Vec<_> = contracts
            .iter()
            .filter(|c| c.option_type == OptionType::Call)
            .filter_map(|c| ContractMetrics::evaluate(c, NOW, params.depreciation_rate))
            .filter(|m| m.depreciated_strike >= h.sell_min)
            .collect();
        let qualifying_puts: Vec<_> = contracts
            .iter()
            .filter(|c| c.option_type == OptionType::Put)
            .filter_map(|c| ContractMetrics::evaluate(c, NOW, params.depreciation_rate))
            .filter(|m| m.appreciated_strike <= h.buy_max)
            .collect();

        let call = selection.call.unwrap();
        let put = selection.put.unwrap();
        let best_call = qualifying_calls.iter().map(|m| m.income_per_day).max().unwrap();
        let best_put = qualifying_puts.iter().map(|m| m.income_per_dollar).max().unwrap();
        assert_eq!(call.income_per_day, best_call);
        assert_eq!(put.income_per_dollar, best_put);

        let chosen_call = contracts.iter().find(|c| c.contract_name == call.name).unwrap();
        let chosen_put = contracts.iter().find(|c| c.contract_name == put.name).unwrap();
        let rate = params.depreciation_rate;
        let call_metrics = ContractMetrics::evaluate(chosen_call, NOW, rate).unwrap();
        let put_metrics = ContractMetrics::evaluate(chosen_put, NOW, rate).unwrap();
        assert!(call_metrics.depreciated_strike >= h.sell_min);
        assert!(put_metrics.appreciated_strike <= h.buy_max);
    }
}
