//! Domain records shared by the optimizer, the allocator, and the data providers.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Shares of the underlying covered by one standard US equity option contract.
pub const SHARES_PER_CONTRACT: u64 = 100;

/// Seconds in one calendar day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Option contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

impl std::str::FromStr for OptionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(Self::Call),
            "put" | "p" => Ok(Self::Put),
            other => Err(CoreError::UnknownOptionType(other.to_string())),
        }
    }
}

/// One tradable contract as supplied by an option-chain provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionContract {
    pub contract_name: String,
    /// Expiration as Unix epoch seconds.
    pub expiration: i64,
    pub ticker: String,
    pub option_type: OptionType,
    pub strike: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
}

/// A held security together with the prices the holder accepts on assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    pub shares: u64,
    /// Highest price the holder will pay if a sold put is exercised.
    pub buy_max: Decimal,
    /// Lowest price the holder will accept if a sold call is exercised.
    pub sell_min: Decimal,
}

impl Holding {
    /// Creates a validated holding. The ticker is upper-cased.
    ///
    /// # Errors
    /// Returns an error if a price is negative or `buy_max < sell_min`.
    pub fn new(
        ticker: &str,
        shares: u64,
        buy_max: Decimal,
        sell_min: Decimal,
    ) -> Result<Self, CoreError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(CoreError::InvalidHolding {
                ticker,
                reason: "empty ticker".to_string(),
            });
        }
        if buy_max < Decimal::ZERO || sell_min < Decimal::ZERO {
            return Err(CoreError::InvalidHolding {
                ticker,
                reason: "prices must be non-negative".to_string(),
            });
        }
        if buy_max < sell_min {
            return Err(CoreError::InvalidHolding {
                ticker,
                reason: format!("buy_max {buy_max} is below sell_min {sell_min}"),
            });
        }

        Ok(Self {
            ticker,
            shares,
            buy_max,
            sell_min,
        })
    }

    /// Number of calls the held shares can cover.
    #[must_use]
    pub const fn coverable_contracts(&self) -> u64 {
        self.shares / SHARES_PER_CONTRACT
    }
}

/// Uncommitted cash available to secure sold puts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CashPosition(Decimal);

impl CashPosition {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// # Errors
    /// Returns an error if `amount` is negative.
    pub fn new(amount: Decimal) -> Result<Self, CoreError> {
        if amount < Decimal::ZERO {
            return Err(CoreError::NegativeCash(amount));
        }
        Ok(Self(amount))
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for CashPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// The contract a strategy picked for one side of one security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub ticker: String,
    pub option_type: OptionType,
    pub strike: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    /// Premium per contract per day held.
    pub income_per_day: Decimal,
    /// `income_per_day` per dollar of capital at risk.
    pub income_per_dollar: Decimal,
}

impl Candidate {
    /// Capital committed by one contract if assigned (`strike * 100`), saturating.
    #[must_use]
    pub fn capital_per_contract(&self) -> Decimal {
        self.strike.saturating_mul(Decimal::from(SHARES_PER_CONTRACT))
    }
}

/// Final output row: a contract to sell and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub ticker: String,
    pub option_type: OptionType,
    pub strike: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    /// Expected daily income of the whole position (rate times `contract_count`).
    pub income_per_day: Decimal,
    pub contract_count: u64,
}

impl Recommendation {
    #[must_use]
    pub fn from_candidate(candidate: &Candidate, contract_count: u64) -> Self {
        Self {
            name: candidate.name.clone(),
            ticker: candidate.ticker.clone(),
            option_type: candidate.option_type,
            strike: candidate.strike,
            bid: candidate.bid,
            ask: candidate.ask,
            income_per_day: candidate
                .income_per_day
                .saturating_mul(Decimal::from(contract_count)),
            contract_count,
        }
    }

    /// Capital set aside if every contract in the position is assigned.
    #[must_use]
    pub fn committed_capital(&self) -> Decimal {
        self.strike
            .saturating_mul(Decimal::from(SHARES_PER_CONTRACT))
            .saturating_mul(Decimal::from(self.contract_count))
    }
}

/// Whole contracts affordable with `cash` at `capital_per_contract` each.
///
/// Returns zero when either amount is not positive. Counts beyond `u64::MAX`
/// saturate.
#[must_use]
pub fn affordable_contracts(cash: Decimal, capital_per_contract: Decimal) -> u64 {
    if capital_per_contract <= Decimal::ZERO || cash <= Decimal::ZERO {
        return 0;
    }
    cash.checked_div(capital_per_contract)
        .and_then(|quotient| quotient.floor().to_u64())
        .unwrap_or(u64::MAX)
}
