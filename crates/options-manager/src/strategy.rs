//! Selection strategies. Callers hold a `Strategy` and never branch on its name.

use odss_core::{CoreError, Holding, OptionContract, StrategyConfig};

use crate::optimizer::{self, NaiveBestDailyParams, Selection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Highest daily premium per call, highest daily premium per dollar per put.
    NaiveBestDaily(NaiveBestDailyParams),
}

impl Strategy {
    /// Names accepted by [`Strategy::from_config`] and `FromStr`.
    pub const NAMES: &'static [&'static str] = &["naive_best_daily"];

    /// Builds the strategy named in `config` with its tuning parameters.
    ///
    /// # Errors
    /// Returns an error if the strategy name is unknown.
    pub fn from_config(config: &StrategyConfig) -> Result<Self, CoreError> {
        match config.name.trim().to_ascii_lowercase().as_str() {
            "naive_best_daily" => Ok(Self::NaiveBestDaily(NaiveBestDailyParams {
                depreciation_rate: config.depreciation_rate,
                min_contract_price: config.min_contract_price,
            })),
            other => Err(CoreError::UnknownStrategy(other.to_string())),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NaiveBestDaily(_) => "naive_best_daily",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::NaiveBestDaily(_) => "naive best daily income",
        }
    }

    /// Picks the best call and put for one holding as of `now` (epoch seconds).
    #[must_use]
    pub fn select(&self, contracts: &[OptionContract], holding: &Holding, now: i64) -> Selection {
        match self {
            Self::NaiveBestDaily(params) => optimizer::select_best(contracts, holding, now, params),
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::NaiveBestDaily(NaiveBestDailyParams::default())
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Strategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_config(&StrategyConfig {
            name: s.to_string(),
            ..StrategyConfig::default()
        })
    }
}
