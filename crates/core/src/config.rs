use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub data: DataConfig,
}

/// Selection policy and its tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Strategy name, e.g. `naive_best_daily`.
    pub name: String,
    /// Annualized drift applied to strikes when building the qualifying band.
    pub depreciation_rate: Decimal,
    /// Contracts must bid strictly above this to be considered.
    pub min_contract_price: Decimal,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            name: "naive_best_daily".to_string(),
            depreciation_rate: Decimal::new(20, 2),
            min_contract_price: Decimal::ZERO,
        }
    }
}

/// Where option chains come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainSource {
    /// Local CSV snapshots under `data_dir`.
    #[default]
    Demo,
    /// Remote quote endpoint at `live_base_url`.
    Live,
}

impl std::fmt::Display for ChainSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Demo => write!(f, "demo"),
            Self::Live => write!(f, "live"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub data_dir: String,
    pub portfolio_file: String,
    pub source: ChainSource,
    /// Chains older than this are refetched on the next request.
    pub cache_ttl_secs: u64,
    pub live_base_url: String,
    pub request_timeout_secs: u64,
    /// Request budget for the live endpoint.
    pub requests_per_minute: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            portfolio_file: "./data/sample_portfolio.csv".to_string(),
            source: ChainSource::Demo,
            cache_ttl_secs: 600,
            live_base_url: "https://query2.finance.yahoo.com".to_string(),
            request_timeout_secs: 15,
            requests_per_minute: 60,
        }
    }
}
