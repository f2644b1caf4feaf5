pub mod config;
pub mod config_loader;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{AppConfig, ChainSource, DataConfig, StrategyConfig};
pub use config_loader::ConfigLoader;
pub use error::{ChainError, CoreError};
pub use traits::OptionChainProvider;
pub use types::{
    affordable_contracts, Candidate, CashPosition, Holding, OptionContract, OptionType,
    Recommendation, SECONDS_PER_DAY, SHARES_PER_CONTRACT,
};
