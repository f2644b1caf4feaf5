//! Option-selling recommendations for an existing portfolio.
//!
//! - Selects the best call and put per security under a pluggable strategy
//! - Sizes calls from shares held
//! - Allocates limited cash across competing cash-secured puts
//! - Merges both into an ordered recommendation report
//!
//! Everything past chain retrieval is a pure function of its inputs.

pub mod allocation;
pub mod optimizer;
pub mod report;
pub mod service;
pub mod strategy;

pub use optimizer::{select_best, ContractMetrics, NaiveBestDailyParams, Selection};
pub use report::RecommendationReport;
pub use strategy::Strategy;
