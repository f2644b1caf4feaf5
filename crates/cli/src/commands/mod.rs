//! CLI commands for the options income advisor.

pub mod recommend;

pub use recommend::{run_recommend, run_strategies, RecommendArgs};
