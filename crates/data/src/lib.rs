//! Inputs for the recommendation engine.
//!
//! This crate provides:
//! - Portfolio CSV ingestion and validation
//! - Option-chain providers: local demo snapshots and a live JSON endpoint
//! - A time-to-live cache in front of either provider

pub mod cache;
pub mod demo_chain;
pub mod live_chain;
pub mod portfolio;
pub mod provider;

pub use cache::CachedChainProvider;
pub use demo_chain::DemoChainProvider;
pub use live_chain::LiveChainProvider;
pub use portfolio::{Portfolio, PortfolioError, CASH_TICKER};
pub use provider::chain_provider;
