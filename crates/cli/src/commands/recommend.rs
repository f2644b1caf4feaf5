//! Recommend command.
//!
//! Loads the portfolio, fetches option chains, and prints the calls and puts
//! to sell under the selected strategy.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use tracing::info;

use odss_core::{AppConfig, ChainSource, ConfigLoader};
use odss_data::{chain_provider, Portfolio};
use odss_options_manager::{service, Strategy};

use crate::report_formatter::ReportFormatter;

/// Where to read option chains from.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceArg {
    /// Local snapshot files in the data directory
    Demo,
    /// Live quote endpoint
    Live,
}

impl From<SourceArg> for ChainSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Demo => Self::Demo,
            SourceArg::Live => Self::Live,
        }
    }
}

/// Arguments for the recommend command.
#[derive(Args, Debug, Clone)]
pub struct RecommendArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Portfolio CSV (defaults to the configured sample portfolio)
    #[arg(short, long)]
    pub portfolio: Option<String>,

    /// Option chain source. Defaults to the configured source for the sample
    /// portfolio and to live data for any other file.
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    /// Strategy name (see `odss strategies`)
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Annualized strike drift used to build the qualifying band (e.g., 0.20)
    #[arg(long)]
    pub depreciation_rate: Option<Decimal>,

    /// Ignore contracts bidding at or below this price
    #[arg(long)]
    pub min_contract_price: Option<Decimal>,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Runs the recommend command.
///
/// # Errors
/// Returns an error if configuration, the portfolio, or the strategy is invalid.
pub async fn run_recommend(args: RecommendArgs) -> Result<()> {
    let mut config = ConfigLoader::load_from(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;
    let (portfolio_path, source) = resolve_inputs(&args, &mut config);

    let portfolio = Portfolio::from_csv(&portfolio_path)
        .with_context(|| format!("Failed to load portfolio {portfolio_path}"))?;
    let strategy = Strategy::from_config(&config.strategy)?;
    let provider = chain_provider(&config.data, source)?;

    info!(
        portfolio = %portfolio_path,
        %source,
        strategy = strategy.name(),
        "Starting recommendation"
    );

    if !args.json {
        println!("{}", ReportFormatter::format_portfolio(&portfolio));
    }

    let report = service::run(
        provider.as_ref(),
        &strategy,
        &portfolio.holdings,
        portfolio.cash,
        Utc::now(),
    )
    .await;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", ReportFormatter::format(&report, strategy.description()));
    }

    Ok(())
}

/// Applies command-line overrides to `config` and picks the portfolio and chain source.
fn resolve_inputs(args: &RecommendArgs, config: &mut AppConfig) -> (String, ChainSource) {
    if let Some(name) = &args.strategy {
        config.strategy.name.clone_from(name);
    }
    if let Some(rate) = args.depreciation_rate {
        config.strategy.depreciation_rate = rate;
    }
    if let Some(price) = args.min_contract_price {
        config.strategy.min_contract_price = price;
    }

    let portfolio_path = args
        .portfolio
        .clone()
        .unwrap_or_else(|| config.data.portfolio_file.clone());

    let source = match args.source {
        Some(source) => source.into(),
        None if portfolio_path == config.data.portfolio_file => config.data.source,
        None => ChainSource::Live,
    };
    config.data.source = source;

    (portfolio_path, source)
}

/// Lists available strategies.
pub fn run_strategies() {
    println!("Available strategies:");
    for name in Strategy::NAMES {
        match name.parse::<Strategy>() {
            Ok(strategy) => println!("  {:<20} {}", strategy.name(), strategy.description()),
            Err(_) => println!("  {name}"),
        }
    }
}
