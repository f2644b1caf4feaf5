use clap::{Parser, Subcommand};

mod commands;
mod report_formatter;

use commands::RecommendArgs;

#[derive(Parser)]
#[command(name = "odss")]
#[command(about = "Options decision support: which contracts to sell against a portfolio", long_about = None)]
struct Cli {
    /// Optional log file path (logs to file instead of stderr)
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend calls and puts to sell for a portfolio
    Recommend(RecommendArgs),
    /// List available selection strategies
    Strategies,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            // stdout is reserved for the report
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .init();
        }
    }

    match cli.command {
        Commands::Recommend(args) => {
            commands::run_recommend(args).await?;
        }
        Commands::Strategies => {
            commands::run_strategies();
        }
    }

    Ok(())
}
