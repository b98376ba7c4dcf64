mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "opensec")]
#[command(about = "Fetch and normalize market data from public sources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch end-of-day prices: today's, the full history, or from a date
    Prices(commands::prices::PricesArgs),
    /// Fetch the current quote for a symbol
    Quote(commands::quote::QuoteArgs),
    /// Look up company data by symbol, or list traded symbols
    Stocks(commands::stocks::StocksArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("opensec=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Prices(args) => commands::prices::run(args).await?,
        Commands::Quote(args) => commands::quote::run(args).await?,
        Commands::Stocks(args) => commands::stocks::run(args).await?,
    }

    Ok(())
}
