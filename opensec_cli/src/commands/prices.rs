use anyhow::{Context, Result};
use clap::Args;
use opensec_api::quandl::PriceClient;

use crate::config::Config;
use crate::output;

#[derive(Args)]
pub struct PricesArgs {
    /// Only fetch results for the provided stock symbol
    #[arg(short, long)]
    pub symbol: String,

    /// Fetch all the historic prices
    #[arg(short = 'i', long)]
    pub historic: bool,

    /// Return only today's prices (the default mode)
    #[arg(short, long, default_value_t = true)]
    pub today: bool,

    /// POST the acquired data to this endpoint
    #[arg(short, long)]
    pub post: Option<String>,

    /// Retrieve prices after, but not including, the provided date
    #[arg(short, long)]
    pub from_date: Option<String>,
}

pub async fn run(args: &PricesArgs) -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let client = PriceClient::new(config.quandl_api_key)?;

    // Mode precedence: historic, then from-date, then today.
    let result: Option<serde_json::Value> = if args.historic {
        client
            .get_historic(&args.symbol)
            .await?
            .map(serde_json::to_value)
            .transpose()?
    } else if let Some(from_date) = &args.from_date {
        client
            .get_from_date(&args.symbol, from_date)
            .await?
            .map(serde_json::to_value)
            .transpose()?
    } else {
        client
            .get_today(&args.symbol)
            .await?
            .map(serde_json::to_value)
            .transpose()?
    };

    match result {
        Some(value) => output::emit(args.post.as_deref(), &value).await,
        None => {
            tracing::info!("no results available");
            Ok(())
        }
    }
}
