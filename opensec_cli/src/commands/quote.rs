use anyhow::Result;
use clap::Args;
use opensec_api::markit::QuoteClient;

use crate::output;

#[derive(Args)]
pub struct QuoteArgs {
    /// Fetch the quote for the provided stock symbol
    #[arg(short, long)]
    pub symbol: String,
}

pub async fn run(args: &QuoteArgs) -> Result<()> {
    let client = QuoteClient::new()?;
    let quote = client.get_quote(&args.symbol).await?;
    output::print_json(&quote)?;
    Ok(())
}
