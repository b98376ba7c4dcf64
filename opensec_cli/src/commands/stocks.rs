use anyhow::Result;
use clap::Args;
use opensec_api::edgar::EdgarClient;
use opensec_api::nasdaq::ListingClient;

use crate::output;

#[derive(Args)]
pub struct StocksArgs {
    /// Only fetch results for the provided stock symbol
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Fetch a list of publicly traded stock symbols
    #[arg(short, long)]
    pub list: bool,

    /// Collapse the returned info onto a single level
    #[arg(short, long)]
    pub collapse: bool,

    /// POST the acquired data to this endpoint
    #[arg(short, long)]
    pub post: Option<String>,
}

pub async fn run(args: &StocksArgs) -> Result<()> {
    if let Some(symbol) = &args.symbol {
        let client = EdgarClient::new()?;
        let company = client.get_company(symbol).await?;
        let value = if args.collapse {
            serde_json::to_value(company.collapse())?
        } else {
            serde_json::to_value(&company)?
        };
        return output::emit(args.post.as_deref(), &value).await;
    }

    if args.list {
        let client = ListingClient::new()?;
        let companies = client.list_symbols().await?;
        output::print_json(&companies)?;
    }

    Ok(())
}
