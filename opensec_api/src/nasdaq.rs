//! Exchange listing download: symbol/name pairs for the two US exchanges,
//! pulled from the screener's CSV export.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SCREENER_PATH: &str = "/screening/companies-by-name.aspx";

const EXCHANGES: [&str; 2] = ["nasdaq", "nyse"];

/// Errors from the listing download.
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// One listed company: symbol and name only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListedCompany {
    pub symbol: String,
    pub name: String,
}

/// Client for the exchange listing page.
pub struct ListingClient {
    http: reqwest::Client,
    base_url: String,
}

impl ListingClient {
    /// Creates a client pointing at the production listing host.
    pub fn new() -> Result<Self, ListingError> {
        Self::with_base_url("http://www.nasdaq.com")
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, ListingError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Downloads the listing CSV for both exchanges sequentially and returns
    /// the combined symbol/name pairs in download order.
    pub async fn list_symbols(&self) -> Result<Vec<ListedCompany>, ListingError> {
        let url = format!("{}{}", self.base_url, SCREENER_PATH);
        let mut companies = Vec::new();
        for exchange in EXCHANGES {
            let resp = self
                .http
                .get(&url)
                .query(&[("letter", "0"), ("exchange", exchange), ("render", "download")])
                .send()
                .await?;
            let status = resp.status();
            let body = resp.text().await?;
            if !status.is_success() {
                tracing::error!("listing download for {exchange} returned status {status}");
                return Err(ListingError::HttpStatus {
                    status: status.as_u16(),
                    body,
                });
            }
            companies.extend(parse_listing(&body)?);
        }
        Ok(companies)
    }
}

/// Parses the screener CSV, keeping the first two columns (symbol, name).
/// Quoted names with embedded commas are handled; short rows are skipped.
fn parse_listing(body: &str) -> Result<Vec<ListedCompany>, ListingError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut companies = Vec::new();
    for record in reader.records() {
        let record = record?;
        let (Some(symbol), Some(name)) = (record.get(0), record.get(1)) else {
            continue;
        };
        if symbol.is_empty() {
            continue;
        }
        companies.push(ListedCompany {
            symbol: symbol.trim().to_string(),
            name: name.trim().to_string(),
        });
    }
    Ok(companies)
}
