//! Quote service client: maps the provider's PascalCase payload into the
//! normalized nested `price`/`market` schema.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const QUOTE_PATH: &str = "/Api/v2/Quote/json";

/// Errors from the quote service.
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    #[error("failed to parse quote: {0}")]
    ParseFailed(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawQuote {
    low: f64,
    high: f64,
    open: f64,
    last_price: f64,
    #[serde(rename = "ChangeYTD")]
    change_ytd: f64,
    market_cap: f64,
    volume: i64,
}

/// A normalized quote with `price` and `market` sub-objects.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    pub price: QuotePrice,
    pub market: QuoteMarket,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuotePrice {
    pub low: f64,
    pub high: f64,
    pub open: f64,
    pub last_price: f64,
    pub change_ytd: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuoteMarket {
    pub market_cap: f64,
    pub volume: i64,
}

impl From<RawQuote> for Quote {
    fn from(raw: RawQuote) -> Self {
        Self {
            price: QuotePrice {
                low: raw.low,
                high: raw.high,
                open: raw.open,
                last_price: raw.last_price,
                change_ytd: raw.change_ytd,
            },
            market: QuoteMarket {
                market_cap: raw.market_cap,
                volume: raw.volume,
            },
        }
    }
}

/// Client for the delayed-quote service. No authentication required.
pub struct QuoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl QuoteClient {
    /// Creates a client pointing at the production quote service.
    pub fn new() -> Result<Self, QuoteError> {
        Self::with_base_url("http://dev.markitondemand.com")
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, QuoteError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Downloads and normalizes the quote for one symbol.
    pub async fn get_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let url = format!("{}{}", self.base_url, QUOTE_PATH);
        let resp = self
            .http
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            tracing::error!("quote service returned status {status}");
            return Err(QuoteError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        let raw: RawQuote =
            serde_json::from_str(&body).map_err(|e| QuoteError::ParseFailed(e.to_string()))?;
        Ok(raw.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_quote() -> serde_json::Value {
        serde_json::json!({
            "Status": "SUCCESS",
            "Name": "Apple Inc",
            "Symbol": "AAPL",
            "LastPrice": 140.88,
            "Change": 0.52,
            "ChangeYTD": 115.82,
            "High": 141.22,
            "Low": 138.62,
            "Open": 139.39,
            "MarketCap": 739_590_000_000.0,
            "Volume": 23575094
        })
    }

    #[tokio::test]
    async fn quote_maps_into_nested_schema() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Api/v2/Quote/json"))
            .and(query_param("symbol", "AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_quote()))
            .mount(&server)
            .await;

        let client = QuoteClient::with_base_url(&server.uri()).unwrap();
        let quote = client.get_quote("AAPL").await.unwrap();

        assert_eq!(quote.price.last_price, 140.88);
        assert_eq!(quote.price.change_ytd, 115.82);
        assert_eq!(quote.market.volume, 23_575_094);

        let value = serde_json::to_value(&quote).unwrap();
        assert!(value["price"].is_object());
        assert!(value["market"].is_object());
        assert_eq!(value["price"]["open"], 139.39);
    }

    #[tokio::test]
    async fn malformed_payload_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Api/v2/Quote/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "Message": "No symbol matches found" })),
            )
            .mount(&server)
            .await;

        let client = QuoteClient::with_base_url(&server.uri()).unwrap();
        let err = client.get_quote("NOPE").await.unwrap_err();
        assert!(matches!(err, QuoteError::ParseFailed(_)));
    }
}
