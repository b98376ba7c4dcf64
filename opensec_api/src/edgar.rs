//! Company lookup against the regulatory filings feed.
//!
//! The browse endpoint returns an Atom document whose `company-info` block
//! carries the filer identifier (CIK), conformed name, phone, and mailing
//! address. The host requires a declared User-Agent.

use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const BROWSE_PATH: &str = "/cgi-bin/browse-edgar";

/// Errors from the filings feed lookup.
#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("company-info block is missing `{0}`")]
    MissingField(&'static str),
}

/// Mailing address from the `company-info` block. Every field is optional;
/// the feed omits lines it does not have.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Address {
    pub street1: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Normalized company data for one symbol.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Company {
    pub symbol: String,
    pub cik: String,
    pub name: String,
    pub address: Address,
    pub phone: Option<String>,
}

/// Single-level form of [`Company`] for pipe-friendly output. Phone is
/// intentionally dropped, matching the published flat schema.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollapsedCompany {
    pub cik: String,
    pub symbol: String,
    pub name: String,
    pub street1: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl Company {
    /// Flattens the nested address onto the top level.
    pub fn collapse(&self) -> CollapsedCompany {
        CollapsedCompany {
            cik: self.cik.clone(),
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            street1: self.address.street1.clone(),
            street2: self.address.street2.clone(),
            city: self.address.city.clone(),
            state: self.address.state.clone(),
            zip: self.address.zip.clone(),
        }
    }
}

/// Client for the filings feed's company browse endpoint.
pub struct EdgarClient {
    http: reqwest::Client,
    base_url: String,
}

impl EdgarClient {
    /// Creates a client pointing at the production filings host.
    pub fn new() -> Result<Self, EdgarError> {
        Self::with_base_url("https://www.sec.gov")
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, EdgarError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("opensecurities/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Searches the filer registry by stock symbol and returns the parsed
    /// company data.
    pub async fn get_company(&self, symbol: &str) -> Result<Company, EdgarError> {
        let url = format!("{}{}", self.base_url, BROWSE_PATH);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("action", "getcompany"),
                ("CIK", symbol),
                ("type", ""),
                ("dateb", ""),
                ("owner", "exclude"),
                ("start", "0"),
                ("count", "40"),
                ("output", "atom"),
            ])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            tracing::error!("filings feed returned status {status}");
            return Err(EdgarError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        parse_company_info(&body, symbol)
    }
}

/// Walks the Atom document and captures the first occurrence of each
/// `company-info` field. The mailing address appears before the business
/// address, so first-wins matches the feed's flat view of the data.
fn parse_company_info(xml: &str, symbol: &str) -> Result<Company, EdgarError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut cik = None;
    let mut name = None;
    let mut phone = None;
    let mut street1 = None;
    let mut street2 = None;
    let mut city = None;
    let mut state = None;
    let mut zip = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = e.name().as_ref().to_vec();
                let slot = match tag.as_slice() {
                    b"cik" => Some(&mut cik),
                    b"conformed-name" => Some(&mut name),
                    b"phone" => Some(&mut phone),
                    b"street1" => Some(&mut street1),
                    b"street2" => Some(&mut street2),
                    b"city" => Some(&mut city),
                    b"state" => Some(&mut state),
                    b"zip" => Some(&mut zip),
                    _ => None,
                };
                if let Some(slot) = slot {
                    if slot.is_none() {
                        let text = reader.read_text(e.name())?.trim().to_string();
                        *slot = Some(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(Company {
        symbol: symbol.to_string(),
        cik: cik.ok_or(EdgarError::MissingField("cik"))?,
        name: name.ok_or(EdgarError::MissingField("conformed-name"))?,
        address: Address {
            street1,
            street2,
            city,
            state,
            zip,
        },
        phone,
    })
}
