//! HTTP client for the price datatable API and its bulk-export flow.

use std::io::Read;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::csv::parse_export;
use super::error::QuandlError;
use super::types::{PriceRecord, PriceSeries, Row};

/// Request timeout for datatable and bulk-download calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DATATABLE_PATH: &str = "/api/v3/datatables/WIKI/PRICES.json";

/// Client for end-of-day price data, authenticated by an API key passed at
/// construction time.
pub struct PriceClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct DatatableResponse {
    datatable: Datatable,
}

#[derive(Deserialize)]
struct Datatable {
    data: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct ExportManifest {
    datatable_bulk_download: BulkDownload,
}

#[derive(Deserialize)]
struct BulkDownload {
    file: BulkFile,
}

#[derive(Deserialize)]
struct BulkFile {
    link: String,
}

impl PriceClient {
    /// Creates a client pointing at the production API.
    pub fn new(api_key: String) -> Result<Self, QuandlError> {
        Self::with_base_url("https://www.quandl.com", api_key)
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, api_key: String) -> Result<Self, QuandlError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn datatable_url(&self, params: &[(&str, &str)]) -> Result<Url, QuandlError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, DATATABLE_PATH))
            .map_err(|e| QuandlError::ParseFailed(format!("invalid URL: {e}")))?;
        for (key, value) in params {
            url.query_pairs_mut().append_pair(key, value);
        }
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }

    async fn get_json<T>(&self, url: Url) -> Result<T, QuandlError>
    where
        T: serde::de::DeserializeOwned,
    {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            tracing::error!("price API returned status {status}");
            return Err(QuandlError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| QuandlError::ParseFailed(e.to_string()))
    }

    /// Fetches the record for the current local calendar day, or `None` when
    /// the API has nothing for it yet.
    ///
    /// Only the first row is used when the API returns several.
    pub async fn get_today(&self, symbol: &str) -> Result<Option<PriceRecord>, QuandlError> {
        let datestamp = chrono::Local::now().format("%Y-%m-%d").to_string();
        let url = self.datatable_url(&[("ticker", symbol), ("date", &datestamp)])?;
        let resp: DatatableResponse = self.get_json(url).await?;
        match resp.datatable.data.first() {
            Some(row) => Ok(Some(PriceRecord::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Fetches all records dated strictly after `from_date` (passed to the
    /// API verbatim, no client-side validation).
    ///
    /// Cardinality is explicit in the return shape: zero rows is `None`, one
    /// row is [`PriceSeries::One`], anything more is [`PriceSeries::Many`]
    /// in API order.
    pub async fn get_from_date(
        &self,
        symbol: &str,
        from_date: &str,
    ) -> Result<Option<PriceSeries>, QuandlError> {
        let url = self.datatable_url(&[("ticker", symbol), ("date.gt", from_date)])?;
        let resp: DatatableResponse = self.get_json(url).await?;

        let mut records = Vec::with_capacity(resp.datatable.data.len());
        for row in &resp.datatable.data {
            records.push(PriceRecord::from_row(row)?);
        }

        if records.is_empty() {
            return Ok(None);
        }
        if records.len() == 1 {
            let only = records.remove(0);
            return Ok(Some(PriceSeries::One(only)));
        }
        Ok(Some(PriceSeries::Many(records)))
    }

    /// Downloads the full price history through the bulk-export flow:
    /// request the export manifest, download the archive it points at,
    /// extract the single CSV member, and parse it.
    ///
    /// Returns `None` when the archive holds no `.csv` member. The archive
    /// is staged in a scoped temp directory removed on every exit path.
    pub async fn get_historic(&self, symbol: &str) -> Result<Option<Vec<Row>>, QuandlError> {
        let url = self.datatable_url(&[("ticker", symbol), ("qopts.export", "true")])?;
        let manifest: ExportManifest = self.get_json(url).await?;
        let link = manifest.datatable_bulk_download.file.link;

        let resp = self.http.get(&link).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("bulk download returned status {status}");
            return Err(QuandlError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        let archive = resp.bytes().await?;

        let work_dir = tempfile::tempdir()?;
        let zip_path = work_dir.path().join("prices.zip");
        std::fs::write(&zip_path, &archive)?;

        let file = std::fs::File::open(&zip_path)?;
        let mut zip = zip::ZipArchive::new(file)?;
        let csv_name = zip
            .file_names()
            .find(|name| name.ends_with(".csv"))
            .map(str::to_string);
        let Some(csv_name) = csv_name else {
            return Ok(None);
        };

        let mut member = zip.by_name(&csv_name)?;
        let mut text = String::new();
        member.read_to_string(&mut text)?;

        parse_export(&text)
    }
}
