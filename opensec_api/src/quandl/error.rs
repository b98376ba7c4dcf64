//! Error type for the price client.

/// Errors from the price datatable API and the bulk-export pipeline.
#[derive(thiserror::Error, Debug)]
pub enum QuandlError {
    /// The HTTP request itself failed (network error, timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The API returned a non-success status, body captured for diagnostics.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The response body could not be interpreted.
    #[error("failed to parse response: {0}")]
    ParseFailed(String),
    /// The bulk-export archive could not be read.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// Staging the archive on disk failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A datatable row did not have the 14 positional fields.
    #[error("expected 14 fields in price row, got {0}")]
    MalformedRow(usize),
    /// A volume field held a value that is not numeric at all.
    #[error("non-numeric volume value: {0}")]
    Conversion(String),
}
