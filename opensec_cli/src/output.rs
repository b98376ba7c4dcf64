//! Result sink: JSON to stdout, or an HTTP POST to a configured endpoint.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("endpoint returned status {status}")]
    HttpStatus { status: u16, body: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Prints a value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), SinkError> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// POSTs a value as JSON to `endpoint` with `content-type: application/json`.
/// A non-2xx response is an error, with the response body captured for
/// diagnostics. No retry.
pub async fn post_json<T: Serialize>(endpoint: &str, value: &T) -> Result<(), SinkError> {
    let body = serde_json::to_string(value)?;
    let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let resp = client
        .post(endpoint)
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SinkError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }
    Ok(())
}

/// Routes a result to the configured endpoint, or stdout when none is set.
///
/// A failed POST never loses the payload: the error is logged, the JSON
/// falls back to stdout, and the error is still returned so the process
/// exits non-zero.
pub async fn emit<T: Serialize>(post: Option<&str>, value: &T) -> anyhow::Result<()> {
    let Some(endpoint) = post else {
        print_json(value)?;
        return Ok(());
    };

    match post_json(endpoint, value).await {
        Ok(()) => Ok(()),
        Err(e) => {
            if let SinkError::HttpStatus { status, body } = &e {
                tracing::error!("POST to {endpoint} failed with status {status}: {body}");
            } else {
                tracing::error!("POST to {endpoint} failed: {e}");
            }
            print_json(value)?;
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> serde_json::Value {
        serde_json::json!({ "symbol": "AAPL", "close": 140.88, "volume": 23575094 })
    }

    #[tokio::test]
    async fn post_sends_json_with_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ingest"))
            .and(header("content-type", "application/json"))
            .and(body_json(payload()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = format!("{}/ingest", server.uri());
        post_json(&endpoint, &payload()).await.unwrap();
    }

    #[tokio::test]
    async fn post_failure_captures_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ingest"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let endpoint = format!("{}/ingest", server.uri());
        let err = post_json(&endpoint, &payload()).await.unwrap_err();
        match err {
            SinkError::HttpStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn emit_returns_the_error_after_falling_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ingest"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let endpoint = format!("{}/ingest", server.uri());
        let result = emit(Some(&endpoint), &payload()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn emit_without_endpoint_prints_and_succeeds() {
        let result = emit(None, &payload()).await;
        assert!(result.is_ok());
    }
}
