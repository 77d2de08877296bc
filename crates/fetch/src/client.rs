//! HTTP client construction and JSON retrieval.

use flowrank_core::{config::FetchConfig, Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, REFERER, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Build a client carrying the configured default headers and timeout.
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value(&config.user_agent)?);
    headers.insert(ACCEPT, header_value(&config.accept)?);
    headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::config(format!("invalid header value '{}': {}", value, e)))
}

/// Fetch a URL and parse the body as JSON.
///
/// Any transport failure, non-2xx status, or malformed body surfaces as a
/// fetch error; the caller decides whether that is recoverable.
pub async fn get_json(
    client: &Client,
    url: &str,
    referer: Option<&str>,
) -> Result<serde_json::Value> {
    let mut request = client.get(url);
    if let Some(referer) = referer {
        request = request.header(REFERER, referer);
    }

    let response = request
        .send()
        .await
        .map_err(|e| Error::fetch(format!("request to {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::fetch(format!("{} returned status {}", url, status)));
    }

    response
        .json()
        .await
        .map_err(|e| Error::fetch(format!("{} returned malformed JSON: {}", url, e)))
}
