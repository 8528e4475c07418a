//! HTTP fetch helpers shared by resource choices and the batch loader.
//!
//! Requests are plain `GET`s for static json or text resources. The client is
//! built per call from a [`FetchConfig`] so timeouts and the user agent follow the
//! current configuration.

use meridian_types::ResolveError;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::{FetchConfig, redact_url, status_error_message};

const DEFAULT_USER_AGENT: &str = concat!("meridian/", env!("CARGO_PKG_VERSION"));

/// Failure while fetching a resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server reported that the resource does not exist.
    #[error("resource not found: {url}")]
    NotFound { url: String },
    /// Any other non-success status.
    #[error("HTTP {status} while fetching {url}")]
    Status { url: String, status: u16 },
    /// Connection, timeout, or body read failure.
    #[error("network error: {0}")]
    Network(String),
}

impl From<FetchError> for ResolveError {
    fn from(error: FetchError) -> Self {
        ResolveError::Remote(error.to_string())
    }
}

/// Build a client configured from `config`.
pub fn build_client(config: &FetchConfig) -> Result<Client, FetchError> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json,text/plain,text/html,*/*"));

    Client::builder()
        .brotli(true)
        .gzip(true)
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .user_agent(config.user_agent.clone().unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()))
        .default_headers(default_headers)
        .build()
        .map_err(|error| FetchError::Network(error.to_string()))
}

/// Fetches a static json or text resource using GET, returning the status and
/// body regardless of the status code.
pub async fn fetch_static(url: &str, config: &FetchConfig) -> Result<(StatusCode, String), FetchError> {
    let client = build_client(config)?;
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|error| FetchError::Network(format!("{} ({})", error, redact_url(url))))?;

    let status = response.status();
    let content = response
        .text()
        .await
        .map_err(|error| FetchError::Network(format!("failed to read body: {}", error)))?;
    debug!(url = %redact_url(url), status = status.as_u16(), bytes = content.len(), "resource fetched");
    Ok((status, content))
}

/// Fetch a resource body as text. Non-success statuses become errors; `404` and
/// `410` are reported as [`FetchError::NotFound`].
pub async fn fetch_text(url: &str, config: &FetchConfig) -> Result<String, FetchError> {
    let (status, content) = fetch_static(url, config).await?;
    if status.is_success() {
        return Ok(content);
    }
    let url = redact_url(url);
    if let Some(hint) = status_error_message(status.as_u16()) {
        debug!(url = %url, hint = %hint, "resource request rejected");
    }
    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => Err(FetchError::NotFound { url }),
        other => Err(FetchError::Status {
            url,
            status: other.as_u16(),
        }),
    }
}
