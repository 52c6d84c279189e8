//! POM download from remote Maven repositories.

use std::time::Duration;

use pomgraph_util::errors::{PomError, PomResult};
use reqwest::blocking::Client;

/// Build a blocking HTTP client for repository lookups.
pub fn build_client(timeout: Duration) -> PomResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("pomgraph/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| PomError::Network {
            message: format!("Failed to create HTTP client: {e}"),
        })
}

/// GET a URL, returning the body of a 2xx response.
///
/// Any other status, and any transport failure, yields `None`: the document
/// is treated as absent from this repository.
pub fn fetch_bytes(client: &Client, url: &str) -> Option<Vec<u8>> {
    let resp = match client.get(url).send() {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!("Request to {url} failed: {e}");
            return None;
        }
    };

    let status = resp.status();
    if !status.is_success() {
        tracing::debug!("HTTP {status} fetching {url}");
        return None;
    }

    match resp.bytes() {
        Ok(bytes) => Some(bytes.to_vec()),
        Err(e) => {
            tracing::warn!("Failed to read response from {url}: {e}");
            None
        }
    }
}
