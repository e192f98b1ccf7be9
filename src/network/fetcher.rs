use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::discovery::extract_page_text;
use crate::models::PageResult;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP {0}")]
    Status(u16),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Shared client without its own timeout; each fetch is bounded by `fetch_page`.
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("proxy-config-harvester/", env!("CARGO_PKG_VERSION")))
        .build()
}

async fn get_text(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    Ok(response.text().await?)
}

async fn fetch_body(client: &Client, url: &str, timeout_duration: Duration) -> Result<String, FetchError> {
    match timeout(timeout_duration, get_text(client, url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(timeout_duration)),
    }
}

/// One GET with a timeout; any failure becomes an absent page, never an error.
pub async fn fetch_page(
    client: &Client,
    url: &str,
    timeout_duration: Duration,
    decode_base64: bool,
) -> PageResult {
    match fetch_body(client, url, timeout_duration).await {
        Ok(body) => {
            let text = extract_page_text(&body, decode_base64);
            debug!("Fetched {}: {} bytes -> {} chars of text", url, body.len(), text.len());
            PageResult::fetched(url, text)
        }
        Err(e) => {
            warn!("Failed to fetch or process {}: {}", url, e);
            PageResult::failed(url)
        }
    }
}
