// src/fetch.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::FetchConfig;
use crate::document::{self, FetchedDocument};

pub fn build_client(cfg: &FetchConfig) -> Result<Client> {
    Client::builder()
        .user_agent(cfg.user_agent.clone())
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()
        .context("building HTTP client")
}

async fn get_text(client: &Client, url: &Url) -> Result<String> {
    client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()
        .with_context(|| format!("HTTP status from {}", url))?
        .text()
        .await
        .with_context(|| format!("reading body from {}", url))
}

/// GET `url`, retrying up to `max_retries` attempts in total with a fixed
/// delay. The last error is returned unchanged.
#[instrument(level = "info", skip(client, cfg))]
pub async fn fetch_document(client: &Client, url: &str, cfg: &FetchConfig) -> Result<String> {
    let url = Url::parse(url).with_context(|| format!("parsing source URL {}", url))?;
    let attempts = cfg.max_retries.max(1);
    let delay = Duration::from_millis(cfg.retry_delay_ms);

    let mut attempt = 0;
    loop {
        attempt += 1;
        match get_text(client, &url).await {
            Ok(html) => {
                info!(bytes = html.len(), attempt, "fetched document");
                return Ok(html);
            }
            Err(e) if attempt < attempts => {
                warn!(attempt, error = %e, "fetch failed; retrying");
                sleep(delay).await;
            }
            Err(e) => return Err(e.context(format!("giving up after {} attempts", attempt))),
        }
    }
}

/// Fetch and walk the page into heading/table markers and parsed tables.
pub async fn fetch_tables(client: &Client, url: &str, cfg: &FetchConfig) -> Result<FetchedDocument> {
    let html = fetch_document(client, url, cfg).await?;
    Ok(document::walk(&html))
}
