//! Feed loaders: BCB SGS over HTTP (optionally through a proxy) or a local
//! JSON file in the same format, plus the startup `LoadPhase`.

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Url};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::series::{RawRecord, SeriesStore};

const PROXY_FEED_NAME: &str = "poupanca";

/// Validate the response shape (a JSON array of records) and decode it
pub fn parse_response_body(body: &str) -> Result<Vec<RawRecord>> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("Poupança response is not valid JSON")?;
    if !value.is_array() {
        return Err(anyhow!(
            "Unexpected Poupança response shape: expected a JSON array of records"
        ));
    }
    serde_json::from_value(value).context("Failed to decode Poupança records")
}

/// HTTP client for the BCB SGS series endpoint
#[derive(Debug, Clone)]
pub struct BcbClient {
    client: Client,
    url: Url,
}

impl BcbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; PoupancaBot/1.0)")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: request_url(config)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn fetch_records(&self) -> Result<Vec<RawRecord>> {
        info!("Fetching poupança series from {}", self.url);

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .context("Failed to send request to BCB")?;

        if !response.status().is_success() {
            return Err(anyhow!("BCB returned error status: {}", response.status()));
        }

        let body = response
            .text()
            .await
            .context("Failed to read BCB response body")?;
        parse_response_body(&body)
    }
}

/// Direct series URL, or the proxy URL wrapping it
pub fn request_url(config: &Config) -> Result<Url> {
    match config.proxy.as_deref() {
        Some(proxy) => Url::parse_with_params(
            proxy,
            &[("name", PROXY_FEED_NAME), ("url", config.series_url.as_str())],
        )
        .with_context(|| format!("Invalid proxy URL: {}", proxy)),
        None => Url::parse(&config.series_url)
            .with_context(|| format!("Invalid series URL: {}", config.series_url)),
    }
}

/// Where raw records come from
#[derive(Debug, Clone)]
pub enum FeedSource {
    Bcb(BcbClient),
    File(PathBuf),
}

impl FeedSource {
    pub async fn fetch_records(&self) -> Result<Vec<RawRecord>> {
        match self {
            FeedSource::Bcb(client) => client.fetch_records().await,
            FeedSource::File(path) => {
                info!("Reading poupança series from {}", path.display());
                let body = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                parse_response_body(&body)
                    .with_context(|| format!("Invalid series file {}", path.display()))
            }
        }
    }
}

/// Fetch from `source` and replace the contents of `store`
pub async fn load_feed(store: &SeriesStore, source: &FeedSource) -> Result<usize> {
    let records = source.fetch_records().await?;
    if records.is_empty() {
        warn!("Poupança feed returned no records");
    }
    store.load(&records).context("Failed to load poupança series")?;
    Ok(records.len())
}

struct RegisteredFeed {
    name: String,
    source: FeedSource,
    store: Arc<SeriesStore>,
}

/// Feeds loaded once while the application starts, before any query runs
#[derive(Default)]
pub struct LoadPhase {
    feeds: Vec<RegisteredFeed>,
}

impl LoadPhase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        source: FeedSource,
        store: Arc<SeriesStore>,
    ) -> &mut Self {
        self.feeds.push(RegisteredFeed {
            name: name.into(),
            source,
            store,
        });
        self
    }

    /// Run every registered feed in registration order; the first failure
    /// aborts the phase. Returns the number of records loaded.
    pub async fn run(&self) -> Result<usize> {
        let mut total = 0;
        for feed in &self.feeds {
            let count = load_feed(&feed.store, &feed.source)
                .await
                .with_context(|| format!("Load phase failed on feed '{}'", feed.name))?;
            info!("Feed '{}' loaded {} records", feed.name, count);
            total += count;
        }
        Ok(total)
    }
}
