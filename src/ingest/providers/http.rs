// src/ingest/providers/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::ingest::providers::feed::parse_feed;
use crate::ingest::types::{Entry, FeedFetcher, FeedSource};

pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 20;

/// Fetches feeds over HTTP(S). One bounded request per source, no retries.
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("morning-digest/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("building feed http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, source: &FeedSource, limit: usize) -> Result<Vec<Entry>> {
        let url = source.url.trim();
        let body = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} non-2xx"))?
            .text()
            .await
            .with_context(|| format!("reading body of {url}"))?;

        parse_feed(&body, &source.name, limit)
            .with_context(|| format!("parsing feed {}", source.name))
    }
}
