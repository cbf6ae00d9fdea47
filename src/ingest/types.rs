// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One row of the feed list CSV.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub notes: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            notes: String::new(),
        }
    }

    /// Rows with a blank url are kept in the list but never fetched.
    pub fn is_fetchable(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub link: String,
    /// `None` when the feed had no usable date; such entries always pass the freshness filter.
    pub published_at: Option<DateTime<Utc>>,
    pub source: String, // FeedSource::name
}

#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch at most `limit` entries from `source`, in feed order.
    async fn fetch(&self, source: &FeedSource, limit: usize) -> Result<Vec<Entry>>;
}
