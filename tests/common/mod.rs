// tests/common/mod.rs
// Hand-written mocks for the three pipeline seams.
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use morning_digest::{
    Entry, FeedFetcher, FeedSource, MailTransport, RenderedEmail, Summarizer, SummaryFailure,
    SummaryResult,
};

pub fn entry(source: &str, title: &str, link: &str, published_at: Option<DateTime<Utc>>) -> Entry {
    Entry {
        title: title.to_string(),
        link: link.to_string(),
        published_at,
        source: source.to_string(),
    }
}

/// Serves canned entries per source url; urls listed in `failing` error out.
#[derive(Default)]
pub struct MockFetcher {
    pub feeds: HashMap<String, Vec<Entry>>,
    pub failing: Vec<String>,
    pub calls: Mutex<Vec<(String, usize)>>,
}

impl MockFetcher {
    pub fn with_feed(mut self, url: &str, entries: Vec<Entry>) -> Self {
        self.feeds.insert(url.to_string(), entries);
        self
    }

    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }
}

#[async_trait]
impl FeedFetcher for MockFetcher {
    async fn fetch(&self, source: &FeedSource, limit: usize) -> Result<Vec<Entry>> {
        self.calls.lock().unwrap().push((source.url.clone(), limit));
        if self.failing.contains(&source.url) {
            return Err(anyhow!("connection refused"));
        }
        Ok(self
            .feeds
            .get(&source.url)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .collect())
    }
}

/// Returns a fixed result and records every payload it was given.
pub struct MockSummarizer {
    pub result: SummaryResult,
    pub calls: Mutex<Vec<Vec<Entry>>>,
}

impl MockSummarizer {
    pub fn ok(html: &str) -> Self {
        Self {
            result: SummaryResult::Summarized(html.to_string()),
            calls: Mutex::new(vec![]),
        }
    }

    pub fn failing(reason: SummaryFailure) -> Self {
        Self {
            result: SummaryResult::Failed(reason),
            calls: Mutex::new(vec![]),
        }
    }

    pub fn payloads(&self) -> Vec<Vec<Entry>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, entries: &[Entry]) -> SummaryResult {
        self.calls.lock().unwrap().push(entries.to_vec());
        self.result.clone()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[derive(Default)]
pub struct MockMailer {
    pub fail: bool,
    pub sent: Mutex<Vec<RenderedEmail>>,
}

impl MockMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(vec![]),
        }
    }

    pub fn sent(&self) -> Vec<RenderedEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for MockMailer {
    async fn send(&self, email: &RenderedEmail) -> Result<()> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            return Err(anyhow!("535 authentication failed"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
