//! One digest run: LOAD → FILTER → DEDUPE → (EMPTY? PLACEHOLDER : SUMMARIZE → RENDER) → SEND.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::ingest::types::{Entry, FeedFetcher, FeedSource};
use crate::notify::MailTransport;
use crate::render::{render_digest, render_placeholder, RenderedEmail};
use crate::summarize::{fallback_html, Summarizer, SummaryFailure, SummaryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub hours: u32,
    pub topn: usize,
    pub per_feed: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            hours: 24,
            topn: 8,
            per_feed: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestReport {
    pub subject: String,
    /// Entries listed in the email (0 for the placeholder).
    pub item_count: usize,
    pub used_fallback: bool,
    /// Set when the summarizer was called and failed.
    pub summary_failure: Option<SummaryFailure>,
}

/// First `topn` entries, in arrival order.
pub fn select_top(mut entries: Vec<Entry>, topn: usize) -> Vec<Entry> {
    entries.truncate(topn);
    entries
}

/// Summarize `selected`, falling back to raw headlines. Returns (fragment, failure).
pub async fn summarize_or_fallback(
    summarizer: &dyn Summarizer,
    selected: &[Entry],
) -> (String, Option<SummaryFailure>) {
    match summarizer.summarize(selected).await {
        SummaryResult::Summarized(html) => (html, None),
        SummaryResult::Failed(reason) => {
            tracing::warn!(
                summarizer = summarizer.name(),
                error = %reason,
                "summarization failed; falling back to headlines"
            );
            (fallback_html(selected), Some(reason))
        }
    }
}

/// Build the email for already filtered + deduped entries. The summarizer is
/// skipped entirely when nothing is left.
pub async fn compose(
    entries: Vec<Entry>,
    summarizer: &dyn Summarizer,
    opts: &RunOptions,
    date: NaiveDate,
) -> (RenderedEmail, DigestReport) {
    let selected = select_top(entries, opts.topn);
    if selected.is_empty() {
        tracing::info!("no fresh items found; sending placeholder email");
        let email = render_placeholder(opts.hours, date);
        let report = DigestReport {
            subject: email.subject.clone(),
            item_count: 0,
            used_fallback: false,
            summary_failure: None,
        };
        return (email, report);
    }

    let (fragment, failure) = summarize_or_fallback(summarizer, &selected).await;
    let used_fallback = failure.is_some();
    let email = render_digest(&fragment, selected.len(), opts.hours, used_fallback, date);
    let report = DigestReport {
        subject: email.subject.clone(),
        item_count: selected.len(),
        used_fallback,
        summary_failure: failure,
    };
    (email, report)
}

/// Run the whole pipeline once. Only the mail step can fail the run.
pub async fn run_digest(
    sources: &[FeedSource],
    fetcher: &dyn FeedFetcher,
    summarizer: &dyn Summarizer,
    mailer: &dyn MailTransport,
    opts: &RunOptions,
    now: DateTime<Utc>,
) -> Result<DigestReport> {
    let entries = crate::ingest::run_once(fetcher, sources, opts.per_feed, opts.hours, now).await;
    let date = now.with_timezone(&Local).date_naive();

    let (email, report) = compose(entries, summarizer, opts, date).await;

    mailer
        .send(&email)
        .await
        .with_context(|| format!("delivering digest via {}", mailer.name()))?;

    tracing::info!(
        items = report.item_count,
        fallback = report.used_fallback,
        subject = %report.subject,
        "digest run complete"
    );
    Ok(report)
}
