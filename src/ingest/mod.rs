// src/ingest/mod.rs
pub mod providers;
pub mod sources;
pub mod types;

use crate::ingest::types::{Entry, FeedFetcher, FeedSource};
use chrono::{DateTime, Duration, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::collections::HashSet;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "digest_entries_fetched_total",
            "Entries parsed from feeds (after the per-feed cap)."
        );
        describe_counter!("digest_feed_errors_total", "Feed fetch/parse errors.");
        describe_counter!(
            "digest_entries_dropped_stale_total",
            "Entries dropped by the freshness window."
        );
        describe_counter!(
            "digest_entries_deduped_total",
            "Entries dropped as duplicates of an earlier entry."
        );
    });
}

/// Normalize feed text: decode entities, strip tags, fold quotes and whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace (incl. nbsp)
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Fail-open freshness check: undated entries are always fresh.
pub fn is_fresh(entry: &Entry, threshold: DateTime<Utc>) -> bool {
    match entry.published_at {
        None => true,
        Some(ts) => ts >= threshold,
    }
}

/// Keep entries published at or after `now - hours`. A window reaching past
/// the representable date range has no lower bound and keeps everything.
pub fn filter_fresh(now: DateTime<Utc>, entries: Vec<Entry>, hours: u32) -> Vec<Entry> {
    let Some(threshold) = now.checked_sub_signed(Duration::hours(i64::from(hours))) else {
        return entries;
    };
    entries
        .into_iter()
        .filter(|e| is_fresh(e, threshold))
        .collect()
}

pub fn dedupe_key(entry: &Entry) -> (String, String) {
    (entry.title.to_lowercase(), entry.link.clone())
}

/// Order-preserving dedupe on (lowercased title, link); first seen wins.
pub fn dedupe(entries: Vec<Entry>) -> Vec<Entry> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut keep = Vec::with_capacity(entries.len());
    for e in entries {
        if seen.insert(dedupe_key(&e)) {
            keep.push(e);
        }
    }
    keep
}

/// Filter then dedupe. Returns (kept, stale_count, dup_count).
pub fn filter_and_dedupe(
    now: DateTime<Utc>,
    raw: Vec<Entry>,
    hours: u32,
) -> (Vec<Entry>, usize, usize) {
    let total = raw.len();
    let fresh = filter_fresh(now, raw, hours);
    let stale = total - fresh.len();
    let fresh_len = fresh.len();
    let unique = dedupe(fresh);
    let dups = fresh_len - unique.len();
    (unique, stale, dups)
}

/// Fetch every fetchable source in order. A failing source contributes zero entries.
pub async fn collect_entries(
    fetcher: &dyn FeedFetcher,
    sources: &[FeedSource],
    per_feed: usize,
) -> Vec<Entry> {
    ensure_metrics_described();

    let mut raw = Vec::new();
    for src in sources {
        if !src.is_fetchable() {
            tracing::debug!(source = %src.name, "skipping source without url");
            continue;
        }
        match fetcher.fetch(src, per_feed).await {
            Ok(mut v) => {
                // Fetchers are expected to honour the cap; enforce it anyway.
                v.truncate(per_feed);
                tracing::debug!(source = %src.name, entries = v.len(), "feed fetched");
                counter!("digest_entries_fetched_total").increment(v.len() as u64);
                raw.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = %src.name, url = %src.url, "feed fetch failed");
                counter!("digest_feed_errors_total").increment(1);
            }
        }
    }
    raw
}

/// Load, filter and dedupe in one go.
pub async fn run_once(
    fetcher: &dyn FeedFetcher,
    sources: &[FeedSource],
    per_feed: usize,
    hours: u32,
    now: DateTime<Utc>,
) -> Vec<Entry> {
    let raw = collect_entries(fetcher, sources, per_feed).await;
    let fetched = raw.len();
    let (kept, stale, dups) = filter_and_dedupe(now, raw, hours);

    counter!("digest_entries_dropped_stale_total").increment(stale as u64);
    counter!("digest_entries_deduped_total").increment(dups as u64);

    tracing::info!(
        target: "ingest",
        fetched = fetched,
        kept = kept.len(),
        stale = stale,
        dedup = dups,
        "ingest finished"
    );
    kept
}
