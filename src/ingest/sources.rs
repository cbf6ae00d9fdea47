// src/ingest/sources.rs
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::ingest::types::FeedSource;

const UNNAMED_FEED: &str = "Unnamed Feed";

#[derive(Debug, serde::Deserialize)]
struct FeedRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rss_url: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct MemberRow {
    #[serde(default)]
    email: Option<String>,
}

/// Load the feed list (`name,rss_url,notes`). Rows without a url are kept;
/// the loader skips them when fetching.
pub fn load_feed_sources(path: &Path) -> Result<Vec<FeedSource>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("reading feed list from {}", path.display()))?;
    parse_feed_sources(file).with_context(|| format!("parsing feed list {}", path.display()))
}

pub fn parse_feed_sources<R: Read>(input: R) -> Result<Vec<FeedSource>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut out = Vec::new();
    for row in rdr.deserialize::<FeedRow>() {
        let row = row.context("malformed feed row")?;
        let name = row
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNNAMED_FEED.to_string());
        out.push(FeedSource {
            name,
            url: row.rss_url.unwrap_or_default(),
            notes: row.notes.unwrap_or_default(),
        });
    }
    Ok(out)
}

/// Load member addresses (`email,name`) from a roster CSV.
pub fn load_member_emails(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("reading members from {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut emails = Vec::new();
    for row in rdr.deserialize::<MemberRow>() {
        let row = row.with_context(|| format!("malformed member row in {}", path.display()))?;
        if let Some(e) = row.email {
            emails.push(e);
        }
    }
    Ok(merge_recipients(emails))
}

/// Split a comma-separated address list (as in `MAIL_TO`).
pub fn split_address_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim, drop blanks and case-insensitive duplicates; first occurrence wins.
pub fn merge_recipients<I>(addrs: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for a in addrs {
        let t = a.trim();
        if t.is_empty() {
            continue;
        }
        if seen.insert(t.to_ascii_lowercase()) {
            out.push(t.to_string());
        }
    }
    out
}
