// src/ingest/providers/feed.rs
//! RSS 2.0 / RSS 1.0 (RDF) / Atom parsing into [`Entry`] values.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quick_xml::de::from_str;
use quick_xml::events::Event;
use once_cell::sync::OnceCell;
use quick_xml::Reader;
use regex::{Captures, Regex};
use serde::Deserialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

use crate::ingest::normalize_text;
use crate::ingest::types::Entry;

pub const UNTITLED: &str = "(no title)";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

// ---- RSS 2.0 / RDF ----

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<RssItem>,
}

/// RSS 1.0 keeps `<item>` next to `<channel>` under the root.
#[derive(Debug, Deserialize)]
struct Rdf {
    #[serde(rename = "item", default)]
    item: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "dc:date", alias = "date")]
    dc_date: Option<String>,
}

// ---- Atom ----

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href", default)]
    href: String,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

impl AtomEntry {
    fn best_link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| self.links.first())
            .map(|l| l.href.as_str())
    }
}

/// Raw item before conversion; shared by all three formats.
struct RawItem {
    title: Option<String>,
    link: Option<String>,
    dates: [Option<String>; 2],
}

/// Parse the first timestamp we can make sense of. Naive values are taken as UTC.
pub fn parse_feed_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let parsed = OffsetDateTime::parse(s, &Rfc2822)
        .or_else(|_| OffsetDateTime::parse(s, &Rfc3339))
        .ok();
    if let Some(dt) = parsed {
        return DateTime::from_timestamp(dt.unix_timestamp(), dt.nanosecond());
    }

    // chrono is more lenient with RFC 2822 zone names and single-digit days.
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(n) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(n.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}

/// Local name of the document element, lowercased (`rss`, `rdf`, `feed`).
fn root_element(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().context("reading feed root")? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase());
            }
            Event::Eof => bail!("empty feed document"),
            _ => {}
        }
    }
}

fn raw_items(xml: &str) -> Result<Vec<RawItem>> {
    let root = root_element(xml)?;
    let items = match root.as_str() {
        "rss" => {
            let rss: Rss = from_str(xml).context("parsing rss xml")?;
            rss.channel.item.into_iter().map(RawItem::from).collect()
        }
        "rdf" => {
            let rdf: Rdf = from_str(xml).context("parsing rdf xml")?;
            rdf.item.into_iter().map(RawItem::from).collect()
        }
        "feed" => {
            let feed: AtomFeed = from_str(xml).context("parsing atom xml")?;
            feed.entry.into_iter().map(RawItem::from).collect()
        }
        other => return Err(anyhow!("unsupported feed root element <{other}>")),
    };
    Ok(items)
}

impl From<RssItem> for RawItem {
    fn from(it: RssItem) -> Self {
        Self {
            title: it.title,
            link: it.link,
            dates: [it.pub_date, it.dc_date],
        }
    }
}

impl From<AtomEntry> for RawItem {
    fn from(it: AtomEntry) -> Self {
        let link = it.best_link().map(str::to_string);
        Self {
            title: it.title.map(|t| t.value),
            link,
            dates: [it.published, it.updated],
        }
    }
}

/// Parse a feed document and convert its first `limit` items to entries.
/// Items without a link are dropped after the cap is applied.
pub fn parse_feed(xml: &str, source: &str, limit: usize) -> Result<Vec<Entry>> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    let items = raw_items(&xml_clean)?;

    let mut out = Vec::with_capacity(items.len().min(limit));
    for it in items.into_iter().take(limit) {
        let link = it.link.as_deref().map(str::trim).unwrap_or_default();
        if link.is_empty() {
            continue;
        }
        let title = normalize_text(it.title.as_deref().unwrap_or_default());
        let published_at = it
            .dates
            .iter()
            .flatten()
            .find_map(|d| parse_feed_timestamp(d));

        out.push(Entry {
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title
            },
            link: link.to_string(),
            published_at,
            source: source.to_string(),
        });
    }
    Ok(out)
}

/// The five entities XML itself defines; everything else named is HTML.
const XML_ENTITIES: &[&str] = &["amp", "lt", "gt", "quot", "apos"];

/// HTML named entities show up in real feeds but are not valid XML.
/// Common punctuation folds to ASCII; any other named entity is decoded and
/// re-escaped as XML text, and unknown names are kept as literal text.
fn scrub_html_entities_for_xml(s: &str) -> String {
    let folded = s
        .replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...");

    static RE_NAMED: OnceCell<Regex> = OnceCell::new();
    let re = RE_NAMED.get_or_init(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").unwrap());
    re.replace_all(&folded, |caps: &Captures| {
        let name = &caps[1];
        if XML_ENTITIES.contains(&name) {
            return caps[0].to_string();
        }
        let decoded = html_escape::decode_html_entities(&caps[0]);
        if decoded == caps[0] {
            format!("&amp;{name};")
        } else {
            html_escape::encode_text(&decoded).into_owned()
        }
    })
    .into_owned()
}
