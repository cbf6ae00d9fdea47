//! Summarizer abstraction: prompt building, typed failures and the headline fallback.

pub mod perplexity;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::ingest::types::Entry;

pub use perplexity::PerplexityClient;

pub const SYSTEM_PROMPT: &str = "You are a concise finance news editor.";

pub const USER_INSTRUCTIONS: &str = "Turn each line into a tight, neutral, finance-friendly one-liner (≤18 words), \
keep the original link, no emojis, no numbering. Return as HTML <li><a>Title</a></li> list.";

/// Why a summarize call produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryFailure {
    #[error("PERPLEXITY_API_KEY is not set")]
    MissingCredential,
    #[error("summarizer request timed out after {0}s")]
    Timeout(u64),
    #[error("summarizer request failed: {0}")]
    Transport(String),
    #[error("summarizer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed summarizer response: {0}")]
    Malformed(String),
    #[error("summarizer response contained no content")]
    Empty,
}

/// Outcome of one summarize call. Failure is an ordinary value: the caller
/// renders headlines instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryResult {
    Summarized(String),
    Failed(SummaryFailure),
}

#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    /// Must not panic or error out; every problem maps to `SummaryResult::Failed`.
    async fn summarize(&self, entries: &[Entry]) -> SummaryResult;
    fn name(&self) -> &'static str;
}

/// Fixed instructions followed by one `- title — link` line per entry.
pub fn build_user_prompt(entries: &[Entry]) -> String {
    let lines = entries
        .iter()
        .map(|e| format!("- {} — {}", e.title, e.link))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{USER_INSTRUCTIONS}\n\n{lines}")
}

/// Headline list used when summarization is unavailable. No paraphrasing, escaped.
pub fn fallback_html(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(|e| {
            format!(
                r#"<li><strong>{}</strong>: <a href="{}">{}</a></li>"#,
                encode_text(&e.source),
                encode_double_quoted_attribute(&e.link),
                encode_text(&e.title)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Models sometimes wrap the list in a ```html fence; drop it.
pub fn strip_code_fences(s: &str) -> String {
    let t = s.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t.to_string();
    };
    // Skip the info string ("html") up to the first newline.
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, link: &str) -> Entry {
        Entry {
            title: title.into(),
            link: link.into(),
            published_at: None,
            source: "Wire & Co".into(),
        }
    }

    #[test]
    fn user_prompt_lists_every_entry() {
        let p = build_user_prompt(&[entry("A", "https://x/a"), entry("B", "https://x/b")]);
        assert!(p.starts_with(USER_INSTRUCTIONS));
        assert!(p.ends_with("- A — https://x/a\n- B — https://x/b"));
    }

    #[test]
    fn fallback_escapes_and_keeps_links() {
        let html = fallback_html(&[entry("S&P <up>", "https://x/a?b=1&c=2")]);
        assert_eq!(
            html,
            r#"<li><strong>Wire &amp; Co</strong>: <a href="https://x/a?b=1&amp;c=2">S&amp;P &lt;up&gt;</a></li>"#
        );
    }

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(strip_code_fences("```html\n<li>a</li>\n```"), "<li>a</li>");
        assert_eq!(strip_code_fences("  <li>a</li>\n"), "<li>a</li>");
    }

    #[test]
    fn failure_messages_are_readable() {
        let f = SummaryFailure::Status {
            status: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(f.to_string(), "summarizer returned HTTP 401: unauthorized");
    }
}
