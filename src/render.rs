//! HTML email rendering for the digest and the "nothing new" placeholder.

use chrono::NaiveDate;
use html_escape::encode_text;

pub const NO_ITEMS_SUBJECT: &str = "Morning Digest — No new items";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html_body: String,
}

/// Where the list inside the email came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrigin {
    Summarized,
    Headlines,
    Placeholder,
}

impl ListOrigin {
    fn note(self) -> &'static str {
        match self {
            ListOrigin::Summarized => "Summaries provided by Perplexity.",
            ListOrigin::Headlines => "Summaries unavailable; showing headlines.",
            ListOrigin::Placeholder => "Nothing new to summarize.",
        }
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %d %b %Y").to_string()
}

/// Full HTML document around an `<li>` fragment.
pub fn render_document(
    fragment: &str,
    count: usize,
    hours: u32,
    origin: ListOrigin,
    date: NaiveDate,
) -> String {
    let today = format_date(date);
    format!(
        r#"<html>
  <body>
    <h2>Morning Digest — {today}</h2>
    <p>{count} highlights from the last {hours}&nbsp;hours.</p>
    <p style="color:#555;font-size:13px">{note}</p>
    <ul>
      {fragment}
    </ul>
    <p style="color:#666;font-size:12px">Automated delivery at ~06:00 Paris time.</p>
  </body>
</html>"#,
        today = encode_text(&today),
        note = encode_text(origin.note()),
    )
}

pub fn digest_subject(count: usize, used_fallback: bool) -> String {
    let mut subject = format!("Morning Digest — Top {count} highlights");
    if used_fallback {
        subject.push_str(" (headlines)");
    }
    subject
}

pub fn render_digest(
    fragment: &str,
    count: usize,
    hours: u32,
    used_fallback: bool,
    date: NaiveDate,
) -> RenderedEmail {
    let origin = if used_fallback {
        ListOrigin::Headlines
    } else {
        ListOrigin::Summarized
    };
    RenderedEmail {
        subject: digest_subject(count, used_fallback),
        html_body: render_document(fragment, count, hours, origin, date),
    }
}

/// Sent when nothing survived filtering; exactly one list item.
pub fn render_placeholder(hours: u32, date: NaiveDate) -> RenderedEmail {
    let fragment = format!("<li>No fresh items found in the last {hours}h.</li>");
    RenderedEmail {
        subject: NO_ITEMS_SUBJECT.to_string(),
        html_body: render_document(&fragment, 0, hours, ListOrigin::Placeholder, date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn placeholder_has_fixed_subject_and_one_item() {
        let email = render_placeholder(24, day());
        assert_eq!(email.subject, "Morning Digest — No new items");
        assert_eq!(email.html_body.matches("<li>").count(), 1);
        assert!(email.html_body.contains("No fresh items found in the last 24h."));
    }

    #[test]
    fn digest_embeds_fragment_and_footer() {
        let email = render_digest("<li><a href='X'>Y</a></li>", 1, 24, false, day());
        assert_eq!(email.subject, "Morning Digest — Top 1 highlights");
        assert!(email.html_body.contains("<ul>\n      <li><a href='X'>Y</a></li>\n    </ul>"));
        assert!(email.html_body.contains("Morning Digest — Monday, 10 Mar 2025"));
        assert!(email.html_body.contains("1 highlights from the last 24&nbsp;hours."));
        assert!(email.html_body.contains("06:00 Paris time"));
        assert!(email.html_body.contains("Summaries provided by Perplexity."));
    }

    #[test]
    fn fallback_subject_is_marked() {
        let email = render_digest("<li>x</li>", 3, 12, true, day());
        assert_eq!(email.subject, "Morning Digest — Top 3 highlights (headlines)");
        assert!(email.html_body.contains("showing headlines"));
    }
}
