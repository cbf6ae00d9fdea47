pub mod email;

use anyhow::Result;
use std::path::Path;

use crate::ingest::sources::{load_member_emails, merge_recipients};
use crate::render::RenderedEmail;

pub use email::SmtpMailer;

/// Delivery seam for the rendered digest. One call per run, no retries.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &RenderedEmail) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// `--dry-run` transport: prints the email instead of sending it.
pub struct StdoutMailer;

#[async_trait::async_trait]
impl MailTransport for StdoutMailer {
    async fn send(&self, email: &RenderedEmail) -> Result<()> {
        println!("Subject: {}\n\n{}", email.subject, email.html_body);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}

/// Members CSV addresses first, then `MAIL_TO`; deduped case-insensitively.
pub fn resolve_recipients(members_csv: Option<&Path>, mail_to: &[String]) -> Result<Vec<String>> {
    let mut all = match members_csv {
        Some(p) => load_member_emails(p)?,
        None => Vec::new(),
    };
    all.extend(mail_to.iter().cloned());
    Ok(merge_recipients(all))
}
