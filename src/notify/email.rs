use anyhow::{bail, Context, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};
use std::time::Duration;

use super::MailTransport;
use crate::config::mail::MailConfig;
use crate::render::RenderedEmail;

const SMTP_TIMEOUT_SECS: u64 = 30;

/// SMTP over implicit TLS (SMTPS), authenticated with `SMTP_USER`/`SMTP_PASS`.
pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl SmtpMailer {
    pub fn new(cfg: &MailConfig, recipients: &[String]) -> Result<Self> {
        let creds = Credentials::new(cfg.user.clone(), cfg.pass.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.server)
            .with_context(|| format!("invalid SMTP_SERVER {}", cfg.server))?
            .port(cfg.port)
            .credentials(creds)
            .timeout(Some(Duration::from_secs(SMTP_TIMEOUT_SECS)))
            .build();

        let from = cfg
            .from
            .parse()
            .with_context(|| format!("invalid MAIL_FROM {}", cfg.from))?;
        let to = parse_mailboxes(recipients)?;

        Ok(Self { mailer, from, to })
    }
}

pub fn parse_mailboxes(addrs: &[String]) -> Result<Vec<Mailbox>> {
    if addrs.is_empty() {
        bail!("no recipients: set MAIL_TO or pass --members-csv");
    }
    addrs
        .iter()
        .map(|a| {
            a.parse::<Mailbox>()
                .with_context(|| format!("invalid recipient address {a}"))
        })
        .collect()
}

pub fn build_message(from: &Mailbox, to: &[Mailbox], email: &RenderedEmail) -> Result<Message> {
    let mut builder = Message::builder()
        .from(from.clone())
        .subject(email.subject.clone());
    for mb in to {
        builder = builder.to(mb.clone());
    }
    builder
        .header(header::ContentType::TEXT_HTML)
        .body(email.html_body.clone())
        .context("build email")
}

#[async_trait::async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &RenderedEmail) -> Result<()> {
        let msg = build_message(&self.from, &self.to, email)?;
        self.mailer.send(msg).await.context("send email")?;
        tracing::info!(recipients = self.to.len(), subject = %email.subject, "digest sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
