//! Command-line surface and the production wiring behind it.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::config::{mail::MailConfig, summarizer::SummarizerConfig};
use crate::ingest::providers::http::{HttpFeedFetcher, DEFAULT_FEED_TIMEOUT_SECS};
use crate::ingest::sources::load_feed_sources;
use crate::notify::{resolve_recipients, MailTransport, SmtpMailer, StdoutMailer};
use crate::pipeline::{run_digest, DigestReport, RunOptions};
use crate::summarize::PerplexityClient;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "morning-digest",
    about = "Compile and email a morning finance digest."
)]
pub struct Cli {
    /// CSV file containing feed metadata (name,rss_url,notes)
    #[arg(long, value_name = "FILE")]
    pub csv: PathBuf,

    /// Number of entries to include in the digest
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..))]
    pub topn: u32,

    /// Look-back window for feed entries, in hours
    #[arg(long, default_value_t = 24)]
    pub hours: u32,

    /// Maximum number of items taken from each feed before filtering
    #[arg(long = "per-feed", default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub per_feed: u32,

    /// Optional roster CSV (email,name) whose addresses are added to MAIL_TO
    #[arg(long = "members-csv", value_name = "FILE")]
    pub members_csv: Option<PathBuf>,

    /// Per-feed HTTP timeout, in seconds
    #[arg(
        long = "feed-timeout",
        default_value_t = DEFAULT_FEED_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub feed_timeout: u64,

    /// Print the email to stdout instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            hours: self.hours,
            topn: self.topn as usize,
            per_feed: self.per_feed as usize,
        }
    }
}

fn build_mailer(cli: &Cli) -> Result<Box<dyn MailTransport>> {
    if cli.dry_run {
        return Ok(Box::new(StdoutMailer));
    }
    let cfg = MailConfig::from_env()?;
    let recipients = resolve_recipients(cli.members_csv.as_deref(), &cfg.to)?;
    tracing::debug!(config = ?cfg, recipients = recipients.len(), "mail configured");
    Ok(Box::new(SmtpMailer::new(&cfg, &recipients)?))
}

/// Production entry point: real feeds, Perplexity, SMTP.
pub async fn run(cli: Cli) -> Result<DigestReport> {
    let sources = load_feed_sources(&cli.csv)?;
    if !sources.iter().any(|s| s.is_fetchable()) {
        bail!("No feeds found in {}.", cli.csv.display());
    }

    // Mail config is checked before any network work so a misconfigured run fails fast.
    let mailer = build_mailer(&cli)?;

    let fetcher = HttpFeedFetcher::new(cli.feed_timeout)?;
    let summarizer_cfg = SummarizerConfig::from_env();
    if summarizer_cfg.api_key.is_none() {
        tracing::warn!("PERPLEXITY_API_KEY not set; digest will list raw headlines");
    }
    let summarizer = PerplexityClient::new(summarizer_cfg).context("summarizer setup")?;

    run_digest(
        &sources,
        &fetcher,
        &summarizer,
        mailer.as_ref(),
        &cli.run_options(),
        chrono::Utc::now(),
    )
    .await
}
