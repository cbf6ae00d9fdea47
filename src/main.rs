//! Morning Digest — binary entrypoint.
//! Loads `.env`, sets up logging, parses flags and runs one digest.

use clap::Parser;
use morning_digest::cli::{self, Cli};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` wins; otherwise `LOG_LEVEL` (e.g. "debug"); default "info".
/// Logs go to stderr so `--dry-run` output stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL")
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_else(|_| "info".to_string());
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Real environment wins over .env; a missing file is fine.
    let _ = dotenvy::dotenv();

    init_tracing();

    let args = Cli::parse();
    tracing::debug!(?args, "parsed arguments");

    let report = cli::run(args).await?;
    tracing::info!(
        items = report.item_count,
        fallback = report.used_fallback,
        "done"
    );
    Ok(())
}
