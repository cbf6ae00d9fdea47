// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod cli;
pub mod config;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod render;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::ingest::types::{Entry, FeedFetcher, FeedSource};
pub use crate::notify::MailTransport;
pub use crate::pipeline::{run_digest, DigestReport, RunOptions};
pub use crate::render::{RenderedEmail, NO_ITEMS_SUBJECT};
pub use crate::summarize::{Summarizer, SummaryFailure, SummaryResult};
