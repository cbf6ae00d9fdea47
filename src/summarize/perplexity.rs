// src/summarize/perplexity.rs
//! Perplexity Chat Completions client (OpenAI-compatible wire format).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{
    build_user_prompt, strip_code_fences, Summarizer, SummaryFailure, SummaryResult, SYSTEM_PROMPT,
};
use crate::config::summarizer::SummarizerConfig;
use crate::ingest::types::Entry;

const TEMPERATURE: f32 = 0.2;
/// Error bodies are logged, not rendered; keep them short.
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMsg>,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    content: Option<String>,
}

pub struct PerplexityClient {
    http: reqwest::Client,
    cfg: SummarizerConfig,
}

impl PerplexityClient {
    pub fn new(cfg: SummarizerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("morning-digest/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building summarizer http client")?;
        Ok(Self { http, cfg })
    }

    fn map_reqwest(&self, e: reqwest::Error) -> SummaryFailure {
        if e.is_timeout() {
            SummaryFailure::Timeout(self.cfg.timeout_secs)
        } else if e.is_decode() {
            SummaryFailure::Malformed(e.to_string())
        } else {
            SummaryFailure::Transport(e.to_string())
        }
    }

    async fn call(&self, entries: &[Entry]) -> Result<String, SummaryFailure> {
        let api_key = self
            .cfg
            .api_key
            .as_deref()
            .ok_or(SummaryFailure::MissingCredential)?;

        let user = build_user_prompt(entries);
        let req = ChatRequest {
            model: &self.cfg.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Msg {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: TEMPERATURE,
        };

        let resp = self
            .http
            .post(self.cfg.endpoint())
            .bearer_auth(api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| self.map_reqwest(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body: String = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(SummaryFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| self.map_reqwest(e))?;
        let body: ChatResponse = serde_json::from_slice(&bytes)
            .map_err(|e| SummaryFailure::Malformed(e.to_string()))?;

        let first = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SummaryFailure::Malformed("response contained no choices".into()))?;

        let content = first
            .message
            .and_then(|m| m.content)
            .map(|c| strip_code_fences(&c))
            .unwrap_or_default();
        if content.is_empty() {
            return Err(SummaryFailure::Empty);
        }
        Ok(content)
    }
}

#[async_trait::async_trait]
impl Summarizer for PerplexityClient {
    async fn summarize(&self, entries: &[Entry]) -> SummaryResult {
        match self.call(entries).await {
            Ok(html) => {
                tracing::debug!(model = %self.cfg.model, chars = html.len(), "summary received");
                SummaryResult::Summarized(html)
            }
            Err(f) => SummaryResult::Failed(f),
        }
    }

    fn name(&self) -> &'static str {
        "perplexity"
    }
}
