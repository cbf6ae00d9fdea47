// src/config/summarizer.rs
use super::env_nonempty;

pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
pub const DEFAULT_MODEL: &str = "sonar";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENV_API_KEY: &str = "PERPLEXITY_API_KEY";
pub const ENV_BASE_URL: &str = "PERPLEXITY_BASE_URL";
pub const ENV_MODEL: &str = "PERPLEXITY_MODEL";
pub const ENV_TIMEOUT: &str = "PERPLEXITY_TIMEOUT";

#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// `None` makes every summarize call fail fast (and fall back to headlines).
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SummarizerConfig {
    /// Never fails: a bad optional value is replaced by its default.
    pub fn from_env() -> Self {
        let timeout_secs = match env_nonempty(ENV_TIMEOUT) {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(value = %raw, "invalid {ENV_TIMEOUT}, using {DEFAULT_TIMEOUT_SECS}s");
                    DEFAULT_TIMEOUT_SECS
                }
            },
        };

        let base_url = env_nonempty(ENV_BASE_URL)
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            api_key: env_nonempty(ENV_API_KEY),
            base_url,
            model: env_nonempty(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_secs,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}
