pub mod mail;
pub mod summarizer;

/// Read an env var, treating empty/whitespace-only values as unset.
pub(crate) fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
