// src/config/mail.rs
use anyhow::{anyhow, Context, Result};

use super::env_nonempty;
use crate::ingest::sources::split_address_list;

#[derive(Clone)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
    /// Parsed from comma-separated `MAIL_TO`; may be empty when a members CSV supplies recipients.
    pub to: Vec<String>,
}

// Keep the password out of logs.
impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass_len", &self.pass.len())
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

fn required(key: &str) -> Result<String> {
    env_nonempty(key).ok_or_else(|| anyhow!("Missing {key} env var"))
}

impl MailConfig {
    pub fn from_env() -> Result<Self> {
        let port_raw = required("SMTP_PORT")?;
        let port = port_raw
            .parse::<u16>()
            .with_context(|| format!("SMTP_PORT is not a port number: {port_raw}"))?;

        Ok(Self {
            server: required("SMTP_SERVER")?,
            port,
            user: required("SMTP_USER")?,
            pass: required("SMTP_PASS")?,
            from: required("MAIL_FROM")?,
            to: env_nonempty("MAIL_TO")
                .map(|s| split_address_list(&s))
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    const KEYS: [&str; 6] = [
        "SMTP_SERVER",
        "SMTP_PORT",
        "SMTP_USER",
        "SMTP_PASS",
        "MAIL_FROM",
        "MAIL_TO",
    ];

    fn set_all() {
        env::set_var("SMTP_SERVER", "smtp.example.com");
        env::set_var("SMTP_PORT", "465");
        env::set_var("SMTP_USER", "bot@example.com");
        env::set_var("SMTP_PASS", "secret");
        env::set_var("MAIL_FROM", "Digest <bot@example.com>");
        env::set_var("MAIL_TO", "a@example.com, b@example.com,");
    }

    fn clear() {
        for k in KEYS {
            env::remove_var(k);
        }
    }

    #[serial_test::serial]
    #[test]
    fn reads_all_values() {
        set_all();
        let cfg = MailConfig::from_env().unwrap();
        assert_eq!(cfg.server, "smtp.example.com");
        assert_eq!(cfg.port, 465);
        assert_eq!(cfg.to, vec!["a@example.com", "b@example.com"]);
        assert!(!format!("{cfg:?}").contains("secret"));
        clear();
    }

    #[serial_test::serial]
    #[test]
    fn missing_or_bad_values_are_errors() {
        set_all();
        env::remove_var("SMTP_PASS");
        let err = MailConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("SMTP_PASS"));

        set_all();
        env::set_var("SMTP_PORT", "smtps");
        assert!(MailConfig::from_env().is_err());
        clear();
    }
}
