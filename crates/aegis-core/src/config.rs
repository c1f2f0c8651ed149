//! Console configuration.
//!
//! All knobs of the session core live here so the CLI, the backend client
//! and the tests agree on one source of defaults. Every field carries a
//! serde default, so a partial TOML file (or none at all) is valid.

use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

/// Default backend address when neither flag, env var nor config file
/// provides one.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Configuration for a console session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the backend serving `/health`, `/api/metrics` and
    /// `/api/chat`.
    pub backend_url: String,
    /// Context tag forwarded with every chat request.
    pub context_tag: String,
    /// Interval between metrics polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Deadline for the one-shot health probe, in milliseconds.
    pub probe_timeout_ms: u64,
    /// Deadline for a single metrics poll, in milliseconds.
    pub metrics_timeout_ms: u64,
    /// Deadline for a chat dispatch, in milliseconds.
    pub chat_timeout_ms: u64,
    /// Artificial latency of demo-mode responses, in milliseconds.
    pub demo_delay_ms: u64,
    /// Maximum number of points retained in the chart series.
    pub chart_window: usize,
    /// Maximum number of entries retained per log channel.
    pub log_capacity: usize,
    /// Maximum number of turn strings forwarded to the backend per chat
    /// request. Stored history is unbounded; only the forwarded slice is
    /// capped.
    pub history_forward_limit: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            context_tag: "Aegis Console".to_string(),
            poll_interval_ms: 3000,
            probe_timeout_ms: 3000,
            metrics_timeout_ms: 2000,
            chat_timeout_ms: 30_000,
            demo_delay_ms: 800,
            chart_window: 30,
            log_capacity: 50,
            history_forward_limit: 40,
        }
    }
}

impl ConsoleConfig {
    /// Parses a configuration from TOML text. Missing fields fall back to
    /// their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ConsoleConfig = toml::from_str(text)?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn metrics_timeout(&self) -> Duration {
        Duration::from_millis(self.metrics_timeout_ms)
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_millis(self.chat_timeout_ms)
    }

    pub fn demo_delay(&self) -> Duration {
        Duration::from_millis(self.demo_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.poll_interval(), Duration::from_millis(3000));
        assert_eq!(config.probe_timeout(), Duration::from_millis(3000));
        assert_eq!(config.metrics_timeout(), Duration::from_millis(2000));
        assert_eq!(config.chat_timeout(), Duration::from_millis(30_000));
        assert_eq!(config.chart_window, 30);
        assert_eq!(config.log_capacity, 50);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = ConsoleConfig::from_toml_str(
            r#"
            backend_url = "http://aegis.internal:9090"
            poll_interval_ms = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.backend_url, "http://aegis.internal:9090");
        assert_eq!(config.poll_interval_ms, 5000);
        // Untouched fields keep their defaults
        assert_eq!(config.chat_timeout_ms, 30_000);
        assert_eq!(config.history_forward_limit, 40);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(ConsoleConfig::from_toml_str("backend_url = 42").is_err());
    }
}
