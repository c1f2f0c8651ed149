//! HttpBackend - REST client for the Aegis observability backend.
//!
//! Implements the three backend trait seams against a single base URL:
//! `GET /health` for the liveness probe, `GET /api/metrics` for gauge
//! readings, `POST /api/chat` for inference. Each operation carries its own
//! request timeout from the console configuration.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use aegis_core::backend::{ChatBackend, ChatReply, ChatRequest, HealthProbe, TelemetrySource};
use aegis_core::config::ConsoleConfig;
use aegis_core::error::{AegisError, Result};
use aegis_core::telemetry::{MetricSample, RawMetrics};

/// REST implementation of the backend collaborators.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    probe_timeout: Duration,
    metrics_timeout: Duration,
    chat_timeout: Duration,
}

impl HttpBackend {
    /// Creates a backend client from the console configuration.
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            probe_timeout: config.probe_timeout(),
            metrics_timeout: config.metrics_timeout(),
            chat_timeout: config.chat_timeout(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(err: reqwest::Error, operation: &'static str) -> AegisError {
        if err.is_timeout() {
            AegisError::timeout(operation)
        } else {
            AegisError::backend(format!("{operation} failed: {err}"))
        }
    }
}

#[async_trait]
impl HealthProbe for HttpBackend {
    async fn probe(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, "health probe"))?;

        if !response.status().is_success() {
            return Err(AegisError::backend(format!(
                "health probe returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl TelemetrySource for HttpBackend {
    async fn fetch_metrics(&self) -> Result<MetricSample> {
        let url = format!("{}/api/metrics", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(self.metrics_timeout)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, "metrics poll"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AegisError::backend(format!(
                "metrics endpoint returned status {status}"
            )));
        }

        let raw = response
            .json::<RawMetrics>()
            .await
            .map_err(|e| AegisError::backend(format!("failed to parse metrics body: {e}")))?;

        Ok(MetricSample::from_raw(&raw))
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_chat(&self, request: ChatRequest) -> Result<ChatReply> {
        let url = format!("{}/api/chat", self.base_url);

        tracing::debug!(prompt_len = request.prompt.len(), "dispatching chat request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .timeout(self.chat_timeout)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, "chat dispatch"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AegisError::backend(format!(
                "chat endpoint returned status {status}: {body}"
            )));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| AegisError::backend(format!("failed to parse chat reply: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let config = ConsoleConfig {
            backend_url: "http://localhost:8080/".to_string(),
            ..ConsoleConfig::default()
        };
        let backend = HttpBackend::new(&config);
        assert_eq!(backend.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_probe_against_unreachable_backend_is_transient() {
        // Reserved TEST-NET-1 address: connection refused or timeout, never
        // a panic
        let config = ConsoleConfig {
            backend_url: "http://192.0.2.1:1".to_string(),
            probe_timeout_ms: 50,
            ..ConsoleConfig::default()
        };
        let backend = HttpBackend::new(&config);

        let err = backend.probe().await.unwrap_err();
        assert!(err.is_transient());
    }
}
