//! Trait seams for the external backend collaborators.
//!
//! The HTTP implementations live in `aegis-interaction`; tests substitute
//! in-memory mocks. The three concerns are separate traits so the metrics
//! strategy can be decorated (fallback layer) without dragging chat along.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::telemetry::MetricSample;

/// Action tag marking a chat reply payload as an executable query.
pub const ACTION_QUERY: &str = "QUERY";

/// Body of a `POST /api/chat` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub context_tag: String,
    pub history: Vec<String>,
}

/// A classified reply from the inference service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Declared action type, e.g. `"QUERY"` or `"EXPLAIN"`.
    pub action: String,
    /// Narrative markdown or a raw query, depending on `action`.
    pub payload: String,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
}

impl ChatReply {
    /// Whether the payload should be rendered as a query code block.
    pub fn is_query(&self) -> bool {
        self.action == ACTION_QUERY
    }

    /// Confidence as a whole percentage, for log display.
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// One-shot liveness probe of the backend.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Resolves `Ok` when the backend is reachable and healthy.
    async fn probe(&self) -> Result<()>;
}

/// Source of the current gauge readings.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetches and normalizes one sample of the fixed gauge set.
    async fn fetch_metrics(&self) -> Result<MetricSample>;
}

/// The conversational inference service.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends a prompt with threaded history and returns the classified
    /// reply.
    async fn send_chat(&self, request: ChatRequest) -> Result<ChatReply>;
}
