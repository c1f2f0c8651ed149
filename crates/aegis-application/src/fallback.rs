//! Fallback decoration of the telemetry strategy.
//!
//! `fetch_metrics()` is a fallible strategy; `FallbackSampler` decorates it
//! so acquisition itself never fails: any transient error is swallowed and
//! replaced by a synthesized sample marked as such. The pure normalization
//! logic stays in `aegis-core`, testable without I/O.

use std::sync::Arc;

use async_trait::async_trait;

use aegis_core::backend::TelemetrySource;
use aegis_core::error::Result;
use aegis_core::telemetry::MetricSample;

/// Wraps a telemetry source, substituting synthetic data on failure.
pub struct FallbackSampler {
    inner: Arc<dyn TelemetrySource>,
}

impl FallbackSampler {
    pub fn new(inner: Arc<dyn TelemetrySource>) -> Self {
        Self { inner }
    }

    /// Acquires one sample. Infallible: a source failure yields a
    /// synthesized sample with `synthetic = true`.
    pub async fn acquire(&self) -> MetricSample {
        match self.inner.fetch_metrics().await {
            Ok(sample) => sample,
            Err(err) => {
                tracing::debug!(error = %err, "telemetry fetch failed, synthesizing sample");
                MetricSample::synthesize()
            }
        }
    }
}

#[async_trait]
impl TelemetrySource for FallbackSampler {
    async fn fetch_metrics(&self) -> Result<MetricSample> {
        Ok(self.acquire().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::error::AegisError;
    use aegis_core::telemetry::{GaugeValue, RawMetrics, RawReading};

    struct FixedSource;

    #[async_trait]
    impl TelemetrySource for FixedSource {
        async fn fetch_metrics(&self) -> Result<MetricSample> {
            let raw = RawMetrics {
                cpu: Some(RawReading::Number(24.5)),
                memory: Some(RawReading::Number(48.2)),
                ..RawMetrics::default()
            };
            Ok(MetricSample::from_raw(&raw))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl TelemetrySource for FailingSource {
        async fn fetch_metrics(&self) -> Result<MetricSample> {
            Err(AegisError::timeout("metrics poll"))
        }
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let sampler = FallbackSampler::new(Arc::new(FixedSource));
        let sample = sampler.acquire().await;

        assert!(!sample.synthetic);
        assert_eq!(sample.cpu, GaugeValue::Reading(24.5));
    }

    #[tokio::test]
    async fn test_failure_synthesizes() {
        let sampler = FallbackSampler::new(Arc::new(FailingSource));
        let sample = sampler.acquire().await;

        assert!(sample.synthetic);
        assert!(sample.cpu.is_available());
    }
}
