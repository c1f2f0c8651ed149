//! Metrics acquisition pipeline.
//!
//! Polls the telemetry source on a fixed interval, keeps the current sample
//! and the sliding chart window, and records pipeline activity in the
//! session log book. Acquisition goes through the fallback sampler, so a
//! failed or timed-out poll degrades to synthetic data instead of an error.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use aegis_core::backend::TelemetrySource;
use aegis_core::logbook::{LogBook, LogChannel, LogLevel};
use aegis_core::telemetry::{ChartPoint, ChartSeries, MetricSample};

use crate::fallback::FallbackSampler;

/// Current metrics state: the latest sample plus the chart window.
#[derive(Debug)]
pub struct MetricsState {
    pub sample: MetricSample,
    pub series: ChartSeries,
}

impl MetricsState {
    pub fn new(chart_window: usize) -> Self {
        Self {
            sample: MetricSample::empty(),
            series: ChartSeries::new(chart_window),
        }
    }
}

/// Periodic poller feeding [`MetricsState`].
pub struct MetricsPipeline {
    sampler: FallbackSampler,
    state: Arc<RwLock<MetricsState>>,
    logs: Arc<RwLock<LogBook>>,
    interval: Duration,
    in_flight: AtomicBool,
}

impl MetricsPipeline {
    pub fn new(
        source: Arc<dyn TelemetrySource>,
        state: Arc<RwLock<MetricsState>>,
        logs: Arc<RwLock<LogBook>>,
        interval: Duration,
    ) -> Self {
        Self {
            sampler: FallbackSampler::new(source),
            state,
            logs,
            interval,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Runs one poll cycle.
    ///
    /// Skipped entirely when a previous poll is still outstanding, so a
    /// tick interval shorter than the round trip never piles up requests.
    /// Otherwise acquires a sample (live or synthetic), replaces the
    /// current one wholesale, logs the outcome, and appends one chart
    /// point.
    pub async fn tick(&self) {
        if self.in_flight.swap(true, Ordering::Acquire) {
            tracing::trace!("metrics poll already in flight, skipping tick");
            return;
        }

        let sample = self.sampler.acquire().await;

        {
            let mut logs = self.logs.write().await;
            if sample.synthetic {
                logs.append(LogChannel::Pipeline, LogLevel::Warn, "Using simulated metrics");
            } else {
                logs.append(
                    LogChannel::Pipeline,
                    LogLevel::Info,
                    format!(
                        "Metrics: CPU {}%, Mem {}%",
                        sample.cpu.display(),
                        sample.memory.display()
                    ),
                );
            }
        }

        {
            let mut state = self.state.write().await;
            state.sample = sample;
            state.series.push(ChartPoint::from_sample(&sample));
        }

        self.in_flight.store(false, Ordering::Release);
    }

    /// Drives ticks until the token is cancelled.
    ///
    /// The first tick fires immediately, so gauges populate without
    /// waiting a full interval.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("metrics pipeline stopped");
                    break;
                }
                _ = ticker.tick() => self.tick().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    use aegis_core::error::{AegisError, Result};
    use aegis_core::telemetry::{GaugeValue, RawMetrics, RawReading};

    /// Telemetry source that can be switched between healthy and failing,
    /// counting every fetch.
    struct ScriptedSource {
        fail: AtomicBool,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn healthy() -> Self {
            Self {
                fail: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: AtomicBool::new(true),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TelemetrySource for ScriptedSource {
        async fn fetch_metrics(&self) -> Result<MetricSample> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(AegisError::timeout("metrics poll"));
            }
            let raw = RawMetrics {
                cpu: Some(RawReading::Text("cpu => 24.5 @[1712345678]".to_string())),
                memory: Some(RawReading::Number(48.2)),
                disk: Some(RawReading::Number(64.0)),
                ..RawMetrics::default()
            };
            Ok(MetricSample::from_raw(&raw))
        }
    }

    fn pipeline_with(source: Arc<ScriptedSource>) -> (Arc<MetricsPipeline>, Arc<RwLock<MetricsState>>, Arc<RwLock<LogBook>>) {
        let state = Arc::new(RwLock::new(MetricsState::new(30)));
        let logs = Arc::new(RwLock::new(LogBook::new(50)));
        let pipeline = Arc::new(MetricsPipeline::new(
            source,
            state.clone(),
            logs.clone(),
            Duration::from_millis(3000),
        ));
        (pipeline, state, logs)
    }

    #[tokio::test]
    async fn test_successful_tick_replaces_sample_and_appends_point() {
        let (pipeline, state, logs) = pipeline_with(Arc::new(ScriptedSource::healthy()));

        pipeline.tick().await;

        let state = state.read().await;
        assert_eq!(state.sample.cpu, GaugeValue::Reading(24.5));
        assert!(!state.sample.synthetic);
        assert_eq!(state.series.len(), 1);

        let logs = logs.read().await;
        assert_eq!(logs.len(LogChannel::Pipeline), 1);
        let entry = logs.entries(LogChannel::Pipeline).next().unwrap();
        assert_eq!(entry.level, LogLevel::Info);
        assert!(entry.message.starts_with("Metrics: CPU 24.5%"));
    }

    #[tokio::test]
    async fn test_failed_tick_synthesizes_and_warns() {
        let (pipeline, state, logs) = pipeline_with(Arc::new(ScriptedSource::failing()));

        pipeline.tick().await;

        let state = state.read().await;
        assert!(state.sample.synthetic);
        // The chart still advances on the degraded path
        assert_eq!(state.series.len(), 1);

        let logs = logs.read().await;
        let entry = logs.entries(LogChannel::Pipeline).next().unwrap();
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.message, "Using simulated metrics");
    }

    #[tokio::test]
    async fn test_chart_window_stays_bounded_over_many_ticks() {
        let (pipeline, state, _logs) = pipeline_with(Arc::new(ScriptedSource::healthy()));

        for _ in 0..40 {
            pipeline.tick().await;
        }

        assert_eq!(state.read().await.series.len(), 30);
    }

    #[tokio::test]
    async fn test_run_stops_on_cancellation() {
        let source = Arc::new(ScriptedSource::healthy());
        let (pipeline, _state, _logs) = pipeline_with(source.clone());

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(pipeline.run(cancel.clone()));

        // Give the immediate first tick a chance to land, then cancel.
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        handle.await.unwrap();

        let polled = source.calls.load(Ordering::SeqCst);
        assert!(polled >= 1);

        // No further polls after cancellation
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), polled);
    }
}
