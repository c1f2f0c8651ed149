//! Metric samples and their wire representation.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::value::{GaugeKind, GaugeValue, RawReading, normalize, parse_reading};

/// Inclusive range a synthetic gauge value is drawn from when the telemetry
/// source is unreachable.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticRange {
    pub low: f64,
    pub high: f64,
}

impl SyntheticRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Whether a value falls inside this range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Plausible degraded-mode ranges per gauge.
pub const SYNTHETIC_CPU: SyntheticRange = SyntheticRange::new(20.0, 35.0);
pub const SYNTHETIC_MEMORY: SyntheticRange = SyntheticRange::new(40.0, 60.0);
pub const SYNTHETIC_DISK: SyntheticRange = SyntheticRange::new(42.0, 48.0);
pub const SYNTHETIC_LATENCY: SyntheticRange = SyntheticRange::new(30.0, 120.0);
pub const SYNTHETIC_RPS: SyntheticRange = SyntheticRange::new(2.0, 10.0);

/// The `/api/metrics` response body: one entry per gauge, each either a
/// number or an annotated string. Unknown keys are ignored; missing keys
/// parse to unavailable gauges.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetrics {
    pub cpu: Option<RawReading>,
    pub memory: Option<RawReading>,
    pub disk: Option<RawReading>,
    pub latency: Option<RawReading>,
    pub rps: Option<RawReading>,
}

/// The current reading of the fixed gauge set.
///
/// A sample is replaced wholesale on every poll tick and never partially
/// mutated. `synthetic` marks degraded-mode data so it can never masquerade
/// as a live reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// CPU usage in percent.
    pub cpu: GaugeValue,
    /// Memory usage in percent.
    pub memory: GaugeValue,
    /// Disk usage in percent.
    pub disk: GaugeValue,
    /// Request latency in milliseconds.
    pub latency: GaugeValue,
    /// Requests per second.
    pub rps: GaugeValue,
    /// When this sample was captured.
    pub captured_at: DateTime<Utc>,
    /// True when the values were synthesized instead of fetched.
    pub synthetic: bool,
}

impl MetricSample {
    /// Builds a normalized sample from a wire payload.
    ///
    /// Every field runs through the value parser; percentage-kind gauges
    /// are ratio-rescaled and clamped to `[0, 100]`.
    pub fn from_raw(raw: &RawMetrics) -> Self {
        Self {
            cpu: normalize(GaugeKind::Percent, parse_reading(raw.cpu.as_ref())),
            memory: normalize(GaugeKind::Percent, parse_reading(raw.memory.as_ref())),
            disk: normalize(GaugeKind::Percent, parse_reading(raw.disk.as_ref())),
            latency: normalize(GaugeKind::Latency, parse_reading(raw.latency.as_ref())),
            rps: normalize(GaugeKind::Throughput, parse_reading(raw.rps.as_ref())),
            captured_at: Utc::now(),
            synthetic: false,
        }
    }

    /// Synthesizes a substitute sample from the per-gauge plausible ranges.
    pub fn synthesize() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            cpu: GaugeValue::Reading(rng.gen_range(SYNTHETIC_CPU.low..=SYNTHETIC_CPU.high)),
            memory: GaugeValue::Reading(
                rng.gen_range(SYNTHETIC_MEMORY.low..=SYNTHETIC_MEMORY.high),
            ),
            disk: GaugeValue::Reading(rng.gen_range(SYNTHETIC_DISK.low..=SYNTHETIC_DISK.high)),
            latency: GaugeValue::Reading(
                rng.gen_range(SYNTHETIC_LATENCY.low..=SYNTHETIC_LATENCY.high),
            ),
            rps: GaugeValue::Reading(rng.gen_range(SYNTHETIC_RPS.low..=SYNTHETIC_RPS.high)),
            captured_at: Utc::now(),
            synthetic: true,
        }
    }

    /// An all-unavailable sample, used before the first poll completes.
    pub fn empty() -> Self {
        Self {
            cpu: GaugeValue::Unavailable,
            memory: GaugeValue::Unavailable,
            disk: GaugeValue::Unavailable,
            latency: GaugeValue::Unavailable,
            rps: GaugeValue::Unavailable,
            captured_at: Utc::now(),
            synthetic: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_normalizes_every_field() {
        let raw: RawMetrics = serde_json::from_str(
            r#"{
                "cpu": "{mode=\"idle\"} => 0.067 @[1712345678]",
                "memory": "mem => 48.2 @[1712345678]",
                "disk": 64.0,
                "latency": "lat => 0.25 @[1712345678]",
                "rps": 12.0,
                "timestamp": 1712345678
            }"#,
        )
        .unwrap();

        let sample = MetricSample::from_raw(&raw);

        // Ratio below 1.0 rescaled to percent
        let GaugeValue::Reading(cpu) = sample.cpu else {
            panic!("cpu should parse");
        };
        assert!((cpu - 6.7).abs() < 1e-9);

        assert_eq!(sample.memory, GaugeValue::Reading(48.2));
        assert_eq!(sample.disk, GaugeValue::Reading(64.0));
        // Latency is not a percentage: no rescale
        assert_eq!(sample.latency, GaugeValue::Reading(0.25));
        assert_eq!(sample.rps, GaugeValue::Reading(12.0));
        assert!(!sample.synthetic);
    }

    #[test]
    fn test_from_raw_with_missing_fields() {
        let raw: RawMetrics = serde_json::from_str(r#"{"cpu": 24.5}"#).unwrap();
        let sample = MetricSample::from_raw(&raw);

        assert_eq!(sample.cpu, GaugeValue::Reading(24.5));
        assert_eq!(sample.memory, GaugeValue::Unavailable);
        assert_eq!(sample.rps, GaugeValue::Unavailable);
    }

    #[test]
    fn test_synthesized_values_stay_in_range() {
        for _ in 0..100 {
            let sample = MetricSample::synthesize();
            assert!(sample.synthetic);
            assert!(SYNTHETIC_CPU.contains(sample.cpu.unwrap_or(-1.0)));
            assert!(SYNTHETIC_MEMORY.contains(sample.memory.unwrap_or(-1.0)));
            assert!(SYNTHETIC_DISK.contains(sample.disk.unwrap_or(-1.0)));
            assert!(SYNTHETIC_LATENCY.contains(sample.latency.unwrap_or(-1.0)));
            assert!(SYNTHETIC_RPS.contains(sample.rps.unwrap_or(-1.0)));
        }
    }
}
