//! Extraction of numeric readings from heterogeneous metric encodings.
//!
//! The telemetry endpoint returns each gauge either as a plain number or as
//! an annotated instant-vector string such as
//! `{instance="node"} => 6.770548 @[1712345678]`. Parsing never fails:
//! anything that cannot be read degrades to [`GaugeValue::Unavailable`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches the first floating-point token following the `=>` marker.
static READING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"=>\s*([0-9]+(?:\.[0-9]+)?)").expect("reading pattern is valid")
});

/// A raw gauge reading as found on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawReading {
    /// Already numeric.
    Number(f64),
    /// Annotated string, e.g. `"cpu => 24.5 @[1712345678]"`.
    Text(String),
}

/// A parsed gauge value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GaugeValue {
    /// A finite reading.
    Reading(f64),
    /// The reading was absent or malformed.
    Unavailable,
}

impl GaugeValue {
    /// Returns the contained reading, or `fallback` when unavailable.
    pub fn unwrap_or(self, fallback: f64) -> f64 {
        match self {
            GaugeValue::Reading(v) => v,
            GaugeValue::Unavailable => fallback,
        }
    }

    /// Returns the contained reading, if any.
    pub fn value(self) -> Option<f64> {
        match self {
            GaugeValue::Reading(v) => Some(v),
            GaugeValue::Unavailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, GaugeValue::Reading(_))
    }

    /// Formats the reading with one decimal place, or `n/a` when
    /// unavailable.
    pub fn display(self) -> String {
        match self {
            GaugeValue::Reading(v) => format!("{v:.1}"),
            GaugeValue::Unavailable => "n/a".to_string(),
        }
    }
}

/// The unit family of a gauge, which decides normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeKind {
    /// cpu/memory/disk usage in percent; ratio-rescaled and clamped.
    Percent,
    /// Request latency in milliseconds; passed through.
    Latency,
    /// Requests per second; passed through.
    Throughput,
}

/// Extracts a numeric reading from a raw encoding.
///
/// Numbers are used directly if finite. Strings yield the first
/// floating-point token after a `=>` marker. Everything else is
/// `Unavailable`. This function never panics and never errors.
pub fn parse_reading(raw: Option<&RawReading>) -> GaugeValue {
    match raw {
        Some(RawReading::Number(n)) if n.is_finite() => GaugeValue::Reading(*n),
        Some(RawReading::Text(s)) => READING_RE
            .captures(s)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map(GaugeValue::Reading)
            .unwrap_or(GaugeValue::Unavailable),
        _ => GaugeValue::Unavailable,
    }
}

/// Normalizes a parsed reading for its gauge kind.
///
/// Percentage-kind values below 1.0 are interpreted as ratios and rescaled
/// by 100 — a domain heuristic for idle-system readings, not a general
/// numeric law — then clamped to `[0, 100]`. Latency and throughput pass
/// through untouched.
pub fn normalize(kind: GaugeKind, value: GaugeValue) -> GaugeValue {
    let GaugeValue::Reading(v) = value else {
        return GaugeValue::Unavailable;
    };

    match kind {
        GaugeKind::Percent => {
            let scaled = if v < 1.0 { v * 100.0 } else { v };
            GaugeValue::Reading(scaled.clamp(0.0, 100.0))
        }
        GaugeKind::Latency | GaugeKind::Throughput => GaugeValue::Reading(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_input_is_used_directly() {
        assert_eq!(
            parse_reading(Some(&RawReading::Number(42.5))),
            GaugeValue::Reading(42.5)
        );
    }

    #[test]
    fn test_annotated_string_extracts_float_after_marker() {
        let raw = RawReading::Text(
            "{instance=\"node-1\"} => 6.770548582702207 @[1712345678.2]".to_string(),
        );
        assert_eq!(
            parse_reading(Some(&raw)),
            GaugeValue::Reading(6.770548582702207)
        );
    }

    #[test]
    fn test_integer_token_after_marker() {
        let raw = RawReading::Text("cpu => 42 @[1712345678]".to_string());
        assert_eq!(parse_reading(Some(&raw)), GaugeValue::Reading(42.0));
    }

    #[test]
    fn test_first_match_wins_with_multiple_markers() {
        let raw = RawReading::Text("a => 1.5 @[0], b => 9.9 @[0]".to_string());
        assert_eq!(parse_reading(Some(&raw)), GaugeValue::Reading(1.5));
    }

    #[test]
    fn test_malformed_input_degrades_to_unavailable() {
        for text in ["", "no marker here", "=>", "=> not-a-number", "cpu: 42"] {
            let raw = RawReading::Text(text.to_string());
            assert_eq!(parse_reading(Some(&raw)), GaugeValue::Unavailable, "{text:?}");
        }
    }

    #[test]
    fn test_absent_input_is_unavailable() {
        assert_eq!(parse_reading(None), GaugeValue::Unavailable);
    }

    #[test]
    fn test_non_finite_number_is_unavailable() {
        assert_eq!(
            parse_reading(Some(&RawReading::Number(f64::NAN))),
            GaugeValue::Unavailable
        );
        assert_eq!(
            parse_reading(Some(&RawReading::Number(f64::INFINITY))),
            GaugeValue::Unavailable
        );
    }

    #[test]
    fn test_ratio_rescaled_to_percent() {
        // 0.067 parses below 1.0, so it is read as a ratio
        let normalized = normalize(GaugeKind::Percent, GaugeValue::Reading(0.067));
        let GaugeValue::Reading(v) = normalized else {
            panic!("expected a reading");
        };
        assert!((v - 6.7).abs() < 1e-9);
    }

    #[test]
    fn test_percent_clamped_to_bounds() {
        assert_eq!(
            normalize(GaugeKind::Percent, GaugeValue::Reading(173.0)),
            GaugeValue::Reading(100.0)
        );
        assert_eq!(
            normalize(GaugeKind::Percent, GaugeValue::Reading(55.2)),
            GaugeValue::Reading(55.2)
        );
    }

    #[test]
    fn test_latency_and_throughput_pass_through() {
        assert_eq!(
            normalize(GaugeKind::Latency, GaugeValue::Reading(0.25)),
            GaugeValue::Reading(0.25)
        );
        assert_eq!(
            normalize(GaugeKind::Throughput, GaugeValue::Reading(350.0)),
            GaugeValue::Reading(350.0)
        );
    }

    #[test]
    fn test_normalize_preserves_unavailable() {
        assert_eq!(
            normalize(GaugeKind::Percent, GaugeValue::Unavailable),
            GaugeValue::Unavailable
        );
    }

    #[test]
    fn test_untagged_deserialization() {
        let number: RawReading = serde_json::from_str("12.5").unwrap();
        assert_eq!(number, RawReading::Number(12.5));

        let text: RawReading = serde_json::from_str("\"cpu => 12.5 @[0]\"").unwrap();
        assert_eq!(text, RawReading::Text("cpu => 12.5 @[0]".to_string()));
    }
}
