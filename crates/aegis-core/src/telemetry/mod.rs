//! Telemetry domain: gauge parsing, samples, and the chart window.

pub mod chart;
pub mod sample;
pub mod value;

pub use chart::{ChartPoint, ChartSeries};
pub use sample::{MetricSample, RawMetrics, SyntheticRange};
pub use value::{GaugeKind, GaugeValue, RawReading, normalize, parse_reading};
