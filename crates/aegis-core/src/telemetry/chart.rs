//! The sliding chart window fed by the metrics pipeline.

use std::collections::VecDeque;

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::sample::MetricSample;

/// Chart value substituted when a gauge is unavailable, so the window keeps
/// advancing even on a completely silent backend.
const CHART_CPU_FALLBACK: f64 = 25.0;
const CHART_MEMORY_FALLBACK: f64 = 50.0;

/// One point of the cpu/memory performance chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Display label, formatted `%H:%M:%S`.
    pub time: String,
    pub cpu: f64,
    pub memory: f64,
}

impl ChartPoint {
    /// Derives a point from the current (possibly synthetic) sample.
    pub fn from_sample(sample: &MetricSample) -> Self {
        Self {
            time: Local::now().format("%H:%M:%S").to_string(),
            cpu: sample.cpu.unwrap_or(CHART_CPU_FALLBACK),
            memory: sample.memory.unwrap_or(CHART_MEMORY_FALLBACK),
        }
    }
}

/// A bounded, append-only series retaining its most recent points.
///
/// Invariant: `len() <= window`; appending past the window evicts the
/// oldest point while preserving insertion order of the rest.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    points: VecDeque<ChartPoint>,
    window: usize,
}

impl ChartSeries {
    pub fn new(window: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Appends a point, evicting the oldest past the window bound.
    pub fn push(&mut self, point: ChartPoint) {
        if self.points.len() == self.window {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Points in insertion order, oldest first.
    pub fn points(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for ChartSeries {
    fn default() -> Self {
        Self::new(30)
    }
}
