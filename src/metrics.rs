//! Latency histograms for completion calls, chat replies, translations and
//! speech starts, summarized as p50/p95/p99 at `/api/metrics`.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::Serialize;

/// Samples kept per metric; older ones fall off.
const WINDOW: usize = 1024;

/// Well-known metric names.
pub mod metric_names {
    pub const COMPLETION_ROUNDTRIP: &str = "t_completion_roundtrip";
    pub const CHAT_REPLY: &str = "t_chat_reply";
    pub const TRANSLATE_DONE: &str = "t_translate_done";
    pub const SPEECH_START: &str = "t_speech_start";
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricSummary {
    pub p50_us: f64,
    pub p95_us: f64,
    pub p99_us: f64,
    pub count: usize,
}

#[derive(Default)]
pub struct MetricsRegistry {
    windows: Mutex<HashMap<&'static str, VecDeque<f64>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample (in microseconds) for the named metric.
    pub fn record(&self, name: &'static str, value_us: f64) {
        let mut windows = self.windows.lock();
        let window = windows.entry(name).or_default();
        if window.len() == WINDOW {
            window.pop_front();
        }
        window.push_back(value_us);
        tracing::trace!(metric = name, value_us, "metric_recorded");
    }

    /// Start timing; the sample is recorded when the span is finished.
    pub fn span(self: &Arc<Self>, name: &'static str) -> TimingSpan {
        TimingSpan {
            name,
            start: Instant::now(),
            registry: Arc::clone(self),
        }
    }

    pub fn summary(&self) -> HashMap<String, MetricSummary> {
        self.windows
            .lock()
            .iter()
            .map(|(&name, window)| {
                let mut sorted: Vec<f64> = window.iter().copied().collect();
                sorted.sort_by(f64::total_cmp);
                let summary = MetricSummary {
                    p50_us: nearest_rank(&sorted, 50.0),
                    p95_us: nearest_rank(&sorted, 95.0),
                    p99_us: nearest_rank(&sorted, 99.0),
                    count: sorted.len(),
                };
                (name.to_string(), summary)
            })
            .collect()
    }
}

fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        n => sorted[((p / 100.0) * (n as f64 - 1.0)).round() as usize],
    }
}

/// Elapsed time from `MetricsRegistry::span` to `finish`.
pub struct TimingSpan {
    name: &'static str,
    start: Instant,
    registry: Arc<MetricsRegistry>,
}

impl TimingSpan {
    /// Record the elapsed microseconds and return them.
    pub fn finish(self) -> f64 {
        let elapsed_us = self.start.elapsed().as_micros() as f64;
        self.registry.record(self.name, elapsed_us);
        elapsed_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_percentiles() {
        let registry = MetricsRegistry::new();
        for v in 1..=100 {
            registry.record(metric_names::CHAT_REPLY, v as f64);
        }
        let summary = &registry.summary()[metric_names::CHAT_REPLY];
        assert_eq!(summary.count, 100);
        assert!((50.0..=51.0).contains(&summary.p50_us));
        assert_eq!(summary.p99_us, 99.0);
    }

    #[test]
    fn window_drops_oldest() {
        let registry = MetricsRegistry::new();
        for v in 0..(WINDOW + 10) {
            registry.record(metric_names::SPEECH_START, v as f64);
        }
        let summary = &registry.summary()[metric_names::SPEECH_START];
        assert_eq!(summary.count, WINDOW);
        assert!(summary.p50_us >= 10.0);
    }

    #[test]
    fn span_records_on_finish() {
        let registry = Arc::new(MetricsRegistry::new());
        assert!(registry.summary().is_empty());
        registry.span(metric_names::SPEECH_START).finish();
        assert_eq!(registry.summary()[metric_names::SPEECH_START].count, 1);
    }
}
