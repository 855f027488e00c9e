use std::fmt;
use std::sync::Mutex;

use serde::Serialize;

/// Why an input was dropped without producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingCallSign,
    MissingCoordinates,
    UnparseableCoordinates,
    MalformedAirportLine,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MissingCallSign => "missing call sign",
            Self::MissingCoordinates => "missing coordinates",
            Self::UnparseableCoordinates => "unparseable coordinates",
            Self::MalformedAirportLine => "malformed airport line",
        };
        f.write_str(label)
    }
}

/// Point-in-time copy of the pipeline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub processed: usize,
    pub matched: usize,
    pub missing_call_sign: usize,
    pub missing_coordinates: usize,
    pub unparseable_coordinates: usize,
    pub malformed_airport_lines: usize,
    pub enrichment_misses: usize,
}

impl MetricsSnapshot {
    pub fn skipped_records(&self) -> usize {
        self.missing_call_sign + self.missing_coordinates + self.unparseable_coordinates
    }
}

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_processed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.processed += 1;
        }
    }

    pub fn record_matches(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.matched += count;
        }
    }

    pub fn record_skip(&self, reason: SkipReason) {
        self.record_skips(reason, 1);
    }

    pub fn record_skips(&self, reason: SkipReason, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            match reason {
                SkipReason::MissingCallSign => metrics.missing_call_sign += count,
                SkipReason::MissingCoordinates => metrics.missing_coordinates += count,
                SkipReason::UnparseableCoordinates => metrics.unparseable_coordinates += count,
                SkipReason::MalformedAirportLine => metrics.malformed_airport_lines += count,
            }
        }
    }

    pub fn record_enrichment_misses(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.enrichment_misses += count;
        }
    }

    /// Folds another recorder's counts into this one.
    pub fn absorb(&self, other: &MetricsSnapshot) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.processed += other.processed;
            metrics.matched += other.matched;
            metrics.missing_call_sign += other.missing_call_sign;
            metrics.missing_coordinates += other.missing_coordinates;
            metrics.unparseable_coordinates += other.unparseable_coordinates;
            metrics.malformed_airport_lines += other.malformed_airport_lines;
            metrics.enrichment_misses += other.enrichment_misses;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
