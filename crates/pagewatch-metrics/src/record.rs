//! Classified metric observations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::MetricName;

/// Three-tier quality classification of a metric value.
///
/// Variants are ordered from best to worst, so `max()` over a set of
/// ratings yields the most degraded tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    /// Canonical label, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::NeedsImprovement => "needs-improvement",
            Rating::Poor => "poor",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified observation, as held by the store.
///
/// The rating is computed once at record time from the name's threshold
/// pair and never recomputed, so a record re-read later still reports the
/// classification it was given when observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Which quantity was measured.
    pub name: MetricName,
    /// Measured value in the name's unit (ms, KB, or bare score).
    pub value: f64,
    /// Tier assigned from the name's thresholds at record time.
    pub rating: Rating,
    /// Milliseconds since the Unix epoch when the observation was recorded.
    pub timestamp_ms: u64,
}

impl MetricRecord {
    /// Build a record, deriving the rating from the name's threshold pair.
    pub fn classify(name: MetricName, value: f64, timestamp_ms: u64) -> Self {
        Self {
            name,
            value,
            rating: name.thresholds().rate(value),
            timestamp_ms,
        }
    }
}
