//! Per-name rating boundaries.
//!
//! Each metric name carries a fixed pair of upper bounds following the
//! published web-vitals guidance: values at or below `good` rate good,
//! values at or below `poor` rate needs-improvement, everything above
//! rates poor. Navigation and size bounds mirror the vitals scheme so a
//! single classification path covers the whole vocabulary.

use crate::name::MetricName;
use crate::record::Rating;

/// Upper bounds for the two acceptable rating tiers.
///
/// Both bounds are inclusive. `good < poor` holds for every entry in the
/// built-in table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Highest value that still rates [`Rating::Good`].
    pub good: f64,
    /// Highest value that still rates [`Rating::NeedsImprovement`].
    pub poor: f64,
}

impl Thresholds {
    pub const fn new(good: f64, poor: f64) -> Self {
        Self { good, poor }
    }

    /// Classify a value against these bounds.
    pub fn rate(&self, value: f64) -> Rating {
        if value <= self.good {
            Rating::Good
        } else if value <= self.poor {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }
}

impl MetricName {
    /// The rating bounds for this metric, in its own unit.
    ///
    /// Durations are bounded in milliseconds, transfer sizes in kilobytes,
    /// and layout shift as a bare score.
    pub fn thresholds(self) -> Thresholds {
        match self {
            MetricName::Cls => Thresholds::new(0.1, 0.25),
            MetricName::Fid => Thresholds::new(100.0, 300.0),
            MetricName::Lcp => Thresholds::new(2500.0, 4000.0),
            MetricName::Ttfb => Thresholds::new(800.0, 1800.0),
            MetricName::Fcp => Thresholds::new(1800.0, 3000.0),
            MetricName::DnsLookup => Thresholds::new(50.0, 100.0),
            MetricName::TcpConnection => Thresholds::new(50.0, 150.0),
            MetricName::ServerResponse => Thresholds::new(200.0, 600.0),
            MetricName::DomContentLoaded => Thresholds::new(100.0, 300.0),
            MetricName::JavaScriptSize
            | MetricName::CssSize
            | MetricName::ImagesSize
            | MetricName::FontsSize
            | MetricName::OtherSize => Thresholds::new(100.0, 300.0),
        }
    }
}
