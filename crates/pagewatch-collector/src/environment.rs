//! Host page environment access.
//!
//! The collector never talks to a real page directly; it reads timing data
//! through the [`PageEnvironment`] trait. A detached collector (no
//! environment attached) is the headless case and collects nothing.

use serde::{Deserialize, Serialize};

/// Raw navigation-timing marks for the page load, all epoch-relative
/// milliseconds as reported by the host.
///
/// Only the marks the collector derives durations from are modeled. Missing
/// marks deserialize as `0.0`, which yields zero-length (never negative)
/// spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationTiming {
    pub domain_lookup_start: f64,
    pub domain_lookup_end: f64,
    pub connect_start: f64,
    pub connect_end: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub dom_content_loaded_event_start: f64,
    pub dom_content_loaded_event_end: f64,
}

impl NavigationTiming {
    /// DNS resolution span, clamped at zero.
    pub fn dns_ms(&self) -> f64 {
        span(self.domain_lookup_start, self.domain_lookup_end)
    }

    /// TCP connect span, clamped at zero.
    pub fn tcp_ms(&self) -> f64 {
        span(self.connect_start, self.connect_end)
    }

    /// Request-start to first-response-byte span, clamped at zero.
    pub fn server_response_ms(&self) -> f64 {
        span(self.request_start, self.response_start)
    }

    /// DOMContentLoaded handler span, clamped at zero.
    pub fn dom_content_loaded_ms(&self) -> f64 {
        span(
            self.dom_content_loaded_event_start,
            self.dom_content_loaded_event_end,
        )
    }
}

/// Hosts occasionally report end marks behind start marks; a negative span
/// is meaningless, so it clamps to zero.
fn span(start: f64, end: f64) -> f64 {
    (end - start).max(0.0)
}

/// One fetched resource from the page's resource-timing buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTiming {
    /// Full URL the resource was fetched from.
    pub url: String,
    /// Bytes transferred over the wire. Hosts omit this for cache hits and
    /// opaque cross-origin responses; those count as zero.
    #[serde(default)]
    pub transfer_size: u64,
    /// Total fetch duration.
    #[serde(default)]
    pub duration_ms: f64,
}

/// Read access to a page's timing data.
///
/// Both reads are one-shot snapshots taken during collector init, matching
/// the single read the engine performs. Implementations must tolerate being
/// read exactly once and may be read again by diagnostics.
pub trait PageEnvironment: Send + Sync {
    /// The page-load navigation record, if the host produced one.
    fn navigation(&self) -> Option<NavigationTiming>;

    /// Every resource entry present in the buffer at read time. Resources
    /// fetched after this read are not observed.
    fn resources(&self) -> Vec<ResourceTiming>;
}

/// Environment backed by fixed data. The replay and test binding.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    navigation: Option<NavigationTiming>,
    resources: Vec<ResourceTiming>,
}

impl StaticEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a navigation record.
    pub fn with_navigation(mut self, navigation: NavigationTiming) -> Self {
        self.navigation = Some(navigation);
        self
    }

    /// Attach the resource-timing entries.
    pub fn with_resources(mut self, resources: Vec<ResourceTiming>) -> Self {
        self.resources = resources;
        self
    }
}

impl PageEnvironment for StaticEnvironment {
    fn navigation(&self) -> Option<NavigationTiming> {
        self.navigation
    }

    fn resources(&self) -> Vec<ResourceTiming> {
        self.resources.clone()
    }
}
