//! The fixed metric vocabulary.
//!
//! Every record in the store is keyed by a `MetricName`. The vocabulary is
//! closed: five web-vitals signals, four navigation-phase durations, and one
//! transfer-size entry per resource category. Names serialize as their
//! canonical labels (`"CLS"`, `"DNS Lookup"`, `"JavaScript Size"`, ...) so
//! downstream consumers see the same identifiers the store uses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a metric's value measures.
///
/// The unit is a property of the name: duration metrics carry milliseconds,
/// resource metrics carry kilobytes, and layout instability is a bare score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Milliseconds,
    Kilobytes,
    Score,
}

impl Unit {
    /// Display suffix for rendering values (empty for bare scores).
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Milliseconds => "ms",
            Unit::Kilobytes => "KB",
            Unit::Score => "",
        }
    }
}

/// Identifier of a measured quantity.
///
/// Declaration order is the canonical vocabulary order; `Ord` follows it, so
/// sorted views list vitals first, then navigation phases, then sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricName {
    /// Cumulative layout shift (unitless instability score).
    #[serde(rename = "CLS")]
    Cls,
    /// First input delay.
    #[serde(rename = "FID")]
    Fid,
    /// Largest contentful paint.
    #[serde(rename = "LCP")]
    Lcp,
    /// Time to first byte.
    #[serde(rename = "TTFB")]
    Ttfb,
    /// First contentful paint.
    #[serde(rename = "FCP")]
    Fcp,
    #[serde(rename = "DNS Lookup")]
    DnsLookup,
    #[serde(rename = "TCP Connection")]
    TcpConnection,
    /// Time to first byte measured from request start.
    #[serde(rename = "Server Response")]
    ServerResponse,
    #[serde(rename = "DOM Content Loaded")]
    DomContentLoaded,
    #[serde(rename = "JavaScript Size")]
    JavaScriptSize,
    #[serde(rename = "CSS Size")]
    CssSize,
    #[serde(rename = "Images Size")]
    ImagesSize,
    #[serde(rename = "Fonts Size")]
    FontsSize,
    #[serde(rename = "Other Size")]
    OtherSize,
}

impl MetricName {
    /// Canonical label, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricName::Cls => "CLS",
            MetricName::Fid => "FID",
            MetricName::Lcp => "LCP",
            MetricName::Ttfb => "TTFB",
            MetricName::Fcp => "FCP",
            MetricName::DnsLookup => "DNS Lookup",
            MetricName::TcpConnection => "TCP Connection",
            MetricName::ServerResponse => "Server Response",
            MetricName::DomContentLoaded => "DOM Content Loaded",
            MetricName::JavaScriptSize => "JavaScript Size",
            MetricName::CssSize => "CSS Size",
            MetricName::ImagesSize => "Images Size",
            MetricName::FontsSize => "Fonts Size",
            MetricName::OtherSize => "Other Size",
        }
    }

    /// The unit of this metric's values.
    pub fn unit(self) -> Unit {
        match self {
            MetricName::Cls => Unit::Score,
            MetricName::JavaScriptSize
            | MetricName::CssSize
            | MetricName::ImagesSize
            | MetricName::FontsSize
            | MetricName::OtherSize => Unit::Kilobytes,
            _ => Unit::Milliseconds,
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five asynchronously delivered user-experience signals.
///
/// Each maps 1:1 onto a `MetricName`; the separate enum keeps the vitals
/// subscription surface from accepting navigation or size names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VitalSignal {
    Cls,
    Fid,
    Lcp,
    Ttfb,
    Fcp,
}

impl VitalSignal {
    /// The store name this signal's observations are recorded under.
    pub fn metric_name(self) -> MetricName {
        match self {
            VitalSignal::Cls => MetricName::Cls,
            VitalSignal::Fid => MetricName::Fid,
            VitalSignal::Lcp => MetricName::Lcp,
            VitalSignal::Ttfb => MetricName::Ttfb,
            VitalSignal::Fcp => MetricName::Fcp,
        }
    }
}

impl fmt::Display for VitalSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metric_name().as_str())
    }
}

/// Resource bucket derived from a fetched URL's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceCategory {
    JavaScript,
    Css,
    Images,
    Fonts,
    Other,
}

impl ResourceCategory {
    /// All categories, in vocabulary order.
    pub const ALL: [ResourceCategory; 5] = [
        ResourceCategory::JavaScript,
        ResourceCategory::Css,
        ResourceCategory::Images,
        ResourceCategory::Fonts,
        ResourceCategory::Other,
    ];

    /// Classify a resource URL by its final dot-suffix, lowercased.
    ///
    /// The suffix is everything after the last `.` in the raw URL; query
    /// strings are not stripped, so `app.js?v=3` lands in `Other`. URLs
    /// without a recognized suffix land in `Other` as well.
    pub fn from_url(url: &str) -> Self {
        let extension = url.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
        match extension.as_str() {
            "js" => ResourceCategory::JavaScript,
            "css" => ResourceCategory::Css,
            "jpg" | "jpeg" | "png" | "gif" | "svg" | "webp" => ResourceCategory::Images,
            "woff" | "woff2" | "ttf" | "eot" => ResourceCategory::Fonts,
            _ => ResourceCategory::Other,
        }
    }

    /// The transfer-size metric this category accumulates into.
    pub fn metric_name(self) -> MetricName {
        match self {
            ResourceCategory::JavaScript => MetricName::JavaScriptSize,
            ResourceCategory::Css => MetricName::CssSize,
            ResourceCategory::Images => MetricName::ImagesSize,
            ResourceCategory::Fonts => MetricName::FontsSize,
            ResourceCategory::Other => MetricName::OtherSize,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceCategory::JavaScript => "JavaScript",
            ResourceCategory::Css => "CSS",
            ResourceCategory::Images => "Images",
            ResourceCategory::Fonts => "Fonts",
            ResourceCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
