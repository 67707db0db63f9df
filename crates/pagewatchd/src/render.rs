//! Console rendering for the replay view.
//!
//! Two surfaces: the per-poll metric lines, and the end-of-replay summary
//! block. Everything here builds strings; printing stays in `main`.

use std::collections::HashMap;

use pagewatch_metrics::{MetricName, MetricRecord, Rating, Unit};

/// Tier marker for human-facing lines. The warning emoji renders narrow in
/// most terminals, hence its trailing space.
fn tier_marker(rating: Rating) -> &'static str {
    match rating {
        Rating::Good => "✅",
        Rating::NeedsImprovement => "⚠️ ",
        Rating::Poor => "❌",
    }
}

/// Value with its unit: two decimals for ms and KB, three for bare scores.
pub fn format_value(record: &MetricRecord) -> String {
    match record.name.unit() {
        Unit::Score => format!("{:.3}", record.value),
        unit => format!("{:.2} {}", record.value, unit.suffix()),
    }
}

/// One line per metric for a poll tick: `<label> <value> [<rating>]`.
pub fn format_poll_lines(latest: &[MetricRecord]) -> Vec<String> {
    latest
        .iter()
        .map(|record| {
            format!(
                "{} {} [{}]",
                record.name,
                format_value(record),
                record.rating
            )
        })
        .collect()
}

/// End-of-replay summary: header box plus one marked line per metric, in
/// vocabulary order.
pub fn format_session_summary(metrics: &HashMap<MetricName, Vec<MetricRecord>>) -> String {
    let mut out = String::new();

    let samples: usize = metrics.values().map(Vec::len).sum();
    let mut names: Vec<MetricName> = metrics.keys().copied().collect();
    names.sort();
    let worst = names
        .iter()
        .filter_map(|name| metrics[name].last())
        .map(|record| record.rating)
        .max();

    out.push_str("\n╔══════════════════════════════════════════╗\n");
    out.push_str("║  PageWatch Session Summary               ║\n");
    out.push_str("╠══════════════════════════════════════════╣\n");
    out.push_str(&format!("║  Metrics:  {:<29}║\n", names.len()));
    out.push_str(&format!("║  Samples:  {:<29}║\n", samples));
    out.push_str(&format!(
        "║  Worst:    {:<29}║\n",
        worst.map_or("n/a", Rating::as_str)
    ));
    out.push_str("╚══════════════════════════════════════════╝\n\n");

    for name in names {
        let history = &metrics[&name];
        if let Some(latest) = history.last() {
            out.push_str(&format!(
                "  {} {:<18} {:>12}  ({} sample{})\n",
                tier_marker(latest.rating),
                name,
                format_value(latest),
                history.len(),
                if history.len() == 1 { "" } else { "s" },
            ));
        }
    }

    out
}
