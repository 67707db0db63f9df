//! The collection engine.
//!
//! Owns the drive from raw page signals to classified records in the
//! session store. One collector observes one page session:
//!
//! ```text
//! Collector::init()
//!   ├── subscribe_vitals()    → handler appends for the whole session
//!   ├── observe_navigation()  → one-shot: 4 phase durations
//!   └── observe_resources()   → one-shot: per-category transfer sizes
//!                                         + slow-resource diagnostics
//!
//! every append ──▶ store.append() ──▶ debug mirror (dev only)
//!                                 ──▶ sink offer (spawned, best effort)
//! ```
//!
//! `init` never fails: a missing environment, an unavailable vitals
//! source, or absent timing data each degrade to fewer observations.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, trace, warn};

use pagewatch_metrics::{MetricName, MetricRecord, MetricStore, ResourceCategory};

use crate::config::CollectorConfig;
use crate::environment::{PageEnvironment, ResourceTiming};
use crate::sink::{MetricSink, NullSink};
use crate::vitals::{HandlerFuture, VitalsHandler, VitalsSource};

/// Fetch duration above which a resource is flagged in the diagnostics
/// side channel. Flagged entries are logged, never stored.
pub const SLOW_RESOURCE_MS: f64 = 500.0;

/// Drives observation of one page session into a [`MetricStore`].
pub struct Collector {
    /// Session store receiving every classified record.
    store: MetricStore,
    /// Page under observation. `None` means a detached process; `init`
    /// then collects nothing.
    environment: Option<Arc<dyn PageEnvironment>>,
    /// Vitals instrumentation, if the host provides one.
    vitals: Option<Arc<dyn VitalsSource>>,
    /// Reporting hook. Defaults to [`NullSink`].
    sink: Arc<dyn MetricSink>,
    config: CollectorConfig,
    /// Set by the first `init` call; later calls are no-ops.
    initialized: AtomicBool,
}

impl Collector {
    pub fn new(store: MetricStore, config: CollectorConfig) -> Self {
        Self {
            store,
            environment: None,
            vitals: None,
            sink: Arc::new(NullSink),
            config,
            initialized: AtomicBool::new(false),
        }
    }

    /// Attach the page environment to observe.
    pub fn with_environment(mut self, environment: impl PageEnvironment + 'static) -> Self {
        self.environment = Some(Arc::new(environment));
        self
    }

    /// Attach a vitals source.
    pub fn with_vitals(mut self, vitals: impl VitalsSource + 'static) -> Self {
        self.vitals = Some(Arc::new(vitals));
        self
    }

    /// Replace the default [`NullSink`] with a real reporting hook.
    pub fn with_sink(mut self, sink: impl MetricSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Start observing. Idempotent and infallible.
    ///
    /// Subscribes to vitals, then takes the navigation and resource
    /// snapshots. The three sources are independent: a failure or absence
    /// in one never affects the others. Returns once the snapshots are
    /// stored; vitals keep arriving on background tasks afterwards.
    pub async fn init(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            trace!("collector already initialized, ignoring");
            return;
        }
        let Some(environment) = self.environment.clone() else {
            trace!("no page environment attached, collection disabled");
            return;
        };

        self.subscribe_vitals().await;
        self.observe_navigation(environment.as_ref()).await;
        self.observe_resources(environment.as_ref()).await;
    }

    async fn subscribe_vitals(&self) {
        let Some(source) = &self.vitals else {
            trace!("no vitals source attached");
            return;
        };
        let handler = self.vitals_handler();
        match source.subscribe(handler).await {
            Ok(()) => debug!("subscribed to web vitals"),
            Err(err) => warn!(error = %err, "web vitals unavailable, continuing without"),
        }
    }

    /// Handler appending each delivered sample under its metric name.
    ///
    /// Captures clones of the store, sink, and config so delivery keeps
    /// working on background tasks after `init` returns.
    fn vitals_handler(&self) -> VitalsHandler {
        let store = self.store.clone();
        let sink = self.sink.clone();
        let config = self.config;
        Arc::new(move |sample| {
            let store = store.clone();
            let sink = sink.clone();
            Box::pin(async move {
                record_metric(
                    &store,
                    &sink,
                    config,
                    sample.signal.metric_name(),
                    sample.value,
                )
                .await;
            }) as HandlerFuture
        })
    }

    async fn observe_navigation(&self, environment: &dyn PageEnvironment) {
        let Some(nav) = environment.navigation() else {
            debug!("no navigation timing entry");
            return;
        };
        self.record(MetricName::DnsLookup, nav.dns_ms()).await;
        self.record(MetricName::TcpConnection, nav.tcp_ms()).await;
        self.record(MetricName::ServerResponse, nav.server_response_ms())
            .await;
        self.record(MetricName::DomContentLoaded, nav.dom_content_loaded_ms())
            .await;
    }

    /// Accumulate transfer sizes per category and emit one size metric per
    /// category that actually moved bytes. Entries slower than
    /// [`SLOW_RESOURCE_MS`] are logged outside production mode but never
    /// stored.
    async fn observe_resources(&self, environment: &dyn PageEnvironment) {
        let entries = environment.resources();
        if entries.is_empty() {
            debug!("resource timing buffer empty");
            return;
        }

        let mut bytes_by_category: HashMap<ResourceCategory, u64> = HashMap::new();
        let mut slow: Vec<&ResourceTiming> = Vec::new();
        for entry in &entries {
            let category = ResourceCategory::from_url(&entry.url);
            *bytes_by_category.entry(category).or_default() += entry.transfer_size;
            if entry.duration_ms > SLOW_RESOURCE_MS {
                slow.push(entry);
            }
        }

        for category in ResourceCategory::ALL {
            let bytes = bytes_by_category.get(&category).copied().unwrap_or(0);
            if bytes == 0 {
                continue;
            }
            self.record(category.metric_name(), bytes as f64 / 1024.0).await;
        }

        if !self.config.production && !slow.is_empty() {
            warn!(
                count = slow.len(),
                threshold_ms = SLOW_RESOURCE_MS,
                "slow resources detected"
            );
            for entry in slow {
                warn!(url = %entry.url, duration_ms = entry.duration_ms, "slow resource");
            }
        }
    }

    async fn record(&self, name: MetricName, value: f64) -> MetricRecord {
        record_metric(&self.store, &self.sink, self.config, name, value).await
    }

    /// Clone of the session store handle, for consumers that outlive the
    /// collector.
    pub fn store(&self) -> MetricStore {
        self.store.clone()
    }

    /// Point-in-time copy of every collected history.
    pub async fn metrics(&self) -> HashMap<MetricName, Vec<MetricRecord>> {
        self.store.snapshot().await
    }

    /// Wipe the session store. Intended for test isolation.
    pub async fn clear_metrics(&self) {
        self.store.clear().await
    }

    /// Log one summary line per collected metric, in vocabulary order.
    ///
    /// The end-of-session flush: sample count, latest value, and latest
    /// rating per name.
    pub async fn log_summary(&self) {
        let snapshot = self.store.snapshot().await;
        if snapshot.is_empty() {
            info!("session ended with no metrics collected");
            return;
        }
        let samples: usize = snapshot.values().map(Vec::len).sum();
        info!(metrics = snapshot.len(), samples, "session summary");

        let mut names: Vec<MetricName> = snapshot.keys().copied().collect();
        names.sort();
        for name in names {
            let history = &snapshot[&name];
            if let Some(latest) = history.last() {
                info!(
                    name = %name,
                    samples = history.len(),
                    latest = latest.value,
                    rating = %latest.rating,
                    "metric summary"
                );
            }
        }
    }
}

// ── Append + report path ────────────────────────────────────────────────

/// Store one classified value, mirror it to the log outside production
/// mode, and offer it to the sink without waiting.
async fn record_metric(
    store: &MetricStore,
    sink: &Arc<dyn MetricSink>,
    config: CollectorConfig,
    name: MetricName,
    value: f64,
) -> MetricRecord {
    let record = store.append(name, value).await;
    if !config.production {
        debug!(
            name = %record.name,
            value = record.value,
            rating = %record.rating,
            "metric recorded"
        );
    }
    offer_to_sink(sink.clone(), record.clone());
    record
}

/// Fire-and-forget sink offer. Errors are logged at debug and dropped;
/// the append path never learns about them.
fn offer_to_sink(sink: Arc<dyn MetricSink>, record: MetricRecord) {
    tokio::spawn(async move {
        if let Err(err) = sink.send(record).await {
            debug!(error = %err, "sink declined record");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use pagewatch_metrics::Rating;

    use crate::environment::{NavigationTiming, StaticEnvironment};
    use crate::error::SinkError;
    use crate::sink::{RecordingSink, SendFuture};
    use crate::vitals::{ScriptedVital, ScriptedVitalsSource};
    use pagewatch_metrics::VitalSignal;

    /// Sink that refuses everything, for isolation tests.
    struct FailingSink;

    impl MetricSink for FailingSink {
        fn send(&self, _record: MetricRecord) -> SendFuture<'_> {
            Box::pin(async { Err(SinkError::Transport("backend offline".into())) })
        }
    }

    fn sample_navigation() -> NavigationTiming {
        NavigationTiming {
            domain_lookup_start: 0.0,
            domain_lookup_end: 40.0,
            connect_start: 40.0,
            connect_end: 100.0,
            request_start: 105.0,
            response_start: 355.0,
            dom_content_loaded_event_start: 700.0,
            dom_content_loaded_event_end: 820.0,
        }
    }

    #[tokio::test]
    async fn init_without_environment_leaves_store_untouched() {
        let store = MetricStore::new();
        let collector = Collector::new(store.clone(), CollectorConfig::default());
        collector.init().await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn double_init_observes_once() {
        let store = MetricStore::new();
        let collector = Collector::new(store.clone(), CollectorConfig::default())
            .with_environment(StaticEnvironment::new().with_navigation(sample_navigation()));

        collector.init().await;
        collector.init().await;

        assert_eq!(store.sample_count().await, 4);
        assert_eq!(store.records(MetricName::DnsLookup).await.len(), 1);
    }

    #[tokio::test]
    async fn navigation_snapshot_stores_four_phase_durations() {
        let store = MetricStore::new();
        let collector = Collector::new(store.clone(), CollectorConfig::default())
            .with_environment(StaticEnvironment::new().with_navigation(sample_navigation()));
        collector.init().await;

        let dns = store.latest(MetricName::DnsLookup).await.unwrap();
        assert_eq!(dns.value, 40.0);
        assert_eq!(dns.rating, Rating::Good);

        let tcp = store.latest(MetricName::TcpConnection).await.unwrap();
        assert_eq!(tcp.value, 60.0);
        assert_eq!(tcp.rating, Rating::NeedsImprovement);

        let server = store.latest(MetricName::ServerResponse).await.unwrap();
        assert_eq!(server.value, 250.0);
        assert_eq!(server.rating, Rating::NeedsImprovement);

        let dcl = store.latest(MetricName::DomContentLoaded).await.unwrap();
        assert_eq!(dcl.value, 120.0);
        assert_eq!(dcl.rating, Rating::NeedsImprovement);
    }

    #[tokio::test]
    async fn resource_snapshot_accumulates_per_category() {
        let resources = vec![
            ResourceTiming {
                url: "https://cdn.example.com/vendor.js".into(),
                transfer_size: 30_720,
                duration_ms: 120.0,
            },
            ResourceTiming {
                url: "/static/app.js".into(),
                transfer_size: 20_480,
                duration_ms: 80.0,
            },
            ResourceTiming {
                url: "/img/hero.png".into(),
                transfer_size: 419_430,
                duration_ms: 310.0,
            },
            // Cache hit: zero transfer, must not create a CSS record.
            ResourceTiming {
                url: "/static/site.css".into(),
                transfer_size: 0,
                duration_ms: 8.0,
            },
        ];
        let store = MetricStore::new();
        let collector = Collector::new(store.clone(), CollectorConfig::default())
            .with_environment(StaticEnvironment::new().with_resources(resources));
        collector.init().await;

        let js = store.latest(MetricName::JavaScriptSize).await.unwrap();
        assert_eq!(js.value, 50.0);
        assert_eq!(js.rating, Rating::Good);

        let images = store.latest(MetricName::ImagesSize).await.unwrap();
        assert_eq!(images.value, 409.599_609_375);
        assert_eq!(images.rating, Rating::Poor);

        assert!(store.latest(MetricName::CssSize).await.is_none());
        assert!(store.latest(MetricName::FontsSize).await.is_none());
        assert!(store.latest(MetricName::OtherSize).await.is_none());
        assert_eq!(store.sample_count().await, 2);
    }

    #[tokio::test]
    async fn slow_resources_are_not_stored_as_metrics() {
        let resources = vec![ResourceTiming {
            url: "/api/slow-report.pdf".into(),
            transfer_size: 0,
            duration_ms: 900.0,
        }];
        let store = MetricStore::new();
        let collector = Collector::new(store.clone(), CollectorConfig::default())
            .with_environment(StaticEnvironment::new().with_resources(resources));
        collector.init().await;

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn immediate_vitals_are_stored_by_the_time_init_returns() {
        let script = vec![
            ScriptedVital {
                after_ms: 0,
                signal: VitalSignal::Lcp,
                value: 2300.0,
            },
            ScriptedVital {
                after_ms: 0,
                signal: VitalSignal::Cls,
                value: 0.31,
            },
        ];
        let store = MetricStore::new();
        let collector = Collector::new(store.clone(), CollectorConfig::default())
            .with_environment(StaticEnvironment::new())
            .with_vitals(ScriptedVitalsSource::immediate(script));
        collector.init().await;

        assert_eq!(store.latest(MetricName::Lcp).await.unwrap().rating, Rating::Good);
        assert_eq!(store.latest(MetricName::Cls).await.unwrap().rating, Rating::Poor);
    }

    #[tokio::test]
    async fn vitals_failure_leaves_navigation_and_resources_intact() {
        let store = MetricStore::new();
        let collector = Collector::new(store.clone(), CollectorConfig::default())
            .with_environment(
                StaticEnvironment::new()
                    .with_navigation(sample_navigation())
                    .with_resources(vec![ResourceTiming {
                        url: "/app.js".into(),
                        transfer_size: 10_240,
                        duration_ms: 45.0,
                    }]),
            )
            .with_vitals(ScriptedVitalsSource::failing("module not found"));
        collector.init().await;

        assert_eq!(store.sample_count().await, 5);
        assert!(store.latest(MetricName::Lcp).await.is_none());
        assert!(store.latest(MetricName::JavaScriptSize).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn sink_receives_every_stored_record() {
        let sink = RecordingSink::new();
        let store = MetricStore::new();
        let collector = Collector::new(store.clone(), CollectorConfig::default())
            .with_environment(StaticEnvironment::new().with_navigation(sample_navigation()))
            .with_sink(sink.clone());
        collector.init().await;

        // Sink offers run on spawned tasks; give them a bounded window.
        for _ in 0..50 {
            if sink.sent_count().await == 4 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let sent = sink.sent().await;
        assert_eq!(sent.len(), 4);
        assert!(sent.iter().any(|r| r.name == MetricName::DnsLookup));
        assert!(sent.iter().any(|r| r.name == MetricName::DomContentLoaded));
    }

    #[tokio::test]
    async fn failing_sink_never_affects_the_store() {
        let store = MetricStore::new();
        let collector = Collector::new(store.clone(), CollectorConfig::default())
            .with_environment(StaticEnvironment::new().with_navigation(sample_navigation()))
            .with_sink(FailingSink);
        collector.init().await;

        assert_eq!(store.sample_count().await, 4);
        // Later appends still work.
        store.append(MetricName::Lcp, 2000.0).await;
        assert_eq!(store.sample_count().await, 5);
    }

    #[tokio::test]
    async fn clear_metrics_resets_the_session() {
        let store = MetricStore::new();
        let collector = Collector::new(store.clone(), CollectorConfig::default())
            .with_environment(StaticEnvironment::new().with_navigation(sample_navigation()));
        collector.init().await;
        assert!(!collector.metrics().await.is_empty());

        collector.clear_metrics().await;
        assert!(collector.metrics().await.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn production_mode_still_collects_and_reports() {
        let sink = RecordingSink::new();
        let store = MetricStore::new();
        let config = CollectorConfig { production: true };
        let collector = Collector::new(store.clone(), config)
            .with_environment(StaticEnvironment::new().with_navigation(sample_navigation()))
            .with_sink(sink.clone());
        collector.init().await;

        assert_eq!(store.sample_count().await, 4);
        for _ in 0..50 {
            if sink.sent_count().await == 4 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(sink.sent_count().await, 4);
    }
}
