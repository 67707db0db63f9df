//! In-memory session store for classified observations.
//!
//! The store keeps an append-only history per metric name for the lifetime
//! of a session. Handles are cheap clones sharing one state behind an async
//! `RwLock`; reads hand out point-in-time copies rather than guards, so
//! callers never hold the lock across awaits.
//!
//! Record timestamps are issued inside the write lock and clamped to be
//! non-decreasing, so history order and timestamp order always agree even
//! if the wall clock steps backwards mid-session.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::name::MetricName;
use crate::record::MetricRecord;

fn epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Default)]
struct StoreInner {
    /// Per-name append-only history, in arrival order.
    metrics: HashMap<MetricName, Vec<MetricRecord>>,
    /// Highest timestamp issued so far, for the monotonic clamp.
    last_timestamp_ms: u64,
}

/// Shared handle to the session's metric history.
#[derive(Clone)]
pub struct MetricStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MetricStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
        }
    }

    /// Classify a value and append it under `name`.
    ///
    /// The record's timestamp is the current epoch time in milliseconds,
    /// clamped so it never runs behind a previously issued timestamp.
    /// Returns a copy of the stored record.
    pub async fn append(&self, name: MetricName, value: f64) -> MetricRecord {
        let mut inner = self.inner.write().await;
        let timestamp_ms = epoch_ms().max(inner.last_timestamp_ms);
        inner.last_timestamp_ms = timestamp_ms;
        let record = MetricRecord::classify(name, value, timestamp_ms);
        inner.metrics.entry(name).or_default().push(record.clone());
        record
    }

    /// Point-in-time copy of every history in the store.
    pub async fn snapshot(&self) -> HashMap<MetricName, Vec<MetricRecord>> {
        self.inner.read().await.metrics.clone()
    }

    /// History for one name, oldest first. Empty if never recorded.
    pub async fn records(&self, name: MetricName) -> Vec<MetricRecord> {
        self.inner
            .read()
            .await
            .metrics
            .get(&name)
            .cloned()
            .unwrap_or_default()
    }

    /// Most recent record for one name, if any.
    pub async fn latest(&self, name: MetricName) -> Option<MetricRecord> {
        self.inner
            .read()
            .await
            .metrics
            .get(&name)
            .and_then(|history| history.last())
            .cloned()
    }

    /// Most recent record per name, in vocabulary order.
    pub async fn latest_all(&self) -> Vec<MetricRecord> {
        let inner = self.inner.read().await;
        let mut latest: Vec<MetricRecord> = inner
            .metrics
            .values()
            .filter_map(|history| history.last())
            .cloned()
            .collect();
        latest.sort_by_key(|record| record.name);
        latest
    }

    /// Number of distinct names with at least one record.
    pub async fn metric_count(&self) -> usize {
        self.inner.read().await.metrics.len()
    }

    /// Total number of records across all names.
    pub async fn sample_count(&self) -> usize {
        self.inner.read().await.metrics.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.metrics.is_empty()
    }

    /// Drop every history. Timestamp issuance stays monotonic across the
    /// wipe so records appended afterwards never predate cleared ones.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        let dropped = inner.metrics.values().map(Vec::len).sum::<usize>();
        inner.metrics.clear();
        debug!(dropped, "metric store cleared");
    }
}

impl Default for MetricStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Rating;

    #[tokio::test]
    async fn append_classifies_and_stores() {
        let store = MetricStore::new();
        let record = store.append(MetricName::Lcp, 2400.0).await;
        assert_eq!(record.name, MetricName::Lcp);
        assert_eq!(record.rating, Rating::Good);

        let history = store.records(MetricName::Lcp).await;
        assert_eq!(history, vec![record]);
    }

    #[tokio::test]
    async fn histories_keep_arrival_order() {
        let store = MetricStore::new();
        store.append(MetricName::Cls, 0.05).await;
        store.append(MetricName::Cls, 0.31).await;
        store.append(MetricName::Cls, 0.12).await;

        let history = store.records(MetricName::Cls).await;
        let values: Vec<f64> = history.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![0.05, 0.31, 0.12]);
        assert_eq!(history[1].rating, Rating::Poor);
    }

    #[tokio::test]
    async fn timestamps_never_decrease() {
        let store = MetricStore::new();
        for _ in 0..16 {
            store.append(MetricName::Fid, 10.0).await;
        }
        let history = store.records(MetricName::Fid).await;
        for pair in history.windows(2) {
            assert!(pair[0].timestamp_ms <= pair[1].timestamp_ms);
        }
    }

    #[tokio::test]
    async fn snapshot_is_a_point_in_time_copy() {
        let store = MetricStore::new();
        store.append(MetricName::Ttfb, 500.0).await;
        let snapshot = store.snapshot().await;

        store.append(MetricName::Ttfb, 900.0).await;
        store.append(MetricName::Fcp, 1200.0).await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[&MetricName::Ttfb].len(), 1);
        assert_eq!(store.records(MetricName::Ttfb).await.len(), 2);
    }

    #[tokio::test]
    async fn latest_all_is_one_per_name_in_vocabulary_order() {
        let store = MetricStore::new();
        store.append(MetricName::DnsLookup, 30.0).await;
        store.append(MetricName::Cls, 0.02).await;
        store.append(MetricName::Cls, 0.2).await;
        store.append(MetricName::JavaScriptSize, 150.0).await;

        let latest = store.latest_all().await;
        let names: Vec<MetricName> = latest.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                MetricName::Cls,
                MetricName::DnsLookup,
                MetricName::JavaScriptSize
            ]
        );
        assert_eq!(latest[0].value, 0.2);
    }

    #[tokio::test]
    async fn clear_empties_every_history() {
        let store = MetricStore::new();
        store.append(MetricName::Lcp, 2000.0).await;
        store.append(MetricName::Fid, 50.0).await;
        assert_eq!(store.sample_count().await, 2);

        store.clear().await;
        assert!(store.is_empty().await);
        assert_eq!(store.metric_count().await, 0);
        assert!(store.latest(MetricName::Lcp).await.is_none());
    }

    #[tokio::test]
    async fn clones_share_the_same_history() {
        let store = MetricStore::new();
        let handle = store.clone();
        handle.append(MetricName::Fcp, 900.0).await;

        assert_eq!(store.sample_count().await, 1);
        let latest = store.latest(MetricName::Fcp).await.unwrap();
        assert_eq!(latest.value, 900.0);
    }
}
