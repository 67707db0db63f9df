//! Reporting sink boundary.
//!
//! Every stored record is offered to a [`MetricSink`] on a spawned task.
//! The offer is fire-and-forget: the append path never waits for the sink
//! and a sink failure never surfaces past a debug log. No network transport
//! ships with the engine; [`NullSink`] marks the spot where a deployment
//! would plug one in.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Mutex;

use pagewatch_metrics::MetricRecord;

use crate::error::SinkError;

/// Boxed future alias for sink send results.
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + 'a>>;

/// Destination for classified records — injected for testability.
pub trait MetricSink: Send + Sync {
    /// Offer one record to the reporting backend.
    fn send(&self, record: MetricRecord) -> SendFuture<'_>;
}

/// Sink that accepts and discards every record.
///
/// The default binding: collection behaves identically whether or not a
/// real backend is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MetricSink for NullSink {
    fn send(&self, _record: MetricRecord) -> SendFuture<'_> {
        Box::pin(async { Ok(()) })
    }
}

/// Sink that keeps every offered record, in arrival order.
///
/// Handles are cheap clones over shared storage, so a test can keep one
/// clone and hand the other to the collector.
#[derive(Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<MetricRecord>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything sent so far.
    pub async fn sent(&self) -> Vec<MetricRecord> {
        self.records.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.records.lock().await.len()
    }
}

impl MetricSink for RecordingSink {
    fn send(&self, record: MetricRecord) -> SendFuture<'_> {
        Box::pin(async move {
            self.records.lock().await.push(record);
            Ok(())
        })
    }
}
