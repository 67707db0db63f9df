//! Web-vitals signal sources.
//!
//! Vitals arrive asynchronously over the whole session, unlike the one-shot
//! navigation and resource reads. The [`VitalsSource`] trait stands in for
//! the host's optional instrumentation module: subscribing may fail (the
//! module may be unavailable), and once subscribed there is no way to
//! unsubscribe. A source that never delivers is a valid, quiet session.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use pagewatch_metrics::VitalSignal;

use crate::error::VitalsError;

/// Boxed future alias for sample-handler invocations.
pub type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Boxed future alias for subscription results.
pub type SubscribeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(), VitalsError>> + Send + 'a>>;

/// Async callback invoked once per delivered sample.
pub type VitalsHandler = Arc<dyn Fn(VitalSample) -> HandlerFuture + Send + Sync>;

/// One observation delivered by a vitals source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalSample {
    pub signal: VitalSignal,
    pub value: f64,
}

/// A stream of web-vitals observations — injected for testability.
pub trait VitalsSource: Send + Sync {
    /// Resolve the source and register `handler` for every future sample.
    ///
    /// The returned future must resolve promptly: delivery happens on
    /// background tasks for the rest of the session, never inside the
    /// caller's init path (the scripted immediate mode, which delivers
    /// before resolving, is the deliberate test-only exception).
    fn subscribe(&self, handler: VitalsHandler) -> SubscribeFuture<'_>;
}

// ── Channel-backed source ───────────────────────────────────────────────

/// Production-shaped source: host instrumentation pushes samples into the
/// sender half, the subscription task forwards them to the handler.
pub struct ChannelVitalsSource {
    /// Receiver half, taken by the first (only) subscription.
    receiver: Mutex<Option<mpsc::Receiver<VitalSample>>>,
}

impl ChannelVitalsSource {
    /// Build a source plus the sender instrumentation pushes into.
    pub fn channel(buffer: usize) -> (Self, mpsc::Sender<VitalSample>) {
        let (tx, rx) = mpsc::channel(buffer);
        let source = Self {
            receiver: Mutex::new(Some(rx)),
        };
        (source, tx)
    }
}

impl VitalsSource for ChannelVitalsSource {
    fn subscribe(&self, handler: VitalsHandler) -> SubscribeFuture<'_> {
        Box::pin(async move {
            let Some(mut receiver) = self.receiver.lock().await.take() else {
                return Err(VitalsError::AlreadySubscribed);
            };
            tokio::spawn(async move {
                while let Some(sample) = receiver.recv().await {
                    handler(sample).await;
                }
                debug!("vitals channel closed, delivery task exiting");
            });
            Ok(())
        })
    }
}

// ── Scripted source ─────────────────────────────────────────────────────

/// One scripted observation: `signal`/`value` delivered `after_ms`
/// milliseconds after subscription.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedVital {
    /// Delivery offset from the moment of subscription.
    #[serde(default)]
    pub after_ms: u64,
    pub signal: VitalSignal,
    pub value: f64,
}

enum ScriptMode {
    /// Deliver the whole script inline before `subscribe` resolves.
    Immediate,
    /// Deliver on a background task, honoring each event's offset.
    Timed,
    /// Refuse to subscribe, simulating an unavailable module.
    Failing(String),
}

/// Replay/test source that plays back a fixed script.
///
/// Each subscription replays the full script from the beginning; events are
/// expected in non-decreasing `after_ms` order and an offset already in the
/// past delivers immediately.
pub struct ScriptedVitalsSource {
    script: Vec<ScriptedVital>,
    mode: ScriptMode,
}

impl ScriptedVitalsSource {
    /// Script delivered synchronously inside `subscribe`, for tests that
    /// need every sample stored by the time init returns.
    pub fn immediate(script: Vec<ScriptedVital>) -> Self {
        Self {
            script,
            mode: ScriptMode::Immediate,
        }
    }

    /// Script delivered on a background task at each event's offset.
    pub fn timed(script: Vec<ScriptedVital>) -> Self {
        Self {
            script,
            mode: ScriptMode::Timed,
        }
    }

    /// Source whose subscription always fails with the given reason.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            script: Vec::new(),
            mode: ScriptMode::Failing(reason.into()),
        }
    }
}

impl VitalsSource for ScriptedVitalsSource {
    fn subscribe(&self, handler: VitalsHandler) -> SubscribeFuture<'_> {
        Box::pin(async move {
            match &self.mode {
                ScriptMode::Failing(reason) => {
                    Err(VitalsError::Unavailable(reason.clone()))
                }
                ScriptMode::Immediate => {
                    for event in &self.script {
                        handler(VitalSample {
                            signal: event.signal,
                            value: event.value,
                        })
                        .await;
                    }
                    Ok(())
                }
                ScriptMode::Timed => {
                    let script = self.script.clone();
                    tokio::spawn(async move {
                        let start = tokio::time::Instant::now();
                        for event in script {
                            let deadline =
                                start + Duration::from_millis(event.after_ms);
                            tokio::time::sleep_until(deadline).await;
                            handler(VitalSample {
                                signal: event.signal,
                                value: event.value,
                            })
                            .await;
                        }
                        debug!("scripted vitals exhausted");
                    });
                    Ok(())
                }
            }
        })
    }
}
