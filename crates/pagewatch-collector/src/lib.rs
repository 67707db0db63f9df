//! pagewatch-collector — collection engine for PageWatch.
//!
//! Observes one page session through injectable capability traits and
//! drives every raw signal into the classified session store from
//! `pagewatch-metrics`.
//!
//! # Architecture
//!
//! ```text
//! PageEnvironment (trait)     VitalsSource (trait)      MetricSink (trait)
//!   ├── navigation()            └── subscribe(handler)    └── send(record)
//!   └── resources()                   │                        ▲
//!         │                          async samples             │ spawned,
//!         ▼                           ▼                        │ best effort
//!       Collector::init() ──▶ classify + append ──────────────┘
//!                                    │
//!                                    ▼
//!                              MetricStore
//! ```
//!
//! The trait seams replace what a browser runtime hands a page for free:
//! `StaticEnvironment` and `ScriptedVitalsSource` are the replay/test
//! bindings, `ChannelVitalsSource` the production shape, `NullSink` the
//! placeholder reporting hook.

pub mod collector;
pub mod config;
pub mod environment;
pub mod error;
pub mod sink;
pub mod vitals;

pub use collector::{Collector, SLOW_RESOURCE_MS};
pub use config::CollectorConfig;
pub use environment::{NavigationTiming, PageEnvironment, ResourceTiming, StaticEnvironment};
pub use error::{SinkError, VitalsError};
pub use sink::{MetricSink, NullSink, RecordingSink, SendFuture};
pub use vitals::{
    ChannelVitalsSource, HandlerFuture, ScriptedVital, ScriptedVitalsSource, SubscribeFuture,
    VitalSample, VitalsHandler, VitalsSource,
};
