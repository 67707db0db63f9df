//! pagewatch-metrics — metric model for PageWatch sessions.
//!
//! Defines the closed metric vocabulary (web vitals, navigation phases,
//! resource transfer sizes), the three-tier rating scheme with its
//! per-name thresholds, and the in-memory session store that keeps an
//! append-only classified history per name.
//!
//! # Architecture
//!
//! ```text
//! MetricName ──thresholds()──▶ Thresholds ──rate()──▶ Rating
//!      │
//!      └── MetricRecord::classify(name, value, ts)
//!                  │
//!                  ▼
//!            MetricStore
//!              ├── append() ← called per observation
//!              ├── snapshot() / records() / latest_all() → copies
//!              └── clear() → session reset
//! ```
//!
//! The `MetricStore` is `Clone` + `Send` + `Sync` (backed by
//! `Arc<RwLock<..>>`) and can be shared across async tasks.

pub mod name;
pub mod record;
pub mod store;
pub mod thresholds;

pub use name::{MetricName, ResourceCategory, Unit, VitalSignal};
pub use record::{MetricRecord, Rating};
pub use store::MetricStore;
pub use thresholds::Thresholds;
