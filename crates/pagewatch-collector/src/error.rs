//! Error types for the collection engine.
//!
//! Both enums stay inside the engine: a vitals failure disables that source
//! for the session and a sink failure is logged and discarded. Neither is
//! ever returned to the caller of `init`.

use thiserror::Error;

/// Errors from resolving or subscribing to a vitals source.
#[derive(Debug, Error)]
pub enum VitalsError {
    /// The source could not be resolved (the optional instrumentation
    /// module failed to load).
    #[error("vitals source unavailable: {0}")]
    Unavailable(String),

    /// The source only supports a single subscriber and already has one.
    #[error("vitals source already subscribed")]
    AlreadySubscribed,
}

/// Errors from offering a record to the reporting sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink refused the record.
    #[error("report rejected: {0}")]
    Rejected(String),

    /// The record could not be delivered.
    #[error("report transport error: {0}")]
    Transport(String),
}
