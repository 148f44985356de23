//! Error types for the data-access layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Datastore Error Enum ==
/// Failures surfaced by the external datastore.
///
/// Cache-internal problems never appear here: the cache degrades to a miss or
/// a no-op and logs instead. Only the source-of-truth query can fail a caller.
#[derive(Error, Debug)]
pub enum DatastoreError {
    /// The HTTP request itself failed (connect, timeout, TLS, body read)
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The datastore answered with a non-success status
    #[error("unexpected response status {status} from {context}")]
    Status { status: u16, context: String },

    /// The response body did not match the expected row shape
    #[error("failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A mutation targeted a row that does not exist
    #[error("row not found: {0}")]
    NotFound(String),

    /// The datastore is unreachable or refused the operation
    #[error("datastore unavailable: {0}")]
    Unavailable(String),
}

// == Result Type Alias ==
/// Convenience Result type for repository and datastore operations.
pub type Result<T> = std::result::Result<T, DatastoreError>;
