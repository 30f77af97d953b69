//! Error types for the reqres client.
//!
//! # Design
//! A remote error response whose status the caller expected is not an
//! `ApiError`; it comes back as `Outcome::Failure`. `ApiError` is reserved for
//! contract violations (wrong status, unreadable body) and transport failures.

use thiserror::Error;

/// Errors returned by `ReqresClient` parse methods and `ReqresApi` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status other than the one the caller
    /// asserted. The body is left unread.
    #[error("response status is not {expected} (got {actual})")]
    UnexpectedStatus { expected: u16, actual: u16 },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The HTTP round trip itself failed.
    #[error("transport failed: {0}")]
    Transport(String),
}
