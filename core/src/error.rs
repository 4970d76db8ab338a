//! Error types for building, sending and decoding requests.
//!
//! # Design
//! Malformed JSON tokens never produce an error; they are dropped by the
//! token parser. Everything that can fail after that point lands here.
//! Non-2xx statuses are not errors by default: a response is data, and
//! `HttpResponse::error_for_status` opts into `Status`.

use thiserror::Error;

/// Errors returned by `Request::build`, `Request::send` and the response
/// helpers.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The target address could not be parsed as an absolute URL.
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The transport could not complete the exchange (connect, timeout, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}
