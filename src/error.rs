//! Error types for keyrealm
//!
//! This module defines all error types used throughout the library,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for keyrealm operations
///
/// This enum encompasses all possible errors that can occur while talking
/// to a Keycloak server: transport failures, lifecycle violations, missing
/// discovery entries, and decoding problems.
#[derive(Error, Debug)]
pub enum KeyrealmError {
    /// A non-2xx HTTP response or a network-level failure.
    ///
    /// `status` is set when the server produced a response; `source` carries
    /// the underlying `reqwest` error when one exists.
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable description including URL and body excerpt.
        message: String,
        /// HTTP status code, when the failure was a non-2xx response.
        status: Option<u16>,
        /// The originating transport error, when one exists.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// An operation was attempted on a closed or not-yet-initialized handle.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// A requested endpoint name is absent from the resolved discovery
    /// document. Usually a server/client protocol-version mismatch.
    #[error("Discovery document has no entry {0:?}")]
    KeyNotFound(String),

    /// Malformed base64 or JSON encountered while extracting claims, or a
    /// response body that was expected to be JSON but was not.
    #[error("Decode error: {0}")]
    Decode(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parse or join errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A default or per-request header value could not be encoded.
    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// Verified JWT decoding errors from the `decode_token` passthrough.
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl KeyrealmError {
    /// Builds a [`KeyrealmError::Transport`] for a network-level failure
    /// (no usable response was received).
    pub fn request(err: reqwest::Error) -> Self {
        KeyrealmError::Transport {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
            source: Some(err),
        }
    }

    /// Builds a [`KeyrealmError::Transport`] for a non-2xx response,
    /// carrying the original error when the transport produced one.
    pub fn http(status: u16, url: &str, body: &str, source: Option<reqwest::Error>) -> Self {
        // Keep the message bounded; full bodies go to the debug log.
        let excerpt: String = body.chars().take(200).collect();
        KeyrealmError::Transport {
            message: format!("HTTP {status} for {url}: {excerpt}"),
            status: Some(status),
            source,
        }
    }

    /// HTTP status associated with this error, when it is a transport error
    /// produced by a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            KeyrealmError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type alias for keyrealm operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation. Typed
/// [`KeyrealmError`] values are always the innermost error and can be
/// recovered with `err.downcast_ref::<KeyrealmError>()`.
pub type Result<T> = anyhow::Result<T>;
