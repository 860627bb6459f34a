//! Error types for the todo client.
//!
//! # Design
//! Every failure a user can trigger lands in `ApiError`, and every variant
//! carries a human-readable message that the controller can show as-is.
//! `NotFound` keeps its own variant because callers distinguish "the todo is
//! gone" from other non-2xx responses. `kind()` collapses the variants into
//! the three classes the UI cares about.

use std::fmt;

/// Errors returned by client, gateway and store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A required field was empty. No request was sent.
    Validation(String),

    /// The request could not be delivered (connection refused, timeout, ...).
    Network(String),

    /// The server returned 404.
    NotFound(String),

    /// The server returned a non-2xx status other than 404.
    Http { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    Serialization(String),
}

/// Coarse classification used by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Network,
    Api,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Network(_) | ApiError::Deserialization(_) | ApiError::Serialization(_) => {
                ErrorKind::Network
            }
            ApiError::NotFound(_) | ApiError::Http { .. } => ErrorKind::Api,
        }
    }

    /// The message shown to a user, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::Network(msg)
            | ApiError::NotFound(msg)
            | ApiError::Deserialization(msg)
            | ApiError::Serialization(msg) => msg,
            ApiError::Http { message, .. } => message,
        }
    }

    /// Status code for errors that came from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound(_) => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "invalid input: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::NotFound(msg) => write!(f, "not found: {msg}"),
            ApiError::Http { status, message } => write!(f, "HTTP {status}: {message}"),
            ApiError::Deserialization(msg) => write!(f, "deserialization failed: {msg}"),
            ApiError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
