//! Errors returned by GitHub REST calls.

use crate::response::{Rate, Response};
use thiserror::Error;

/// A failed GitHub request.
///
/// Lookups hand these back exactly as produced; nothing upstream retries
/// or rewrites them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, TLS, connect, timeout).
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("GET {url}: {status} {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
        response: Box<Response>,
    },

    /// The token's primary rate limit is exhausted.
    #[error("GET {url}: rate limit exceeded ({rate}): {message}")]
    RateLimited {
        url: String,
        rate: Rate,
        message: String,
        response: Box<Response>,
    },

    /// The body of a successful response did not match the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
        response: Box<Response>,
    },
}

impl ApiError {
    /// HTTP status of the failed call, if a response arrived.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// Response metadata, if a response arrived.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Transport(_) => None,
            Self::Status { response, .. }
            | Self::RateLimited { response, .. }
            | Self::Decode { response, .. } => Some(response),
        }
    }
}
