//! Unified error type for the gitscout workspace.

use thiserror::Error;

/// Errors raised while sourcing tokens and assembling clients.
///
/// Errors from the GitHub REST layer itself are not folded in here; they
/// are returned to callers unchanged as `gitscout_github::ApiError`.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// The token store could not be queried.
    #[error("failed to fetch tokens: {0}")]
    TokenFetch(String),

    /// No token with usable content is stored.
    #[error("github client initialization failed, please add a token")]
    NoTokenConfigured,

    /// Persistent storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The token kind name is not recognized.
    #[error("unknown token kind: {0}")]
    UnknownTokenKind(String),
}

// ── Feature-gated From impls ──────────────────────────────────────────────────

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for ScoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ScoutError>;
