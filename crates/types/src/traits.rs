//! Async traits shared across gitscout crates.

use crate::{RateSnapshot, Token, TokenKind, error::Result};
use async_trait::async_trait;

/// Persistent storage for platform tokens, keyed by token content.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// List every stored token of the given kind, in insertion order.
    async fn list_by_kind(&self, kind: TokenKind) -> Result<Vec<Token>>;

    /// Insert a token, or update the kind and description of an existing one
    /// with the same content.
    async fn save(&self, token: &Token) -> Result<()>;

    /// Remove the token with the given content. Removing an unknown token is not an error.
    async fn remove(&self, content: &str) -> Result<()>;

    /// Record the rate-limit quota last reported for a token.
    ///
    /// Stores that do not track quotas may ignore the call.
    async fn update_rate(&self, content: &str, rate: RateSnapshot) -> Result<()> {
        let _ = (content, rate);
        Ok(())
    }
}
