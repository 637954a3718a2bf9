//! In-memory token store backed by a `Vec` behind a `Mutex`.

use async_trait::async_trait;
use gitscout_types::{
    RateSnapshot, ScoutError, Token, TokenKind, TokenStore, error::Result,
};
use std::sync::{Mutex, MutexGuard};

/// An in-memory [`TokenStore`] for testing and ephemeral use.
///
/// Tokens keep the order they were first saved in.
pub struct InMemoryTokenStore {
    data: Mutex<Vec<Token>>,
}

impl InMemoryTokenStore {
    /// Creates a new empty in-memory token store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Mutex::new(Vec::new()),
        }
    }

    /// Creates a store pre-seeded with the given records, kept as-is
    /// (duplicates and empty content included).
    #[must_use]
    pub fn with_tokens(tokens: Vec<Token>) -> Self {
        Self {
            data: Mutex::new(tokens),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Token>>> {
        self.data
            .lock()
            .map_err(|_| ScoutError::Storage("token store lock poisoned".into()))
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn list_by_kind(&self, kind: TokenKind) -> Result<Vec<Token>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|t| t.kind == kind)
            .cloned()
            .collect())
    }

    async fn save(&self, token: &Token) -> Result<()> {
        let mut data = self.lock()?;
        if let Some(existing) = data.iter_mut().find(|t| t.content == token.content) {
            existing.kind = token.kind;
            if token.description.is_some() {
                existing.description.clone_from(&token.description);
            }
        } else {
            data.push(token.clone());
        }
        Ok(())
    }

    async fn remove(&self, content: &str) -> Result<()> {
        self.lock()?.retain(|t| t.content != content);
        Ok(())
    }

    async fn update_rate(&self, content: &str, rate: RateSnapshot) -> Result<()> {
        for token in self.lock()?.iter_mut().filter(|t| t.content == content) {
            token.rate = Some(rate);
        }
        Ok(())
    }
}
