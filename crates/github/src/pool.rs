//! Client pool: re-reads the token store and hands out one client per call.

use crate::{
    client::Client,
    factory::{ClientFactory, ClientMap},
};
use arc_swap::ArcSwap;
use gitscout_config::SelectionPolicy;
use gitscout_types::{ScoutError, TokenKind, TokenStore, error::Result};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Owns the token store, the factory, and the most recently built client map.
///
/// Every [`get_client`](Self::get_client) call fetches tokens afresh and
/// rebuilds the whole map; concurrent calls each do their own fetch and the
/// last one to finish is what [`clients`](Self::clients) reports.
pub struct ClientPool {
    store: Arc<dyn TokenStore>,
    factory: ClientFactory,
    policy: SelectionPolicy,
    current: ArcSwap<ClientMap>,
    /// Round-robin cursor.
    cursor: AtomicUsize,
}

impl ClientPool {
    pub fn new(store: Arc<dyn TokenStore>, factory: ClientFactory, policy: SelectionPolicy) -> Self {
        Self {
            store,
            factory,
            policy,
            current: ArcSwap::from_pointee(ClientMap::new()),
            cursor: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    #[must_use]
    pub fn factory(&self) -> &ClientFactory {
        &self.factory
    }

    /// Snapshot of the map built by the latest [`get_client`](Self::get_client) call.
    #[must_use]
    pub fn clients(&self) -> Arc<ClientMap> {
        self.current.load_full()
    }

    /// Fetch the GitHub tokens, rebuild the client map and select one client.
    ///
    /// # Errors
    ///
    /// - [`ScoutError::TokenFetch`] if the token store fails.
    /// - [`ScoutError::NoTokenConfigured`] if no token has usable content.
    pub async fn get_client(&self) -> Result<Client> {
        let tokens = self
            .store
            .list_by_kind(TokenKind::Github)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "failed to fetch github tokens");
                ScoutError::TokenFetch(e.to_string())
            })?;

        let clients = self.factory.init_clients(&tokens);
        let selected = self.select(&clients);
        self.current.store(Arc::new(clients));
        selected.ok_or(ScoutError::NoTokenConfigured)
    }

    fn select(&self, clients: &ClientMap) -> Option<Client> {
        match self.policy {
            // HashMap iteration order; which client comes first is unspecified.
            SelectionPolicy::Arbitrary => clients.values().next().cloned(),
            SelectionPolicy::RoundRobin => {
                if clients.is_empty() {
                    return None;
                }
                let mut keys: Vec<&String> = clients.keys().collect();
                keys.sort();
                let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % keys.len();
                clients.get(keys[idx]).cloned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpSettings;
    use async_trait::async_trait;
    use gitscout_store::InMemoryTokenStore;
    use gitscout_types::{Token, TokenKind};

    struct FailingStore;

    #[async_trait]
    impl TokenStore for FailingStore {
        async fn list_by_kind(&self, _kind: TokenKind) -> Result<Vec<Token>> {
            Err(ScoutError::Storage("database is locked".into()))
        }
        async fn save(&self, _token: &Token) -> Result<()> {
            Ok(())
        }
        async fn remove(&self, _content: &str) -> Result<()> {
            Ok(())
        }
    }

    fn pool(tokens: Vec<Token>, policy: SelectionPolicy) -> ClientPool {
        let factory = ClientFactory::new(HttpSettings::default()).unwrap();
        ClientPool::new(
            Arc::new(InMemoryTokenStore::with_tokens(tokens)),
            factory,
            policy,
        )
    }

    #[tokio::test]
    async fn test_empty_store_is_no_token_configured() {
        let p = pool(vec![], SelectionPolicy::RoundRobin);
        let err = p.get_client().await.unwrap_err();
        assert!(matches!(err, ScoutError::NoTokenConfigured));
    }

    #[tokio::test]
    async fn test_only_empty_tokens_is_no_token_configured() {
        let p = pool(
            vec![Token::github(""), Token::github("")],
            SelectionPolicy::Arbitrary,
        );
        assert!(matches!(
            p.get_client().await.unwrap_err(),
            ScoutError::NoTokenConfigured
        ));
        assert!(p.clients().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_token_fetch() {
        let factory = ClientFactory::new(HttpSettings::default()).unwrap();
        let p = ClientPool::new(Arc::new(FailingStore), factory, SelectionPolicy::RoundRobin);
        let err = p.get_client().await.unwrap_err();
        assert!(matches!(err, ScoutError::TokenFetch(ref msg) if msg.contains("database is locked")));
    }

    #[tokio::test]
    async fn test_ignores_other_kinds() {
        let p = pool(
            vec![Token::new(TokenKind::Gitlab, "gl-token")],
            SelectionPolicy::Arbitrary,
        );
        assert!(matches!(
            p.get_client().await.unwrap_err(),
            ScoutError::NoTokenConfigured
        ));
    }

    #[tokio::test]
    async fn test_arbitrary_returns_a_stored_token() {
        let p = pool(
            vec![Token::github("a"), Token::github("b")],
            SelectionPolicy::Arbitrary,
        );
        let client = p.get_client().await.unwrap();
        assert!(["a", "b"].contains(&client.token()));
        assert_eq!(p.clients().len(), 2);
    }

    #[tokio::test]
    async fn test_round_robin_cycles_in_token_order() {
        let p = pool(
            vec![Token::github("c"), Token::github("a"), Token::github("b")],
            SelectionPolicy::RoundRobin,
        );
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(p.get_client().await.unwrap().token().to_string());
        }
        assert_eq!(seen, ["a", "b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_map_rebuilt_on_each_call() {
        let store = Arc::new(InMemoryTokenStore::new());
        store.save(&Token::github("first")).await.unwrap();
        let shared: Arc<dyn TokenStore> = store.clone();
        let factory = ClientFactory::new(HttpSettings::default()).unwrap();
        let p = ClientPool::new(shared, factory, SelectionPolicy::RoundRobin);

        p.get_client().await.unwrap();
        assert_eq!(p.clients().len(), 1);

        store.save(&Token::github("second")).await.unwrap();
        p.get_client().await.unwrap();
        assert_eq!(p.clients().len(), 2);

        store.remove("first").await.unwrap();
        store.remove("second").await.unwrap();
        assert!(p.get_client().await.is_err());
        assert!(p.clients().is_empty());
    }
}
