//! Client factory: turns token records into authenticated clients.

use crate::{
    api::GithubApi,
    client::Client,
    error::ApiError,
    transport::{HttpSettings, build_http_client},
};
use gitscout_types::Token;
use std::{collections::HashMap, sync::Arc};

/// Clients keyed by the token content they authenticate with.
pub type ClientMap = HashMap<String, Client>;

/// Builds clients that all share one HTTP transport.
#[derive(Clone)]
pub struct ClientFactory {
    http: reqwest::Client,
    settings: Arc<HttpSettings>,
}

impl ClientFactory {
    /// Builds the shared transport from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(settings: HttpSettings) -> Result<Self, ApiError> {
        let http = build_http_client(&settings)?;
        Ok(Self {
            http,
            settings: Arc::new(settings),
        })
    }

    #[must_use]
    pub fn settings(&self) -> &HttpSettings {
        &self.settings
    }

    /// Build a single client for `token`.
    #[must_use]
    pub fn client_for(&self, token: &str) -> Client {
        let api = GithubApi::new(self.http.clone(), Arc::clone(&self.settings), token);
        Client::new(api, token)
    }

    /// Build one client per distinct non-empty token content.
    ///
    /// Records with empty content are skipped; repeated content yields a
    /// single entry.
    #[must_use]
    pub fn init_clients(&self, tokens: &[Token]) -> ClientMap {
        let mut clients = ClientMap::with_capacity(tokens.len());
        for token in tokens.iter().filter(|t| t.is_usable()) {
            clients
                .entry(token.content.clone())
                .or_insert_with(|| self.client_for(&token.content));
        }
        tracing::debug!(
            records = tokens.len(),
            clients = clients.len(),
            "github clients initialized"
        );
        clients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> ClientFactory {
        ClientFactory::new(HttpSettings::default()).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(factory().init_clients(&[]).is_empty());
    }

    #[test]
    fn test_all_empty_content() {
        let tokens = vec![Token::github(""), Token::github(""), Token::github("")];
        assert!(factory().init_clients(&tokens).is_empty());
    }

    #[test]
    fn test_one_entry_per_distinct_token() {
        let tokens = vec![
            Token::github("tok-a"),
            Token::github(""),
            Token::github("tok-b"),
            Token::github("tok-a"),
        ];
        let clients = factory().init_clients(&tokens);
        assert_eq!(clients.len(), 2);
        assert_eq!(clients["tok-a"].token(), "tok-a");
        assert_eq!(clients["tok-b"].token(), "tok-b");
    }

    #[test]
    fn test_every_client_skips_tls_verification_by_default() {
        let tokens = vec![Token::github("a"), Token::github("b"), Token::github("c")];
        let clients = factory().init_clients(&tokens);
        assert_eq!(clients.len(), 3);
        for client in clients.values() {
            assert!(client.settings().accept_invalid_certs);
        }
    }

    #[test]
    fn test_strict_settings_propagate() {
        let settings = HttpSettings {
            accept_invalid_certs: false,
            ..HttpSettings::default()
        };
        let factory = ClientFactory::new(settings).unwrap();
        let client = factory.client_for("tok");
        assert!(!client.settings().accept_invalid_certs);
    }
}
