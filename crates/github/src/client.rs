//! A token-bound client exposing the lookups the scanner needs.

use crate::{
    api::GithubApi,
    error::ApiError,
    models::{Organization, Repository, User},
    response::Response,
    transport::HttpSettings,
};
use gitscout_types::{TokenStore, mask};
use std::fmt;

/// Pairs a REST handle with the token it was built from.
///
/// Cloning is cheap: the underlying HTTP transport is shared.
#[derive(Clone)]
pub struct Client {
    api: GithubApi,
    token: String,
}

impl Client {
    #[must_use]
    pub fn new(api: GithubApi, token: impl Into<String>) -> Self {
        Self {
            api,
            token: token.into(),
        }
    }

    /// The token this client authenticates with.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The underlying REST handle, for endpoints not wrapped here.
    #[must_use]
    pub fn api(&self) -> &GithubApi {
        &self.api
    }

    /// Transport settings in effect for this client.
    #[must_use]
    pub fn settings(&self) -> &HttpSettings {
        self.api.settings()
    }

    /// Fetch a single user's profile.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the underlying call unchanged.
    pub async fn get_user_info(&self, username: &str) -> Result<(User, Response), ApiError> {
        self.api.get_user(username).await
    }

    /// List members of an organization (first page).
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the underlying call unchanged.
    pub async fn get_orgs_members(&self, org: &str) -> Result<(Vec<User>, Response), ApiError> {
        self.api.list_org_members(org).await
    }

    /// List repositories owned by an organization (first page).
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the underlying call unchanged.
    pub async fn get_orgs_repos(&self, org: &str) -> Result<(Vec<Repository>, Response), ApiError> {
        self.api.list_org_repos(org).await
    }

    /// List repositories owned by a user (first page).
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the underlying call unchanged.
    pub async fn get_user_repos(
        &self,
        username: &str,
    ) -> Result<(Vec<Repository>, Response), ApiError> {
        self.api.list_user_repos(username).await
    }

    /// List organizations a user belongs to (first page).
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the underlying call unchanged.
    pub async fn get_user_orgs(
        &self,
        username: &str,
    ) -> Result<(Vec<Organization>, Response), ApiError> {
        self.api.list_user_orgs(username).await
    }

    /// Store the quota reported in `response` against this client's token.
    /// Does nothing when the response carried no rate headers.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the update fails.
    pub async fn record_rate(
        &self,
        store: &dyn TokenStore,
        response: &Response,
    ) -> gitscout_types::error::Result<()> {
        let Some(rate) = response.rate else {
            return Ok(());
        };
        tracing::debug!(
            token = %mask(&self.token),
            remaining = rate.remaining,
            limit = rate.limit,
            "recording github rate limit"
        );
        store.update_rate(&self.token, rate.snapshot()).await
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("token", &mask(&self.token))
            .field("base_url", &self.settings().api_base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Rate;
    use gitscout_store::InMemoryTokenStore;
    use gitscout_types::{Token, TokenKind};
    use std::sync::Arc;

    fn client(token: &str) -> Client {
        let settings = Arc::new(HttpSettings::default());
        let api = GithubApi::new(reqwest::Client::new(), settings, token);
        Client::new(api, token)
    }

    #[test]
    fn test_debug_masks_token() {
        let rendered = format!("{:?}", client("ghp_supersecret1234"));
        assert!(!rendered.contains("supersecret"));
        assert!(rendered.contains("1234"));
    }

    #[tokio::test]
    async fn test_record_rate_updates_store() {
        let store = InMemoryTokenStore::new();
        store.save(&Token::github("tok-a")).await.unwrap();
        let response = Response {
            status: 200,
            rate: Some(Rate {
                limit: 5000,
                remaining: 4000,
                reset: 1_700_000_000,
            }),
            ..Response::default()
        };
        client("tok-a").record_rate(&store, &response).await.unwrap();
        let stored = store.list_by_kind(TokenKind::Github).await.unwrap();
        assert_eq!(stored[0].rate.map(|r| r.remaining), Some(4000));
    }

    #[tokio::test]
    async fn test_record_rate_without_headers_is_noop() {
        let store = InMemoryTokenStore::new();
        store.save(&Token::github("tok-a")).await.unwrap();
        client("tok-a")
            .record_rate(&store, &Response::default())
            .await
            .unwrap();
        let stored = store.list_by_kind(TokenKind::Github).await.unwrap();
        assert!(stored[0].rate.is_none());
    }
}
