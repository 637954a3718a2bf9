//! The REST layer: one authenticated handle issuing GETs against the API root.
//!
//! Mirrors the send → status-check → decode flow of a provider HTTP helper,
//! but keeps the platform's error shape instead of collapsing it.

use crate::{
    error::ApiError,
    models::{Organization, Repository, User},
    response::Response,
    transport::HttpSettings,
};
use reqwest::{StatusCode, header::ACCEPT};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Media type GitHub recommends for REST v3 requests.
const MEDIA_TYPE: &str = "application/vnd.github+json";

/// REST API version pinned on every request.
pub const API_VERSION: &str = "2022-11-28";

/// An authenticated handle to the GitHub REST API.
#[derive(Clone)]
pub struct GithubApi {
    http: reqwest::Client,
    settings: Arc<HttpSettings>,
    token: String,
}

impl GithubApi {
    /// Creates a handle that authenticates every request with `token`.
    #[must_use]
    pub fn new(http: reqwest::Client, settings: Arc<HttpSettings>, token: impl Into<String>) -> Self {
        Self {
            http,
            settings,
            token: token.into(),
        }
    }

    /// Settings of the transport this handle sends through.
    #[must_use]
    pub fn settings(&self) -> &HttpSettings {
        &self.settings
    }

    /// Issues one authenticated GET for `path` (relative to the API root)
    /// and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; every failure mode is returned as-is.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<(T, Response), ApiError> {
        let url = format!(
            "{}/{}",
            self.settings.api_base_url,
            path.trim_start_matches('/')
        );
        tracing::debug!(url = %url, "github request");

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, MEDIA_TYPE)
            .header("x-github-api-version", API_VERSION)
            .send()
            .await?;

        let status = resp.status();
        let meta = Response::from_parts(status, resp.headers());
        let body = resp.bytes().await?;

        if !status.is_success() {
            return Err(error_for_status(url, status, meta, &body));
        }

        match serde_json::from_slice(&body) {
            Ok(payload) => Ok((payload, meta)),
            Err(source) => Err(ApiError::Decode {
                url,
                source,
                response: Box::new(meta),
            }),
        }
    }

    /// `GET /users/{username}`, or `GET /user` for the token's own account
    /// when `username` is empty.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the underlying call.
    pub async fn get_user(&self, username: &str) -> Result<(User, Response), ApiError> {
        if username.is_empty() {
            self.get("user").await
        } else {
            self.get(&format!("users/{username}")).await
        }
    }

    /// `GET /orgs/{org}/members`, first page only.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the underlying call.
    pub async fn list_org_members(&self, org: &str) -> Result<(Vec<User>, Response), ApiError> {
        self.get(&format!("orgs/{org}/members")).await
    }

    /// `GET /orgs/{org}/repos`, first page only.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the underlying call.
    pub async fn list_org_repos(&self, org: &str) -> Result<(Vec<Repository>, Response), ApiError> {
        self.get(&format!("orgs/{org}/repos")).await
    }

    /// `GET /users/{username}/repos`, first page only. An empty `username`
    /// lists the repositories of the token's own account (`GET /user/repos`).
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the underlying call.
    pub async fn list_user_repos(
        &self,
        username: &str,
    ) -> Result<(Vec<Repository>, Response), ApiError> {
        if username.is_empty() {
            self.get("user/repos").await
        } else {
            self.get(&format!("users/{username}/repos")).await
        }
    }

    /// `GET /users/{username}/orgs`, first page only. An empty `username`
    /// lists the organizations of the token's own account (`GET /user/orgs`).
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the underlying call.
    pub async fn list_user_orgs(
        &self,
        username: &str,
    ) -> Result<(Vec<Organization>, Response), ApiError> {
        if username.is_empty() {
            self.get("user/orgs").await
        } else {
            self.get(&format!("users/{username}/orgs")).await
        }
    }
}

/// Classify a non-success response.
///
/// An exhausted quota (403 or 429 with `X-RateLimit-Remaining: 0`) becomes
/// [`ApiError::RateLimited`]; anything else is [`ApiError::Status`].
fn error_for_status(url: String, status: StatusCode, meta: Response, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

    let exhausted = matches!(
        status,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    ) && meta.rate.is_some_and(|r| r.remaining == 0);

    match meta.rate {
        Some(rate) if exhausted => ApiError::RateLimited {
            url,
            rate,
            message,
            response: Box::new(meta),
        },
        _ => ApiError::Status {
            url,
            status: status.as_u16(),
            message,
            response: Box::new(meta),
        },
    }
}
