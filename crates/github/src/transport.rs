//! HTTP transport construction for GitHub requests.

use crate::error::ApiError;
use gitscout_config::GithubConfig;
use std::time::Duration;

/// Transport settings shared by every client built from one factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// REST API root without a trailing slash.
    pub api_base_url: String,
    /// When `true`, server certificates are not verified.
    pub accept_invalid_certs: bool,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl From<&GithubConfig> for HttpSettings {
    fn from(config: &GithubConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            accept_invalid_certs: config.accept_invalid_certs,
            user_agent: config.user_agent.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::from(&GithubConfig::default())
    }
}

impl HttpSettings {
    /// Same settings, pointed at a different API root.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Build the HTTP client all GitHub calls go through.
///
/// # Errors
///
/// Returns [`ApiError::Transport`] if the TLS backend cannot be initialized.
pub fn build_http_client(settings: &HttpSettings) -> Result<reqwest::Client, ApiError> {
    if settings.accept_invalid_certs {
        tracing::warn!(
            base_url = %settings.api_base_url,
            "TLS certificate verification is disabled for GitHub requests"
        );
    }
    let mut builder = reqwest::Client::builder()
        .danger_accept_invalid_certs(settings.accept_invalid_certs)
        .user_agent(settings.user_agent.as_str());
    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(ApiError::Transport)
}
