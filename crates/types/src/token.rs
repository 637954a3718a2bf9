//! Token records as handed out by a [`TokenStore`](crate::TokenStore).

use crate::TokenKind;
use serde::{Deserialize, Serialize};

/// A stored credential plus the metadata the store keeps about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The opaque credential string. Empty content marks an unusable record.
    pub content: String,
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Last rate-limit snapshot observed for this token, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<RateSnapshot>,
}

impl Token {
    /// Create a token of the given kind with no description or rate data.
    pub fn new(kind: TokenKind, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind,
            description: None,
            rate: None,
        }
    }

    /// Shorthand for a GitHub token.
    pub fn github(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Github, content)
    }

    /// Attach a human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// `true` if the record carries a credential that can be used.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.content.is_empty()
    }

    /// The credential with all but the last four characters hidden.
    #[must_use]
    pub fn masked(&self) -> String {
        mask(&self.content)
    }
}

/// Hide all but the last four characters of a secret, for logs and listings.
#[must_use]
pub fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

/// Rate-limit quota last reported by the platform for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub limit: u32,
    pub remaining: u32,
    /// Unix timestamp (seconds) at which the quota resets.
    pub reset_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_unusable() {
        assert!(!Token::github("").is_usable());
        assert!(Token::github("ghp_abc").is_usable());
    }

    #[test]
    fn test_masked_keeps_tail() {
        let t = Token::github("ghp_123456789");
        assert_eq!(t.masked(), "*********6789");
        assert_eq!(Token::github("abc").masked(), "***");
    }

    #[test]
    fn test_serde_skips_none() {
        let t = Token::github("tok");
        let json = serde_json::to_string(&t).unwrap();
        assert!(!json.contains("description"));
        assert!(!json.contains("rate"));
        assert!(json.contains("\"kind\":\"github\""));
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let t: Token = serde_json::from_str(r#"{"content":"x","kind":"gitlab"}"#).unwrap();
        assert_eq!(t.kind, TokenKind::Gitlab);
        assert!(t.description.is_none());
        assert!(t.rate.is_none());
    }
}
