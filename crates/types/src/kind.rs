//! Token kinds: which hosting platform a credential belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the platform a stored token authenticates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Github,
    Gitlab,
    Gitee,
    Searchcode,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenKind {
    type Err = crate::ScoutError;

    /// Parse a kind name (case-insensitive) into a [`TokenKind`].
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::UnknownTokenKind`](crate::ScoutError::UnknownTokenKind)
    /// if the string does not name a known platform.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" | "gh" => Ok(Self::Github),
            "gitlab" => Ok(Self::Gitlab),
            "gitee" => Ok(Self::Gitee),
            "searchcode" => Ok(Self::Searchcode),
            _ => Err(crate::ScoutError::UnknownTokenKind(s.to_string())),
        }
    }
}

impl TokenKind {
    /// The storage key for this kind, e.g. `"github"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Gitee => "gitee",
            Self::Searchcode => "searchcode",
        }
    }

    /// Returns all known kinds.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Github, Self::Gitlab, Self::Gitee, Self::Searchcode]
    }
}
