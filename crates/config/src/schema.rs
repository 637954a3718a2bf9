use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix; nested keys are separated by `__`
/// (e.g. `GITSCOUT_GITHUB__API_BASE_URL`).
pub const ENV_PREFIX: &str = "GITSCOUT_";

fn default_true() -> bool {
    true
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    concat!("gitscout/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Settings for the GitHub REST transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubConfig {
    /// REST API root (defaults to `https://api.github.com`).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Skip TLS certificate verification on outbound calls.
    ///
    /// Defaults to `true` so that scans work against hosts with self-signed
    /// certificates. This leaves connections open to interception; set it to
    /// `false` wherever the platform presents a trusted certificate.
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds. `None` leaves requests unbounded.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            accept_invalid_certs: true,
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

/// How a client is picked from the pool when several tokens are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Cycle through clients ordered by token content.
    #[default]
    RoundRobin,
    /// Take whichever client the map yields first. No rotation is guaranteed.
    Arbitrary,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Logging output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub selection: SelectionPolicy,
    /// `SQLite` token database path (defaults to `~/.gitscout/tokens.db`).
    #[serde(default)]
    pub database: Option<PathBuf>,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration from a file path, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &Path) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
    }

    /// Loads defaults, then the optional YAML file, then `GITSCOUT_*`
    /// environment variables, each layer overriding the previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if any layer fails to parse.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Env, Format as _, Serialized, Yaml},
        };
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = r#"
github:
  api_base_url: "https://ghe.example.com/api/v3"
  accept_invalid_certs: false
  timeout_secs: 30
selection: arbitrary
database: "/var/lib/gitscout/tokens.db"
log:
  level: debug
  json: true
"#;

    #[test]
    fn test_default_config() {
        let c = Config::default();
        assert_eq!(c.github.api_base_url, "https://api.github.com");
        assert!(c.github.accept_invalid_certs);
        assert!(c.github.user_agent.starts_with("gitscout/"));
        assert!(c.github.timeout_secs.is_none());
        assert_eq!(c.selection, SelectionPolicy::RoundRobin);
        assert!(c.database.is_none());
        assert_eq!(c.log.level, "info");
    }

    #[test]
    fn test_from_yaml_full() {
        let c = Config::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(c.github.api_base_url, "https://ghe.example.com/api/v3");
        assert!(!c.github.accept_invalid_certs);
        assert_eq!(c.github.timeout_secs, Some(30));
        assert_eq!(c.selection, SelectionPolicy::Arbitrary);
        assert_eq!(
            c.database.as_deref(),
            Some(Path::new("/var/lib/gitscout/tokens.db"))
        );
        assert_eq!(c.log.level, "debug");
        assert!(c.log.json);
    }

    #[test]
    fn test_from_yaml_defaults_applied() {
        let c = Config::from_yaml("selection: arbitrary").unwrap();
        assert_eq!(c.selection, SelectionPolicy::Arbitrary);
        assert!(c.github.accept_invalid_certs); // default preserved
        assert_eq!(c.github.api_base_url, "https://api.github.com");
    }

    #[test]
    fn test_from_yaml_rejects_unknown_policy() {
        assert!(Config::from_yaml("selection: lottery").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gitscout.yaml");
        std::fs::write(&path, "github:\n  user_agent: scanner/1.0\n").unwrap();
        let c = Config::from_file(&path).unwrap();
        assert_eq!(c.github.user_agent, "scanner/1.0");
    }

    #[test]
    fn test_load_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("gitscout.yaml", "github:\n  accept_invalid_certs: true\n")?;
            jail.set_env("GITSCOUT_GITHUB__ACCEPT_INVALID_CERTS", "false");
            jail.set_env("GITSCOUT_SELECTION", "arbitrary");
            let c = Config::load(Some(Path::new("gitscout.yaml")))?;
            assert!(!c.github.accept_invalid_certs);
            assert_eq!(c.selection, SelectionPolicy::Arbitrary);
            Ok(())
        });
    }

    #[test]
    fn test_load_without_file() {
        figment::Jail::expect_with(|_jail| {
            let c = Config::load(None)?;
            assert_eq!(c, Config::default());
            Ok(())
        });
    }
}
