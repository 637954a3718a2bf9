//! Configuration loading for gitscout.
//!
//! Uses figment to layer built-in defaults, an optional YAML file, and
//! `GITSCOUT_`-prefixed environment variables.

pub mod schema;

pub use schema::{Config, GithubConfig, LogConfig, SelectionPolicy};
