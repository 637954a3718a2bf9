//! Token storage backends.
//!
//! Provides an in-memory store for tests and ephemeral use, and a
//! SQLite-backed store for the CLI.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryTokenStore;
pub use sqlite::SqliteTokenStore;
