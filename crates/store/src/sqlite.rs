//! SQLite-backed token store using sqlx.
//!
//! Schema: `tokens(id, content, kind, description, rate_limit, rate_remaining,
//! rate_reset, created_at, updated_at)` with a unique constraint on `content`.

use async_trait::async_trait;
use gitscout_types::{
    RateSnapshot, ScoutError, Token, TokenKind, TokenStore, error::Result,
};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;

type TokenRow = (
    String,
    String,
    Option<String>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
);

/// A persistent [`TokenStore`] backed by `SQLite`.
pub struct SqliteTokenStore {
    pool: SqlitePool,
}

impl SqliteTokenStore {
    /// Connects to a `SQLite` database (e.g. `"sqlite:./tokens.db"` or `"sqlite::memory:"`).
    ///
    /// Creates the database file if it does not exist and ensures the schema.
    ///
    /// # Errors
    ///
    /// Returns a [`sqlx::Error`] if the connection or table creation fails.
    pub async fn new(database_url: &str) -> std::result::Result<Self, sqlx::Error> {
        let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `:memory:` opens its own empty database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;
        Self::migrate(&pool).await?;
        tracing::debug!(url = database_url, "token store ready");
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tokens (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                content         TEXT    NOT NULL UNIQUE,
                kind            TEXT    NOT NULL,
                description     TEXT,
                rate_limit      INTEGER,
                rate_remaining  INTEGER,
                rate_reset      INTEGER,
                created_at      INTEGER NOT NULL DEFAULT (unixepoch()),
                updated_at      INTEGER NOT NULL DEFAULT (unixepoch())
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tokens_kind ON tokens(kind)")
            .execute(pool)
            .await?;

        Ok(())
    }
}

fn row_to_token(row: TokenRow) -> Result<Token> {
    let (content, kind, description, limit, remaining, reset) = row;
    let kind = TokenKind::from_str(&kind)?;
    let rate = match (limit, remaining, reset) {
        (Some(limit), Some(remaining), Some(reset)) => Some(RateSnapshot {
            limit: u32::try_from(limit).unwrap_or(0),
            remaining: u32::try_from(remaining).unwrap_or(0),
            reset_at: u64::try_from(reset).unwrap_or(0),
        }),
        _ => None,
    };
    Ok(Token {
        content,
        kind,
        description,
        rate,
    })
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn list_by_kind(&self, kind: TokenKind) -> Result<Vec<Token>> {
        let rows: Vec<TokenRow> = sqlx::query_as(
            "SELECT content, kind, description, rate_limit, rate_remaining, rate_reset
             FROM tokens WHERE kind = ? ORDER BY id",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_token).collect()
    }

    async fn save(&self, token: &Token) -> Result<()> {
        sqlx::query(
            "INSERT INTO tokens (content, kind, description)
             VALUES (?, ?, ?)
             ON CONFLICT(content) DO UPDATE SET
                 kind = excluded.kind,
                 description = COALESCE(excluded.description, tokens.description),
                 updated_at = unixepoch()",
        )
        .bind(&token.content)
        .bind(token.kind.as_str())
        .bind(token.description.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, content: &str) -> Result<()> {
        sqlx::query("DELETE FROM tokens WHERE content = ?")
            .bind(content)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_rate(&self, content: &str, rate: RateSnapshot) -> Result<()> {
        let reset = i64::try_from(rate.reset_at)
            .map_err(|_| ScoutError::Storage(format!("reset time out of range: {}", rate.reset_at)))?;
        sqlx::query(
            "UPDATE tokens SET rate_limit = ?, rate_remaining = ?, rate_reset = ?,
                 updated_at = unixepoch()
             WHERE content = ?",
        )
        .bind(i64::from(rate.limit))
        .bind(i64::from(rate.remaining))
        .bind(reset)
        .bind(content)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
