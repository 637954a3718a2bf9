use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use gitscout_config::{Config, LogConfig};
use gitscout_github::{ApiError, Client, ClientFactory, ClientPool, HttpSettings, Response};
use gitscout_store::SqliteTokenStore;
use gitscout_types::{Token, TokenKind, TokenStore};
use serde::Serialize;
use std::{path::PathBuf, sync::Arc};

#[derive(Parser, Debug)]
#[command(name = "gitscout", about = "GitHub metadata lookups over a pool of tokens")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// SQLite token database (default: ~/.gitscout/tokens.db).
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage stored tokens.
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    #[command(flatten)]
    Lookup(Lookup),
}

/// One GitHub lookup, made with a client drawn from the token pool.
#[derive(Subcommand, Debug)]
enum Lookup {
    /// Show a user's profile (empty name: the token's own account).
    User { username: String },
    /// List members of an organization (first page).
    OrgMembers { org: String },
    /// List repositories of an organization (first page).
    OrgRepos { org: String },
    /// List repositories of a user (first page).
    UserRepos { username: String },
    /// List organizations a user belongs to (first page).
    UserOrgs { username: String },
}

#[derive(Subcommand, Debug)]
enum TokenAction {
    /// Store a token (updates the description if it already exists).
    Add {
        content: String,
        /// Platform the token belongs to.
        #[arg(long, default_value = "github")]
        kind: TokenKind,
        /// Free-form note shown by `token list`.
        #[arg(long)]
        desc: Option<String>,
    },
    /// List stored tokens with their last known quota.
    List {
        #[arg(long, default_value = "github")]
        kind: TokenKind,
    },
    /// Remove a stored token.
    Remove { content: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("config error: {e}"))?;
    init_tracing(&config.log);

    let db = cli.db.or_else(|| config.database.clone());
    let store: Arc<dyn TokenStore> = Arc::new(open_store(db).await?);

    match cli.command {
        Commands::Token { action } => cmd_token(action, store.as_ref()).await,
        Commands::Lookup(lookup) => cmd_lookup(lookup, &config, store).await,
    }
}

fn init_tracing(log: &LogConfig) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    // stdout carries command output; logs go to stderr.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn cmd_token(action: TokenAction, store: &dyn TokenStore) -> Result<()> {
    match action {
        TokenAction::Add {
            content,
            kind,
            desc,
        } => {
            if content.is_empty() {
                anyhow::bail!("token content must not be empty");
            }
            let mut token = Token::new(kind, content);
            token.description = desc;
            store.save(&token).await.context("failed to save token")?;
            eprintln!("{kind} token {} saved", token.masked());
        }
        TokenAction::List { kind } => {
            let tokens = store
                .list_by_kind(kind)
                .await
                .context("failed to list tokens")?;
            if tokens.is_empty() {
                eprintln!("no {kind} tokens stored");
            }
            for token in tokens {
                let quota = token.rate.map_or_else(
                    || "-".to_string(),
                    |r| format!("{}/{} (reset {})", r.remaining, r.limit, r.reset_at),
                );
                println!(
                    "{kind}\t{}\t{quota}\t{}",
                    token.masked(),
                    token.description.as_deref().unwrap_or("")
                );
            }
        }
        TokenAction::Remove { content } => {
            store
                .remove(&content)
                .await
                .context("failed to remove token")?;
            eprintln!("token removed");
        }
    }
    Ok(())
}

async fn cmd_lookup(lookup: Lookup, config: &Config, store: Arc<dyn TokenStore>) -> Result<()> {
    let factory = ClientFactory::new(HttpSettings::from(&config.github))
        .context("failed to build http client")?;
    let pool = ClientPool::new(Arc::clone(&store), factory, config.selection);
    let client = pool.get_client().await?;
    tracing::debug!(client = ?client, policy = ?pool.policy(), "client selected");

    let store = store.as_ref();
    match lookup {
        Lookup::User { username } => {
            finish(&client, store, client.get_user_info(&username).await).await
        }
        Lookup::OrgMembers { org } => {
            finish(&client, store, client.get_orgs_members(&org).await).await
        }
        Lookup::OrgRepos { org } => {
            finish(&client, store, client.get_orgs_repos(&org).await).await
        }
        Lookup::UserRepos { username } => {
            finish(&client, store, client.get_user_repos(&username).await).await
        }
        Lookup::UserOrgs { username } => {
            finish(&client, store, client.get_user_orgs(&username).await).await
        }
    }
}

/// Record the reported quota, then print the payload as JSON.
async fn finish<T: Serialize>(
    client: &Client,
    store: &dyn TokenStore,
    result: std::result::Result<(T, Response), ApiError>,
) -> Result<()> {
    let response = match &result {
        Ok((_, response)) => Some(response),
        Err(err) => err.response(),
    };
    if let Some(response) = response
        && let Err(e) = client.record_rate(store, response).await
    {
        tracing::warn!(error = %e, "failed to record rate limit");
    }

    let (payload, response) = result.context("github request failed")?;
    tracing::info!(
        status = response.status,
        next_page = ?response.next_page,
        remaining = ?response.rate.map(|r| r.remaining),
        "lookup complete"
    );
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

async fn open_store(db: Option<PathBuf>) -> Result<SqliteTokenStore> {
    let path = db.unwrap_or_else(default_db_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let url = format!("sqlite://{}", path.display());
    SqliteTokenStore::new(&url)
        .await
        .map_err(|e| anyhow::anyhow!("database error: {e}"))
}

fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".gitscout").join("tokens.db")
}
