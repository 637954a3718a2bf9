//! GitHub REST client wrapper with a token-keyed client pool.
//!
//! [`ClientFactory`] turns stored tokens into authenticated [`Client`]s that
//! share one HTTP transport. [`ClientPool`] re-reads the token store on every
//! [`ClientPool::get_client`] call, rebuilds the client map, and hands out one
//! client according to its [`SelectionPolicy`]. Each lookup on [`Client`]
//! issues exactly one GET and returns the payload, the [`Response`] metadata,
//! or the [`ApiError`] untouched.

pub mod api;
pub mod client;
pub mod error;
pub mod factory;
pub mod models;
pub mod pool;
pub mod response;
pub mod transport;

pub use api::GithubApi;
pub use client::Client;
pub use error::ApiError;
pub use factory::{ClientFactory, ClientMap};
pub use gitscout_config::SelectionPolicy;
pub use models::{Organization, Repository, User};
pub use pool::ClientPool;
pub use response::{Rate, Response};
pub use transport::HttpSettings;
