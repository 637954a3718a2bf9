//! Core types and traits for the gitscout workspace.
//!
//! Defines the token record handed out by token stores, the unified error
//! type, and the [`TokenStore`] trait that storage backends implement and
//! the GitHub client pool consumes.

pub mod error;
pub mod kind;
pub mod token;
pub mod traits;

pub use error::ScoutError;
pub use kind::TokenKind;
pub use token::{RateSnapshot, Token, mask};
pub use traits::TokenStore;
