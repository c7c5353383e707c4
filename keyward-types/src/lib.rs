//! Core type definitions for keyward.
//!
//! This crate defines the identifier types every other keyward crate
//! depends on:
//! - [`Key`], [`KeyId`] and [`Partition`], the hierarchical datastore key
//! - the legacy token codec ([`Key::to_legacy_token`], [`parse_key_token`])
//! - [`TransactionId`] (UUID v4)

mod ids;
mod key;
mod token;

pub use ids::TransactionId;
pub use key::{Key, KeyId, Partition};
pub use token::{parse_key_token, TokenError};
