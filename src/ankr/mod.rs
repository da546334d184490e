//! Ankr Advanced API client.
//!
//! - [`client`] - typed single-call methods (counts, prices, metadata, balances, transfers)
//! - [`holders`] - holder page fetch and full-set pagination
//! - [`labels`] - known exchange and burn address labels
//! - [`models`] - holder and token records plus the raw RPC payload shapes

mod client;
mod holders;
mod labels;
mod models;

pub use client::AnkrClient;
pub use holders::Progress;
pub use labels::{holder_label, BURN_ADDRESS, NULL_ADDRESS};
pub use models::{AccountAsset, Holder, HolderPage, TokenMetadata, TokenTransfer};
