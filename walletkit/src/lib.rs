#![cfg_attr(docsrs, feature(doc_cfg))]
//! Walletkit is a Rust library for plugging external key-custody agents into
//! applications through a uniform wallet provider contract.
//!
//! A provider connects to the agent, authenticates the user, lists their
//! public keys and forwards signing requests; the agent holds every private
//! key. The channel to the agent is an injected [`AgentTransport`].
//!
//! [`AgentTransport`]: transport::AgentTransport

pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod transport;
pub mod types;

pub use error::{Result, WalletError};
pub use provider::{ScatterProvider, SignatureProvider, WalletProvider, scatter_wallet_provider};
