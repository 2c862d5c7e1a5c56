//! Unified error types for walletkit.
//!
//! This module provides the error hierarchy surfaced by wallet providers:
//! - Connection handshake failures
//! - Missing identities and accounts during login
//! - Transport faults, passed through untouched from the channel
//! - Undecodable agent payloads

use crate::transport::TransportError;

/// Result type alias for walletkit operations.
pub type Result<T> = std::result::Result<T, WalletError>;

/// The main error type for wallet provider operations.
///
/// Each variant represents a distinct failure mode, enabling callers to
/// pattern-match on specific cases (e.g., retrying a failed handshake).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WalletError {
    /// The connection handshake failed or reported no success.
    #[error("Cannot connect to {provider}: {reason}")]
    Connection {
        /// Provider identifier (e.g., `"scatter"`).
        provider: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The agent returned no identity during login.
    #[error("No identity obtained from {0}")]
    Identity(String),

    /// The identity holds no account for the target chain.
    #[error("No account data for blockchain '{blockchain}' in identity")]
    AccountNotFound {
        /// Target chain tag that was searched for.
        blockchain: String,
    },

    /// The transport channel failed; the original cause is preserved.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The agent replied with a payload of an unexpected shape.
    #[error("Malformed agent response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WalletError {
    /// Create a connection error for the given provider.
    #[must_use]
    pub fn connection(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Connection {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Create an account-not-found error for the given chain tag.
    #[must_use]
    pub fn account_not_found(blockchain: impl Into<String>) -> Self {
        Self::AccountNotFound {
            blockchain: blockchain.into(),
        }
    }

    /// Returns `true` if the error originated in the transport channel.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the caller may reasonably retry the operation.
    ///
    /// Missing identities and accounts reflect the user's choice in the
    /// agent and will not change on retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Connection { .. } => true,
            Self::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }
}
