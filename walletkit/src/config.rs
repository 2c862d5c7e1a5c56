//! Configuration for wallet providers.
//!
//! [`ProviderConfig`] carries everything a provider needs besides its
//! transport and network: identity, display metadata, the target chain
//! and the handshake timeout.

use std::time::Duration;

use crate::transport::ConnectOptions;
use crate::types::{EOS, ProviderMeta};

/// Default time the agent may take to complete the connection handshake.
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(10);

/// How `login` picks one account among those on the target chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountSelection {
    /// Take the first matching account in agent order; the hint is ignored.
    #[default]
    FirstMatch,
    /// Take the first matching account whose name equals the hint.
    ///
    /// Fails with [`AccountNotFound`](crate::WalletError::AccountNotFound)
    /// if no account carries that name. Without a hint, behaves like
    /// [`FirstMatch`](Self::FirstMatch).
    PreferHint,
}

/// Provider configuration.
///
/// # Examples
///
/// ```rust,ignore
/// let config = ProviderConfig::default()
///     .init_timeout(Duration::from_secs(5))
///     .account_selection(AccountSelection::PreferHint);
/// ```
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Stable provider identifier.
    pub id: String,
    /// Display metadata.
    pub meta: ProviderMeta,
    /// Target chain tag used to filter identity accounts.
    pub blockchain: String,
    /// Handshake timeout.
    pub init_timeout: Duration,
    /// Account selection policy for `login`.
    pub account_selection: AccountSelection,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            id: "scatter".to_string(),
            meta: ProviderMeta::new(
                "Scatter Desktop",
                "Scatter",
                "Scatter Desktop application that keeps your private keys secure",
            ),
            blockchain: EOS.to_string(),
            init_timeout: DEFAULT_INIT_TIMEOUT,
            account_selection: AccountSelection::FirstMatch,
        }
    }
}

impl ProviderConfig {
    /// Set the provider identifier.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the display metadata.
    #[must_use]
    pub fn meta(mut self, meta: ProviderMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Set the target chain tag.
    #[must_use]
    pub fn blockchain(mut self, blockchain: impl Into<String>) -> Self {
        self.blockchain = blockchain.into();
        self
    }

    /// Set the handshake timeout.
    #[must_use]
    pub const fn init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }

    /// Set the account selection policy.
    #[must_use]
    pub const fn account_selection(mut self, selection: AccountSelection) -> Self {
        self.account_selection = selection;
        self
    }

    /// Handshake options sent to the agent.
    ///
    /// Timeouts beyond `u64::MAX` milliseconds saturate.
    #[must_use]
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            init_timeout_ms: u64::try_from(self.init_timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_default() {
        let config = ProviderConfig::default();
        assert_eq!(config.id, "scatter");
        assert_eq!(config.meta.short_name, "Scatter");
        assert_eq!(config.blockchain, "eos");
        assert_eq!(config.init_timeout, Duration::from_millis(10_000));
        assert_eq!(config.account_selection, AccountSelection::FirstMatch);
        assert_eq!(config.connect_options().init_timeout_ms, 10_000);
    }

    #[test]
    fn test_provider_config_chaining() {
        let config = ProviderConfig::default()
            .id("scatter-test")
            .blockchain("telos")
            .init_timeout(Duration::from_millis(250))
            .account_selection(AccountSelection::PreferHint);
        assert_eq!(config.id, "scatter-test");
        assert_eq!(config.blockchain, "telos");
        assert_eq!(config.connect_options().init_timeout_ms, 250);
        assert_eq!(config.account_selection, AccountSelection::PreferHint);
    }

    #[test]
    fn test_connect_options_saturate() {
        let config = ProviderConfig::default().init_timeout(Duration::MAX);
        assert_eq!(config.connect_options().init_timeout_ms, u64::MAX);
    }
}
