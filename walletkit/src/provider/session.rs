//! Session lifecycle: connect, login, logout and disconnect.
//!
//! ```text
//! Disconnected ─connect─▶ Connecting ─▶ Connected ─login─▶ Authenticating ─▶ Authenticated
//!      ▲                      │              ▲                   │                │
//!      │                      └──(failure)   └────(failure)──────┘      logout ──┘
//!      └──────────────────────────── disconnect (from any state) ───────────────────
//! ```
//!
//! The lifecycle performs no retries; every failure is returned to the
//! caller, who owns retry policy. Teardown (`logout`, `disconnect`) never
//! blocks the host on agent-side refusals.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::identity::decode_identity;
use crate::config::{AccountSelection, ProviderConfig};
use crate::error::{Result, WalletError};
use crate::transport::{IdentityRequest, SharedTransport};
use crate::types::{Account, Identity, NetworkConfig, WalletAuth, truthy};

/// Lifecycle state of a provider session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No channel to the agent.
    #[default]
    Disconnected,
    /// Handshake in flight.
    Connecting,
    /// Channel open, no identity selected.
    Connected,
    /// Identity request in flight.
    Authenticating,
    /// An account has been selected.
    Authenticated,
}

/// Owns the connection and authentication state of one provider instance.
pub struct SessionLifecycle {
    transport: SharedTransport,
    network: Arc<NetworkConfig>,
    config: Arc<ProviderConfig>,
    state: Mutex<SessionState>,
}

impl std::fmt::Debug for SessionLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLifecycle")
            .field("provider", &self.config.id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SessionLifecycle {
    /// Create a disconnected session.
    #[must_use]
    pub fn new(
        transport: SharedTransport,
        network: Arc<NetworkConfig>,
        config: Arc<ProviderConfig>,
    ) -> Self {
        Self {
            transport,
            network,
            config,
            state: Mutex::new(SessionState::Disconnected),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.lock()
    }

    /// Open the channel to the agent.
    ///
    /// Resolves `true` only if the handshake reports success within the
    /// configured init timeout.
    ///
    /// # Errors
    ///
    /// [`WalletError::Connection`] if the handshake is refused or times out;
    /// [`WalletError::Transport`] if the channel itself fails.
    #[tracing::instrument(skip(self), fields(provider = %self.config.id))]
    pub async fn connect(&self, app_name: &str) -> Result<bool> {
        self.transition(SessionState::Connecting);
        let options = self.config.connect_options();

        let handshake = tokio::time::timeout(
            self.config.init_timeout,
            self.transport.connect(app_name, options),
        )
        .await;

        let result = match handshake {
            Err(_) => Err(WalletError::connection(
                &self.config.meta.short_name,
                format!(
                    "handshake timed out after {} ms",
                    options.init_timeout_ms
                ),
            )),
            Ok(Err(e)) => Err(e.into()),
            Ok(Ok(false)) => Err(WalletError::connection(
                &self.config.meta.short_name,
                "the agent did not accept the connection",
            )),
            Ok(Ok(true)) => Ok(true),
        };

        match &result {
            Ok(_) => {
                self.transition(SessionState::Connected);
                info!(app_name, "connected to agent");
            }
            Err(e) => {
                self.transition(SessionState::Disconnected);
                warn!(error = %e, "connection failed");
            }
        }
        result
    }

    /// Tear down the channel.
    ///
    /// Best effort and idempotent: transport failures are logged and the
    /// call always resolves `true`, connected or not.
    #[tracing::instrument(skip(self), fields(provider = %self.config.id))]
    pub async fn disconnect(&self) -> bool {
        if let Err(e) = self.transport.disconnect().await {
            warn!(error = %e, "transport teardown failed, ignoring");
        }
        let previous = self.transition(SessionState::Disconnected);
        if previous != SessionState::Disconnected {
            info!("disconnected from agent");
        }
        true
    }

    /// Request an identity for the configured network and select one
    /// account on the target chain.
    ///
    /// Under [`AccountSelection::FirstMatch`] the hint is ignored.
    ///
    /// # Errors
    ///
    /// [`WalletError::Identity`] if the agent grants no identity;
    /// [`WalletError::AccountNotFound`] if no account matches.
    #[tracing::instrument(skip(self), fields(provider = %self.config.id))]
    pub async fn login(&self, account_name: Option<&str>) -> Result<WalletAuth> {
        let previous = self.transition(SessionState::Authenticating);
        if !matches!(
            previous,
            SessionState::Connected | SessionState::Authenticated
        ) {
            warn!(state = ?previous, "login requested before the session is connected");
        }

        match self.authenticate(account_name).await {
            Ok(auth) => {
                self.transition(SessionState::Authenticated);
                info!(account = %auth.account_name, permission = %auth.permission, "logged in");
                Ok(auth)
            }
            Err(e) => {
                self.transition(previous);
                warn!(error = %e, "login failed");
                Err(e)
            }
        }
    }

    /// Ask the agent to forget the granted identity.
    ///
    /// Resolves with the agent's reply. A refusal is logged, not escalated;
    /// repeated calls are harmless.
    ///
    /// # Errors
    ///
    /// [`WalletError::Transport`] only if the channel itself fails.
    #[tracing::instrument(skip(self), fields(provider = %self.config.id))]
    pub async fn logout(&self, account_name: Option<&str>) -> Result<Value> {
        let reply = self.transport.forget_identity().await.inspect_err(|e| {
            warn!(error = %e, "forget identity request failed");
        })?;

        if truthy(Some(reply.clone())).is_none() {
            warn!(reply = %reply, "agent did not confirm forgetting the identity");
        }

        {
            let mut state = self.lock();
            if *state == SessionState::Authenticated {
                *state = SessionState::Connected;
            }
        }
        info!("logged out");
        Ok(reply)
    }

    async fn authenticate(&self, account_name: Option<&str>) -> Result<WalletAuth> {
        let request = IdentityRequest::for_network(&self.network);
        let payload = self.transport.get_identity(request).await?;

        let identity = decode_identity(payload)?
            .ok_or_else(|| WalletError::Identity(self.config.meta.short_name.clone()))?;
        debug!(accounts = identity.accounts.len(), "identity received");

        self.select(&identity, account_name)
            .map(WalletAuth::from)
            .ok_or_else(|| WalletError::account_not_found(&self.config.blockchain))
    }

    fn select<'a>(&self, identity: &'a Identity, account_name: Option<&str>) -> Option<&'a Account> {
        let mut candidates = identity.accounts_on(&self.config.blockchain);
        match (self.config.account_selection, account_name) {
            (AccountSelection::PreferHint, Some(name)) => candidates.find(|a| a.name == name),
            _ => candidates.next(),
        }
    }

    fn transition(&self, next: SessionState) -> SessionState {
        let mut state = self.lock();
        let previous = std::mem::replace(&mut *state, next);
        drop(state);
        debug!(from = ?previous, to = ?next, "session transition");
        previous
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
