//! Wallet provider contract and the Scatter-protocol implementation.
//!
//! A [`WalletProvider`] lets an application authenticate a user against an
//! external key-custody agent and obtain signatures, without knowing how
//! the agent is reached.
//!
//! # Architecture
//!
//! ```text
//! ScatterProvider (facade)
//!   ├── id() / meta()          → static descriptive data
//!   ├── SessionLifecycle       → connect / login / logout / disconnect
//!   └── ScatterSignatureProvider
//!         ├── IdentityResolver → get_available_keys()
//!         └── SignatureAdapter → sign()
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use walletkit::prelude::*;
//!
//! let make_provider = scatter_wallet_provider(transport, ProviderConfig::default());
//! let provider = make_provider(Arc::new(network));
//!
//! provider.connect("my-dapp").await?;
//! let auth = provider.login(None).await?;
//! let signatures = provider.signature_provider().sign(args).await?;
//! ```

pub mod identity;
mod scatter;
pub mod session;
pub mod signature;

use async_trait::async_trait;
use serde_json::Value;

pub use identity::IdentityResolver;
pub use scatter::{ScatterProvider, scatter_wallet_provider};
pub use session::{SessionLifecycle, SessionState};
pub use signature::{ScatterSignatureProvider, SignatureAdapter, make_signature_provider};

use crate::error::Result;
use crate::types::{ProviderMeta, SignatureProviderArgs, WalletAuth};

/// Lists usable keys and produces signatures through an agent.
#[async_trait]
pub trait SignatureProvider: Send + Sync {
    /// Public keys the agent can sign with on the target chain.
    async fn get_available_keys(&self) -> Result<Vec<String>>;

    /// Ask the agent to sign; returns signatures in agent order.
    async fn sign(&self, args: SignatureProviderArgs) -> Result<Vec<String>>;
}

/// The standard provider contract consumed by a hosting application.
///
/// Callers serialize lifecycle transitions: connect before login, login
/// before signing.
#[async_trait]
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement the `WalletProvider` trait",
    label = "this type cannot be used as a wallet provider",
    note = "implement `WalletProvider` to plug a signing agent into the application"
)]
pub trait WalletProvider: Send + Sync {
    /// Stable provider identifier.
    fn id(&self) -> &str;

    /// Display metadata.
    fn meta(&self) -> &ProviderMeta;

    /// Key listing and signing.
    fn signature_provider(&self) -> &dyn SignatureProvider;

    /// Open the channel to the agent.
    async fn connect(&self, app_name: &str) -> Result<bool>;

    /// Tear down the channel. Never fails; always resolves `true`.
    async fn disconnect(&self) -> bool;

    /// Authenticate and select one account.
    async fn login(&self, account_name: Option<&str>) -> Result<WalletAuth>;

    /// Release the identity held by the agent.
    async fn logout(&self, account_name: Option<&str>) -> Result<Value>;
}

/// A heap-allocated, type-erased provider for dynamic dispatch.
pub type BoxedWalletProvider = Box<dyn WalletProvider>;
