//! Commonly used types, re-exported for glob import.

pub use crate::config::{AccountSelection, ProviderConfig};
pub use crate::error::{Result, WalletError};
pub use crate::provider::{
    BoxedWalletProvider, ScatterProvider, SessionState, SignatureProvider, WalletProvider,
    make_signature_provider, scatter_wallet_provider,
};
pub use crate::transport::{AgentTransport, SharedTransport, TransportError};
pub use crate::types::{NetworkConfig, ProviderMeta, SignatureProviderArgs, WalletAuth};
