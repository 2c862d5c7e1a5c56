//! Signature requests and reply normalization.
//!
//! The [`SignatureAdapter`] augments caller signing arguments with the
//! target chain and network, forwards them to the agent and flattens the
//! reply into an ordered list of signatures. [`ScatterSignatureProvider`]
//! pairs it with an [`IdentityResolver`] to form a complete
//! [`SignatureProvider`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use super::SignatureProvider;
use super::identity::IdentityResolver;
use crate::error::Result;
use crate::transport::{ApiRequest, ApiRequestKind, SharedTransport};
use crate::types::{NetworkConfig, SignatureProviderArgs, SignatureRequest, SignatureResponse, truthy};

/// Builds `requestSignature` calls and normalizes their replies.
#[derive(Clone)]
pub struct SignatureAdapter {
    transport: SharedTransport,
    network: Arc<NetworkConfig>,
    blockchain: String,
}

impl std::fmt::Debug for SignatureAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureAdapter")
            .field("network", &self.network)
            .field("blockchain", &self.blockchain)
            .finish_non_exhaustive()
    }
}

impl SignatureAdapter {
    /// Create an adapter signing for the given network and chain tag.
    #[must_use]
    pub fn new(
        transport: SharedTransport,
        network: Arc<NetworkConfig>,
        blockchain: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            network,
            blockchain: blockchain.into(),
        }
    }

    /// Build the transport request for the given signing arguments.
    pub fn request(&self, args: &SignatureProviderArgs) -> Result<ApiRequest> {
        let payload = serde_json::to_value(SignatureRequest {
            args,
            blockchain: &self.blockchain,
            network: &self.network,
            required_fields: json!({}),
        })?;
        Ok(ApiRequest::new(ApiRequestKind::RequestSignature, payload))
    }

    /// Ask the agent to sign and return the signatures in agent order.
    ///
    /// A falsy reply (e.g., the user declined) yields an empty list; the
    /// caller decides whether zero signatures is a failure.
    pub async fn sign(&self, args: &SignatureProviderArgs) -> Result<Vec<String>> {
        let request = self.request(args)?;
        debug!(
            chain_id = %args.chain_id,
            required_keys = args.required_keys.len(),
            "requesting signature"
        );

        let Some(reply) = truthy(self.transport.send_api_request(request).await?) else {
            info!(blockchain = %self.blockchain, "agent produced no signatures");
            return Ok(Vec::new());
        };

        let signatures = serde_json::from_value::<SignatureResponse>(reply)?.into_signatures();
        info!(signatures = signatures.len(), "signature request fulfilled");
        Ok(signatures)
    }
}

/// Signature provider backed by a Scatter-protocol agent.
#[derive(Debug, Clone)]
pub struct ScatterSignatureProvider {
    identity: IdentityResolver,
    adapter: SignatureAdapter,
}

impl ScatterSignatureProvider {
    /// Create a signature provider for the given network and chain tag.
    #[must_use]
    pub fn new(transport: SharedTransport, network: Arc<NetworkConfig>, blockchain: &str) -> Self {
        Self {
            identity: IdentityResolver::new(Arc::clone(&transport), blockchain),
            adapter: SignatureAdapter::new(transport, network, blockchain),
        }
    }
}

#[async_trait]
impl SignatureProvider for ScatterSignatureProvider {
    async fn get_available_keys(&self) -> Result<Vec<String>> {
        self.identity.available_keys().await
    }

    async fn sign(&self, args: SignatureProviderArgs) -> Result<Vec<String>> {
        self.adapter.sign(&args).await
    }
}

/// Build a standalone signature provider, without the session lifecycle.
#[must_use]
pub fn make_signature_provider(
    transport: SharedTransport,
    network: Arc<NetworkConfig>,
    blockchain: &str,
) -> ScatterSignatureProvider {
    ScatterSignatureProvider::new(transport, network, blockchain)
}
