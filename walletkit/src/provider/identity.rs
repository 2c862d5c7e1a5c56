//! Identity resolution: raw agent identities to public keys.

use serde_json::{Value, json};
use tracing::debug;

use crate::error::Result;
use crate::transport::{ApiRequest, ApiRequestKind, SharedTransport};
use crate::types::{Identity, truthy};

/// Decode an agent identity payload; a falsy payload means "no identity".
pub(crate) fn decode_identity(payload: Option<Value>) -> Result<Option<Identity>> {
    truthy(payload)
        .map(serde_json::from_value)
        .transpose()
        .map_err(Into::into)
}

/// Queries the identity already granted to the application and lists the
/// public keys usable on the target chain.
#[derive(Clone)]
pub struct IdentityResolver {
    transport: SharedTransport,
    blockchain: String,
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("blockchain", &self.blockchain)
            .finish_non_exhaustive()
    }
}

impl IdentityResolver {
    /// Create a resolver for the given chain tag.
    #[must_use]
    pub fn new(transport: SharedTransport, blockchain: impl Into<String>) -> Self {
        Self {
            transport,
            blockchain: blockchain.into(),
        }
    }

    /// Fetch the identity granted through earlier permissions, if any.
    pub async fn permitted_identity(&self) -> Result<Option<Identity>> {
        let request = ApiRequest::new(ApiRequestKind::IdentityFromPermissions, json!({}));
        let payload = self.transport.send_api_request(request).await?;
        decode_identity(payload)
    }

    /// Public keys of the identity's accounts on the target chain, in agent
    /// order.
    ///
    /// An absent identity yields an empty list rather than an error.
    pub async fn available_keys(&self) -> Result<Vec<String>> {
        let Some(identity) = self.permitted_identity().await? else {
            debug!(blockchain = %self.blockchain, "no identity granted, no keys available");
            return Ok(Vec::new());
        };

        let keys: Vec<String> = identity
            .accounts_on(&self.blockchain)
            .map(|account| account.public_key.clone())
            .collect();

        debug!(blockchain = %self.blockchain, keys = keys.len(), "resolved available keys");
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::error::WalletError;
    use crate::transport::TransportError;
    use crate::transport::mock::{MockTransport, RecordedCall};

    fn resolver(mock: &Arc<MockTransport>) -> IdentityResolver {
        let transport = Arc::clone(mock) as SharedTransport;
        IdentityResolver::new(transport, "eos")
    }

    #[tokio::test]
    async fn test_keys_filtered_in_agent_order() {
        let mock = Arc::new(MockTransport::new().with_identity(json!({
            "accounts": [
                { "blockchain": "eos", "publicKey": "EOS_KEY_1", "name": "alice", "authority": "active" },
                { "blockchain": "eth", "publicKey": "0xETH", "name": "0xabc" },
                { "blockchain": "eos", "publicKey": "EOS_KEY_2", "name": "bob", "authority": "owner" }
            ]
        })));

        let keys = assert_ok!(resolver(&mock).available_keys().await);
        assert_eq!(keys, vec!["EOS_KEY_1", "EOS_KEY_2"]);
        assert_eq!(
            mock.calls(),
            vec![RecordedCall::Api(ApiRequest::new(
                ApiRequestKind::IdentityFromPermissions,
                json!({})
            ))]
        );
    }

    #[tokio::test]
    async fn test_no_identity_yields_empty_keys() {
        let mock = Arc::new(MockTransport::new());
        assert_eq!(assert_ok!(resolver(&mock).available_keys().await), Vec::<String>::new());

        let mock = Arc::new(MockTransport::new().with_permissions_identity(Ok(Some(json!(false)))));
        assert!(assert_ok!(resolver(&mock).available_keys().await).is_empty());
    }

    #[tokio::test]
    async fn test_no_target_chain_accounts_yields_empty_keys() {
        let mock = Arc::new(MockTransport::new().with_identity(json!({
            "accounts": [{ "blockchain": "eth", "publicKey": "0xETH", "name": "0xabc" }]
        })));
        assert!(assert_ok!(resolver(&mock).available_keys().await).is_empty());

        let mock = Arc::new(MockTransport::new().with_identity(json!({ "accounts": [] })));
        assert!(assert_ok!(resolver(&mock).available_keys().await).is_empty());
    }

    #[tokio::test]
    async fn test_loosely_shaped_foreign_accounts_are_ignored() {
        let mock = Arc::new(MockTransport::new().with_identity(json!({
            "accounts": [
                { "blockchain": "eth", "name": null, "authority": null },
                { "blockchain": "eos", "publicKey": "EOS_KEY_1", "name": "alice", "authority": "active" }
            ]
        })));
        assert_eq!(assert_ok!(resolver(&mock).available_keys().await), vec!["EOS_KEY_1"]);

        let mock = Arc::new(MockTransport::new().with_identity(json!({
            "accounts": [{ "publicKey": "X", "name": "n" }]
        })));
        assert!(assert_ok!(resolver(&mock).available_keys().await).is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let mock = Arc::new(
            MockTransport::new().with_permissions_identity(Err(TransportError::Timeout)),
        );
        let err = assert_err!(resolver(&mock).available_keys().await);
        assert!(matches!(err, WalletError::Transport(TransportError::Timeout)));
    }

    #[tokio::test]
    async fn test_malformed_identity_is_decode_error() {
        let mock = Arc::new(MockTransport::new().with_identity(json!({ "accounts": "nope" })));
        let err = assert_err!(resolver(&mock).available_keys().await);
        assert!(matches!(err, WalletError::Decode(_)));
    }
}
