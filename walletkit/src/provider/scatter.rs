//! Scatter-protocol wallet provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::session::{SessionLifecycle, SessionState};
use super::signature::ScatterSignatureProvider;
use super::{SignatureProvider, WalletProvider};
use crate::config::ProviderConfig;
use crate::error::Result;
use crate::transport::SharedTransport;
use crate::types::{NetworkConfig, ProviderMeta, WalletAuth};

/// Wallet provider speaking the Scatter agent protocol.
///
/// Pure wiring over [`SessionLifecycle`] and [`ScatterSignatureProvider`];
/// errors from either are returned unchanged.
#[derive(Debug)]
pub struct ScatterProvider {
    config: Arc<ProviderConfig>,
    network: Arc<NetworkConfig>,
    session: SessionLifecycle,
    signature_provider: ScatterSignatureProvider,
}

impl ScatterProvider {
    /// Create a provider for one network over the given transport.
    #[must_use]
    pub fn new(
        transport: SharedTransport,
        network: Arc<NetworkConfig>,
        config: ProviderConfig,
    ) -> Self {
        Self::with_shared_config(transport, network, Arc::new(config))
    }

    /// Create a provider sharing an existing configuration.
    #[must_use]
    pub fn with_shared_config(
        transport: SharedTransport,
        network: Arc<NetworkConfig>,
        config: Arc<ProviderConfig>,
    ) -> Self {
        let signature_provider = ScatterSignatureProvider::new(
            Arc::clone(&transport),
            Arc::clone(&network),
            &config.blockchain,
        );
        let session = SessionLifecycle::new(transport, Arc::clone(&network), Arc::clone(&config));
        Self {
            config,
            network,
            session,
            signature_provider,
        }
    }

    /// Network this provider was built for.
    #[must_use]
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Provider configuration.
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state()
    }
}

#[async_trait]
impl WalletProvider for ScatterProvider {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn meta(&self) -> &ProviderMeta {
        &self.config.meta
    }

    fn signature_provider(&self) -> &dyn SignatureProvider {
        &self.signature_provider
    }

    async fn connect(&self, app_name: &str) -> Result<bool> {
        self.session.connect(app_name).await
    }

    async fn disconnect(&self) -> bool {
        self.session.disconnect().await
    }

    async fn login(&self, account_name: Option<&str>) -> Result<WalletAuth> {
        self.session.login(account_name).await
    }

    async fn logout(&self, account_name: Option<&str>) -> Result<Value> {
        self.session.logout(account_name).await
    }
}

/// Returns a factory building a [`ScatterProvider`] per network, all
/// sharing the given transport and configuration.
#[must_use]
pub fn scatter_wallet_provider(
    transport: SharedTransport,
    config: ProviderConfig,
) -> impl Fn(Arc<NetworkConfig>) -> ScatterProvider {
    let config = Arc::new(config);
    move |network| {
        ScatterProvider::with_shared_config(Arc::clone(&transport), network, Arc::clone(&config))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::error::WalletError;
    use crate::provider::BoxedWalletProvider;
    use crate::transport::mock::{MockTransport, RecordedCall};
    use crate::types::SignatureProviderArgs;

    fn network() -> Arc<NetworkConfig> {
        Arc::new(
            NetworkConfig::new("https", "nodes.get-scatter.com", 443, "aca376f2")
                .with_name("EOS Mainnet"),
        )
    }

    fn provider(mock: &Arc<MockTransport>) -> ScatterProvider {
        let transport = Arc::clone(mock) as SharedTransport;
        scatter_wallet_provider(transport, ProviderConfig::default())(network())
    }

    #[test]
    fn test_static_descriptors() {
        let provider = provider(&Arc::new(MockTransport::new()));
        assert_eq!(provider.id(), "scatter");
        assert_eq!(provider.meta().name, "Scatter Desktop");
        assert_eq!(provider.meta().short_name, "Scatter");
        assert_eq!(provider.network().name.as_deref(), Some("EOS Mainnet"));
        assert_eq!(provider.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_full_session() {
        let mock = Arc::new(
            MockTransport::new()
                .with_identity(json!({
                    "accounts": [{ "blockchain": "eos", "publicKey": "EOS_KEY_1", "name": "alice", "authority": "active" }]
                }))
                .with_signatures(json!({ "signatures": ["SIG_K1_A"] })),
        );
        let wallet: BoxedWalletProvider = Box::new(provider(&mock));

        assert!(assert_ok!(wallet.connect("my-dapp").await));
        let auth = assert_ok!(wallet.login(None).await);
        assert_eq!(auth.account_name, "alice");

        let keys = assert_ok!(wallet.signature_provider().get_available_keys().await);
        assert_eq!(keys, vec![auth.public_key.clone()]);

        let args = SignatureProviderArgs {
            chain_id: "aca376f2".into(),
            required_keys: keys,
            ..Default::default()
        };
        let signatures = assert_ok!(wallet.signature_provider().sign(args).await);
        assert_eq!(signatures, vec!["SIG_K1_A"]);

        assert_ok!(wallet.logout(None).await);
        assert!(wallet.disconnect().await);

        let calls = mock.calls();
        assert!(matches!(calls.first(), Some(RecordedCall::Connect { .. })));
        assert_eq!(calls.last(), Some(&RecordedCall::Disconnect));
    }

    #[tokio::test]
    async fn test_errors_are_not_reshaped() {
        let mock = Arc::new(MockTransport::new().with_connect(Ok(false)));
        let provider = provider(&mock);

        let err = assert_err!(provider.connect("my-dapp").await);
        assert!(matches!(err, WalletError::Connection { .. }));
        let err = assert_err!(provider.login(None).await);
        assert!(matches!(err, WalletError::Identity(_)));
    }

    #[tokio::test]
    async fn test_disconnect_when_never_connected() {
        let mock = Arc::new(MockTransport::new());
        assert!(provider(&mock).disconnect().await);
    }

    #[tokio::test]
    async fn test_factory_builds_independent_sessions() {
        let mock = Arc::new(MockTransport::new());
        let transport = Arc::clone(&mock) as SharedTransport;
        let make_provider = scatter_wallet_provider(transport, ProviderConfig::default());

        let first = make_provider(network());
        let second = make_provider(Arc::new(NetworkConfig::new(
            "https",
            "jungle.eosn.io",
            443,
            "73e4385a",
        )));

        assert_ok!(first.connect("my-dapp").await);
        assert_eq!(first.state(), SessionState::Connected);
        assert_eq!(second.state(), SessionState::Disconnected);
        assert_eq!(second.network().chain_id, "73e4385a");
    }
}
