//! Full provider session against a scripted agent.
//!
//! Walks through connect, login, key listing, signing, logout and
//! disconnect. Set `RUST_LOG=walletkit=debug` to see lifecycle events.
//!
//! ```bash
//! RUST_LOG=walletkit=debug cargo run --example scatter_session --features mock
//! ```

#![allow(clippy::print_stdout)]

use std::sync::Arc;

use serde_json::json;
use tracing_subscriber::EnvFilter;
use walletkit::prelude::*;
use walletkit::transport::mock::MockTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let agent = MockTransport::new()
        .with_identity(json!({
            "accounts": [
                { "blockchain": "eos", "publicKey": "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV", "name": "alice", "authority": "active" }
            ]
        }))
        .with_signatures(json!({ "signatures": ["SIG_K1_demo"] }));
    let transport: SharedTransport = Arc::new(agent);

    let network = Arc::new(
        NetworkConfig::new(
            "https",
            "nodes.get-scatter.com",
            443,
            "aca376f2206b8fc25a6ed44dbdc66547c36c6c33e3a119ffbeaef943642f0e906",
        )
        .with_name("EOS Mainnet"),
    );

    let make_provider = scatter_wallet_provider(transport, ProviderConfig::default());
    let provider = make_provider(network);
    println!("{} ({})", provider.meta().name, provider.id());

    provider.connect("walletkit-demo").await?;
    let auth = provider.login(None).await?;
    println!("logged in as {}@{}", auth.account_name, auth.permission);

    let keys = provider.signature_provider().get_available_keys().await?;
    let args = SignatureProviderArgs {
        chain_id: provider.network().chain_id.clone(),
        required_keys: keys,
        serialized_transaction: vec![0; 32],
        ..Default::default()
    };
    let signatures = provider.signature_provider().sign(args).await?;
    println!("signatures: {signatures:?}");

    provider.logout(None).await?;
    provider.disconnect().await;
    Ok(())
}
