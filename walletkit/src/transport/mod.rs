//! Transport seam between a wallet provider and the signing agent.
//!
//! The [`AgentTransport`] trait is the request/response primitive the
//! provider drives. Implementations own the actual wire (socket, IPC,
//! HTTP bridge) and are injected by the caller, so several independent
//! sessions can coexist in one process.
//!
//! # Architecture
//!
//! ```text
//! ScatterProvider ──▶ Arc<dyn AgentTransport>
//!   ├── connect(app, ConnectOptions)   → bool
//!   ├── send_api_request(ApiRequest)   → Option<Value>
//!   ├── get_identity(IdentityRequest)  → Option<Value>
//!   ├── forget_identity()              → Value
//!   └── disconnect()                   → best effort
//! ```

#[cfg(any(test, feature = "mock"))]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::types::NetworkConfig;

/// Error raised by a transport channel.
///
/// Providers pass these through to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The request did not complete in time.
    #[error("transport request timed out")]
    Timeout,

    /// The channel is closed or was never opened.
    #[error("transport channel is closed")]
    Closed,

    /// Lower-level channel fault.
    #[error("transport channel error: {0}")]
    Channel(String),

    /// The agent answered with an explicit error object.
    #[error("agent error {code}: {message}")]
    Agent {
        /// Agent-specific error code.
        code: i64,
        /// Agent-supplied message.
        message: String,
    },
}

impl TransportError {
    /// Returns `true` if this is a transient error that may succeed on retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Channel(_))
    }
}

/// Options passed to the agent on connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectOptions {
    /// Maximum time the agent may take to complete the handshake.
    pub init_timeout_ms: u64,
}

/// Generic API request forwarded to the agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    /// Request type understood by the agent.
    #[serde(rename = "type")]
    pub kind: ApiRequestKind,
    /// Request payload.
    pub payload: Value,
}

impl ApiRequest {
    /// Create a request of the given kind.
    #[must_use]
    pub const fn new(kind: ApiRequestKind, payload: Value) -> Self {
        Self { kind, payload }
    }
}

/// Request types a provider issues through [`AgentTransport::send_api_request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiRequestKind {
    /// Query the identity already granted to this application.
    IdentityFromPermissions,
    /// Ask the agent to sign a transaction.
    RequestSignature,
}

impl ApiRequestKind {
    /// Wire name of the request type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IdentityFromPermissions => "identityFromPermissions",
            Self::RequestSignature => "requestSignature",
        }
    }
}

impl std::fmt::Display for ApiRequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity requirements sent with a login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRequest {
    /// Networks the application needs accounts on.
    pub accounts: Vec<NetworkConfig>,
}

impl IdentityRequest {
    /// Request an identity for a single network.
    #[must_use]
    pub fn for_network(network: &NetworkConfig) -> Self {
        Self {
            accounts: vec![network.clone()],
        }
    }
}

/// Request/response channel to an external signing agent.
///
/// Every method is a single outstanding round-trip. `Ok(None)` (or a falsy
/// JSON value) is the agent's way of saying "nothing", which providers
/// interpret per operation.
///
/// All implementations must be `Send + Sync` for use across async tasks.
#[async_trait]
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement the `AgentTransport` trait",
    label = "this type cannot be used to talk to a signing agent",
    note = "implement `AgentTransport` to bridge a wallet provider to its agent"
)]
pub trait AgentTransport: Send + Sync {
    /// Perform the connection handshake.
    ///
    /// Returns `true` only if the agent accepted the connection.
    async fn connect(&self, app_name: &str, options: ConnectOptions)
    -> Result<bool, TransportError>;

    /// Send a generic API request and await the reply.
    async fn send_api_request(&self, request: ApiRequest) -> Result<Option<Value>, TransportError>;

    /// Ask the user to grant an identity matching the request.
    async fn get_identity(&self, request: IdentityRequest)
    -> Result<Option<Value>, TransportError>;

    /// Ask the agent to forget the identity granted to this application.
    async fn forget_identity(&self) -> Result<Value, TransportError>;

    /// Tear down the channel.
    ///
    /// Best effort; the default does nothing for agents without a reliable
    /// teardown primitive.
    async fn disconnect(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// A shared, reference-counted transport handle.
pub type SharedTransport = Arc<dyn AgentTransport>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_api_request_wire_shape() {
        let request = ApiRequest::new(ApiRequestKind::IdentityFromPermissions, json!({}));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "type": "identityFromPermissions", "payload": {} })
        );
        assert_eq!(ApiRequestKind::RequestSignature.to_string(), "requestSignature");
    }

    #[test]
    fn test_connect_options_wire_shape() {
        let options = ConnectOptions {
            init_timeout_ms: 10_000,
        };
        assert_eq!(
            serde_json::to_value(options).unwrap(),
            json!({ "initTimeoutMs": 10_000 })
        );
    }

    #[test]
    fn test_transport_error_retryable() {
        assert!(TransportError::Timeout.is_retryable());
        assert!(TransportError::Channel("reset".into()).is_retryable());
        assert!(!TransportError::Closed.is_retryable());
        assert!(
            !TransportError::Agent {
                code: 402,
                message: "User rejected the signature request".into()
            }
            .is_retryable()
        );
    }
}
