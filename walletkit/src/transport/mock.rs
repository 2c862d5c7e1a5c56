//! Scripted in-memory transport for tests and demos.
//!
//! [`MockTransport`] answers every call with a canned reply and records
//! the requests it received, so tests can assert on exact payloads.
//!
//! # Examples
//!
//! ```rust,ignore
//! use walletkit::transport::mock::MockTransport;
//!
//! let transport = MockTransport::new()
//!     .with_identity(json!({ "accounts": [...] }))
//!     .with_signatures(json!({ "signatures": ["SIG_K1_..."] }));
//! ```

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{
    AgentTransport, ApiRequest, ApiRequestKind, ConnectOptions, IdentityRequest, TransportError,
};

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// `connect` handshake.
    Connect {
        /// Application name.
        app_name: String,
        /// Handshake options.
        options: ConnectOptions,
    },
    /// Generic API request.
    Api(ApiRequest),
    /// Identity grant request.
    GetIdentity(IdentityRequest),
    /// Forget-identity request.
    ForgetIdentity,
    /// Channel teardown.
    Disconnect,
}

type Reply<T> = Result<T, TransportError>;

/// Scripted [`AgentTransport`] implementation.
#[derive(Debug)]
pub struct MockTransport {
    connect: Reply<bool>,
    connect_delay: Option<Duration>,
    permissions_identity: Reply<Option<Value>>,
    granted_identity: Reply<Option<Value>>,
    signatures: Reply<Option<Value>>,
    forget: Reply<Value>,
    disconnect: Reply<()>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            connect: Ok(true),
            connect_delay: None,
            permissions_identity: Ok(None),
            granted_identity: Ok(None),
            signatures: Ok(None),
            forget: Ok(Value::Bool(true)),
            disconnect: Ok(()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockTransport {
    /// A transport that accepts connections and knows no identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handshake result.
    #[must_use]
    pub fn with_connect(mut self, reply: Reply<bool>) -> Self {
        self.connect = reply;
        self
    }

    /// Delay the handshake by the given duration.
    #[must_use]
    pub const fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    /// Answer both identity queries with the same payload.
    #[must_use]
    pub fn with_identity(mut self, identity: Value) -> Self {
        self.permissions_identity = Ok(Some(identity.clone()));
        self.granted_identity = Ok(Some(identity));
        self
    }

    /// Set the reply to `identityFromPermissions`.
    #[must_use]
    pub fn with_permissions_identity(mut self, reply: Reply<Option<Value>>) -> Self {
        self.permissions_identity = reply;
        self
    }

    /// Set the reply to `get_identity`.
    #[must_use]
    pub fn with_granted_identity(mut self, reply: Reply<Option<Value>>) -> Self {
        self.granted_identity = reply;
        self
    }

    /// Answer signature requests with the given payload.
    #[must_use]
    pub fn with_signatures(mut self, response: Value) -> Self {
        self.signatures = Ok(Some(response));
        self
    }

    /// Set the reply to `requestSignature`.
    #[must_use]
    pub fn with_signature_reply(mut self, reply: Reply<Option<Value>>) -> Self {
        self.signatures = reply;
        self
    }

    /// Set the reply to `forget_identity`.
    #[must_use]
    pub fn with_forget(mut self, reply: Reply<Value>) -> Self {
        self.forget = reply;
        self
    }

    /// Set the result of channel teardown.
    #[must_use]
    pub fn with_disconnect(mut self, reply: Reply<()>) -> Self {
        self.disconnect = reply;
        self
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().clone()
    }

    /// The last generic API request received, if any.
    #[must_use]
    pub fn last_api_request(&self) -> Option<ApiRequest> {
        self.lock().iter().rev().find_map(|call| match call {
            RecordedCall::Api(request) => Some(request.clone()),
            _ => None,
        })
    }

    fn record(&self, call: RecordedCall) {
        self.lock().push(call);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl AgentTransport for MockTransport {
    async fn connect(
        &self,
        app_name: &str,
        options: ConnectOptions,
    ) -> Result<bool, TransportError> {
        self.record(RecordedCall::Connect {
            app_name: app_name.to_owned(),
            options,
        });
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        self.connect.clone()
    }

    async fn send_api_request(&self, request: ApiRequest) -> Result<Option<Value>, TransportError> {
        let kind = request.kind;
        self.record(RecordedCall::Api(request));
        match kind {
            ApiRequestKind::IdentityFromPermissions => self.permissions_identity.clone(),
            ApiRequestKind::RequestSignature => self.signatures.clone(),
        }
    }

    async fn get_identity(
        &self,
        request: IdentityRequest,
    ) -> Result<Option<Value>, TransportError> {
        self.record(RecordedCall::GetIdentity(request));
        self.granted_identity.clone()
    }

    async fn forget_identity(&self) -> Result<Value, TransportError> {
        self.record(RecordedCall::ForgetIdentity);
        self.forget.clone()
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        self.record(RecordedCall::Disconnect);
        self.disconnect.clone()
    }
}
