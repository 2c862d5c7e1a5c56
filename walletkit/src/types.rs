//! Data model shared by the provider, its components and the transport.
//!
//! Agent payloads arrive as loosely shaped JSON. Each is decoded into one of
//! the types below as soon as it is received, so nothing downstream branches
//! on raw shapes again.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Chain tag of the EOS blockchain, the target chain of the Scatter protocol.
pub const EOS: &str = "eos";

/// Blockchain network descriptor supplied by the caller.
///
/// Immutable for the provider's lifetime; providers hold it behind an
/// [`Arc`](std::sync::Arc) shared with the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Optional display name of the network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Endpoint protocol (`"http"` or `"https"`).
    pub protocol: String,
    /// Endpoint host name.
    pub host: String,
    /// Endpoint port.
    pub port: u16,
    /// Chain identifier (hex digest of the genesis block).
    pub chain_id: String,
}

impl NetworkConfig {
    /// Create a network descriptor without a display name.
    #[must_use]
    pub fn new(
        protocol: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        chain_id: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            protocol: protocol.into(),
            host: host.into(),
            port,
            chain_id: chain_id.into(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A single account record inside an agent [`Identity`].
///
/// Missing or `null` fields decode as empty strings; an untagged account
/// belongs to no chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Blockchain tag the account belongs to (e.g., `"eos"`).
    #[serde(default, deserialize_with = "string_or_empty")]
    pub blockchain: String,
    /// Public key controlling the account.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub public_key: String,
    /// Account name on chain.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    /// Permission (authority) the key holds, e.g. `"active"`.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub authority: String,
}

impl Account {
    /// Returns `true` if this account belongs to the given chain.
    #[must_use]
    pub fn is_on(&self, blockchain: &str) -> bool {
        self.blockchain == blockchain
    }
}

/// The agent's reply to an identity or permission query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Accounts available to the session, in agent order.
    #[serde(default, deserialize_with = "decodable_accounts")]
    pub accounts: Vec<Account>,
}

impl Identity {
    /// Accounts on the given chain, preserving agent order.
    pub fn accounts_on(&self, blockchain: &str) -> impl Iterator<Item = &Account> {
        self.accounts.iter().filter(move |a| a.is_on(blockchain))
    }
}

/// Session credential returned to the application after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAuth {
    /// Selected account name.
    pub account_name: String,
    /// Permission the session signs with.
    pub permission: String,
    /// Public key of the selected account.
    pub public_key: String,
}

impl From<&Account> for WalletAuth {
    fn from(account: &Account) -> Self {
        Self {
            account_name: account.name.clone(),
            permission: account.authority.clone(),
            public_key: account.public_key.clone(),
        }
    }
}

/// Static descriptive data about a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMeta {
    /// Full display name.
    pub name: String,
    /// Short display name.
    pub short_name: String,
    /// One-line description.
    pub description: String,
}

impl ProviderMeta {
    /// Create provider metadata.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        short_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            description: description.into(),
        }
    }
}

/// ABI of a contract referenced by a transaction, in binary form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryAbi {
    /// Contract account the ABI belongs to.
    pub account_name: String,
    /// Serialized ABI bytes.
    pub abi: Vec<u8>,
}

/// Generic signing arguments passed to a signature provider per call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureProviderArgs {
    /// Chain the transaction is meant for.
    pub chain_id: String,
    /// Public keys whose signatures are required.
    pub required_keys: Vec<String>,
    /// Serialized transaction bytes.
    pub serialized_transaction: Vec<u8>,
    /// Serialized context-free data, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialized_context_free_data: Option<Vec<u8>>,
    /// ABIs of the contracts the transaction touches.
    #[serde(default)]
    pub abis: Vec<BinaryAbi>,
}

/// Payload of a `requestSignature` call: the caller's arguments augmented
/// with the target chain, the network and the (empty) required fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRequest<'a> {
    /// Caller-supplied signing arguments, flattened into the payload.
    #[serde(flatten)]
    pub args: &'a SignatureProviderArgs,
    /// Target chain tag.
    pub blockchain: &'a str,
    /// Network the transaction targets.
    pub network: &'a NetworkConfig,
    /// Identity fields requested alongside the signature; always empty.
    pub required_fields: Value,
}

/// The agent's reply to a signature request.
///
/// Agents return either a bare array of signatures or an envelope object
/// carrying a `signatures` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SignatureResponse {
    /// `{ "signatures": [...] }`
    Envelope {
        /// Signatures in agent order.
        signatures: Vec<String>,
    },
    /// `[...]`
    Bare(Vec<String>),
}

impl SignatureResponse {
    /// Flatten either shape into the ordered signature list.
    #[must_use]
    pub fn into_signatures(self) -> Vec<String> {
        match self {
            Self::Envelope { signatures } | Self::Bare(signatures) => signatures,
        }
    }
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Account records that fail to decode are dropped; an account on another
/// chain may carry any shape.
fn decodable_accounts<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Account>, D::Error> {
    let records = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(records
        .into_iter()
        .filter_map(|record| {
            serde_json::from_value(record)
                .inspect_err(|e| debug!(error = %e, "skipping undecodable identity account"))
                .ok()
        })
        .collect())
}

/// Returns the payload only if it is present and truthy.
///
/// Agents signal "nothing" with `null`, `false`, `0` or an empty string.
pub(crate) fn truthy(value: Option<Value>) -> Option<Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_identity_decodes_agent_payload() {
        let identity: Identity = serde_json::from_value(json!({
            "hash": "abc",
            "accounts": [
                { "blockchain": "eos", "publicKey": "EOS6MR", "name": "alice", "authority": "active", "chainId": "aca3" },
                { "blockchain": "eth", "publicKey": "0x04ab", "name": "0xdead" }
            ]
        }))
        .unwrap();

        assert_eq!(identity.accounts.len(), 2);
        assert_eq!(identity.accounts[1].authority, "");
        let eos: Vec<_> = identity.accounts_on(EOS).map(|a| a.name.as_str()).collect();
        assert_eq!(eos, vec!["alice"]);
    }

    #[test]
    fn test_identity_tolerates_null_and_untagged_accounts() {
        let identity: Identity = serde_json::from_value(json!({
            "accounts": [
                { "blockchain": "eth", "name": null, "authority": null, "publicKey": null },
                { "publicKey": "X", "name": "n" },
                "not-an-account",
                { "blockchain": "eos", "publicKey": 42, "name": "broken" },
                { "blockchain": "eos", "publicKey": "EOS_KEY_1", "name": "alice", "authority": "active" }
            ]
        }))
        .unwrap();

        assert_eq!(identity.accounts.len(), 3);
        assert_eq!(identity.accounts[0].name, "");
        assert_eq!(identity.accounts[1].blockchain, "");
        let eos: Vec<_> = identity.accounts_on(EOS).map(|a| a.name.as_str()).collect();
        assert_eq!(eos, vec!["alice"]);
    }

    #[test]
    fn test_identity_with_null_accounts() {
        let identity: Identity = serde_json::from_value(json!({ "accounts": null })).unwrap();
        assert!(identity.accounts.is_empty());
    }

    #[test]
    fn test_identity_without_accounts() {
        let identity: Identity = serde_json::from_value(json!({ "name": "anon" })).unwrap();
        assert!(identity.accounts.is_empty());
    }

    #[test]
    fn test_signature_response_shapes() {
        let envelope: SignatureResponse =
            serde_json::from_value(json!({ "signatures": ["sigA", "sigB"], "returnedFields": {} }))
                .unwrap();
        assert_eq!(envelope.into_signatures(), vec!["sigA", "sigB"]);

        let bare: SignatureResponse = serde_json::from_value(json!(["sigC"])).unwrap();
        assert_eq!(bare.into_signatures(), vec!["sigC"]);
    }

    #[test]
    fn test_signature_request_payload() {
        let network = NetworkConfig::new("https", "eos.greymass.com", 443, "aca376f2");
        let args = SignatureProviderArgs {
            chain_id: "aca376f2".into(),
            required_keys: vec!["EOS6MR".into()],
            serialized_transaction: vec![1, 2, 3],
            ..Default::default()
        };
        let request = SignatureRequest {
            args: &args,
            blockchain: EOS,
            network: &network,
            required_fields: json!({}),
        };

        let payload = serde_json::to_value(&request).unwrap();
        assert_eq!(payload["blockchain"], "eos");
        assert_eq!(payload["chainId"], "aca376f2");
        assert_eq!(payload["requiredKeys"], json!(["EOS6MR"]));
        assert_eq!(payload["serializedTransaction"], json!([1, 2, 3]));
        assert_eq!(payload["network"]["host"], "eos.greymass.com");
        assert_eq!(payload["requiredFields"], json!({}));
        assert!(payload.get("serializedContextFreeData").is_none());
    }

    #[test]
    fn test_truthy() {
        assert!(truthy(None).is_none());
        assert!(truthy(Some(Value::Null)).is_none());
        assert!(truthy(Some(json!(false))).is_none());
        assert!(truthy(Some(json!(0))).is_none());
        assert!(truthy(Some(json!(""))).is_none());
        assert_eq!(truthy(Some(json!(true))), Some(json!(true)));
        assert_eq!(truthy(Some(json!([]))), Some(json!([])));
        assert_eq!(truthy(Some(json!({}))), Some(json!({})));
    }
}
