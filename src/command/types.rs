//! Command envelope types.
//!
//! These mirror the JSON the node expects inside the `cmd` string. Field
//! declaration order matches the wire order; the bytes that get hashed come
//! from [`crate::command::canonical`], not from these derives.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Executable section of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Payload {
    /// Run `code` with `data` available to `read-msg` and friends.
    Exec(ExecPayload),
}

impl Payload {
    /// Exec payload with the given code and env data.
    pub fn exec(code: impl Into<String>, data: Value) -> Self {
        Self::Exec(ExecPayload {
            data,
            code: code.into(),
        })
    }

    /// Exec payload with an empty data object.
    pub fn exec_code(code: impl Into<String>) -> Self {
        Self::exec(code, Value::Object(Default::default()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecPayload {
    pub data: Value,
    pub code: String,
}

/// A named capability and its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
    pub args: Vec<Value>,
}

impl Capability {
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// `coin.GAS`
    pub fn gas() -> Self {
        Self::new("coin.GAS", Vec::new())
    }

    /// `coin.TRANSFER from to amount`
    pub fn transfer(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Self {
        Self::new(
            "coin.TRANSFER",
            vec![
                Value::String(from.into()),
                Value::String(to.into()),
                Value::from(amount),
            ],
        )
    }
}

/// A signer and the capabilities its signature is scoped to.
///
/// `clist: None` is an unrestricted signature and is omitted on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerCapability {
    #[serde(rename = "pubKey")]
    pub pub_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clist: Option<Vec<Capability>>,
}

impl SignerCapability {
    /// Signer scoped to `clist`.
    pub fn new(pub_key: impl Into<String>, clist: Vec<Capability>) -> Self {
        Self {
            pub_key: pub_key.into(),
            clist: Some(clist),
        }
    }

    /// Signer with no capability list.
    pub fn unrestricted(pub_key: impl Into<String>) -> Self {
        Self {
            pub_key: pub_key.into(),
            clist: None,
        }
    }
}

/// Gas, chain and timing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub gas_limit: u64,
    pub chain_id: String,
    pub gas_price: f64,
    pub sender: String,
    /// Seconds after `creation_time` the command stays valid.
    pub ttl: u64,
    /// Unix seconds.
    pub creation_time: i64,
}

/// Unsigned command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub network_id: String,
    pub payload: Payload,
    pub signers: Vec<SignerCapability>,
    pub meta: Meta,
    pub nonce: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_is_tagged_exec() {
        let payload = Payload::exec_code("\"hello\"");
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({"exec": {"data": {}, "code": "\"hello\""}}));
    }

    #[test]
    fn test_unrestricted_signer_omits_clist() {
        let signer = SignerCapability::unrestricted("abc");
        let value = serde_json::to_value(&signer).unwrap();
        assert_eq!(value, json!({"pubKey": "abc"}));

        let parsed: SignerCapability = serde_json::from_value(value).unwrap();
        assert!(parsed.clist.is_none());
    }

    #[test]
    fn test_transfer_capability_args() {
        let cap = Capability::transfer("k:abc", "k:def", 1.5);
        assert_eq!(cap.name, "coin.TRANSFER");
        assert_eq!(cap.args, vec![json!("k:abc"), json!("k:def"), json!(1.5)]);
    }

    #[test]
    fn test_meta_field_names() {
        let meta = Meta {
            gas_limit: 2500,
            chain_id: "1".to_string(),
            gas_price: 1e-8,
            sender: "k:abc".to_string(),
            ttl: 28_000,
            creation_time: 1_700_000_000,
        };
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["gasLimit"], 2500);
        assert_eq!(value["chainId"], "1");
        assert_eq!(value["creationTime"], 1_700_000_000i64);
    }
}
