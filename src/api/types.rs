//! Request bodies and node responses for the Pact API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::SignedCommand;

/// Body of `/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub cmds: Vec<SignedCommand>,
}

/// Body of `/listen`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenRequest {
    pub listen: String,
}

/// Response of `/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    #[serde(rename = "requestKeys")]
    pub request_keys: Vec<String>,
}

/// Outcome of executing a command, returned by `/local` and `/listen`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub req_key: String,
    pub result: PactResult,
    #[serde(default)]
    pub tx_id: Option<u64>,
    #[serde(default)]
    pub gas: Option<u64>,
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub meta_data: Option<Value>,
    #[serde(default)]
    pub continuation: Option<Value>,
    #[serde(default)]
    pub events: Option<Vec<Value>>,
}

/// `result` section of a [`CommandResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PactResult {
    /// `"success"` or `"failure"`.
    pub status: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl PactResult {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

impl CommandResult {
    /// Result data when execution succeeded.
    pub fn data(&self) -> Option<&Value> {
        if self.result.is_success() {
            self.result.data.as_ref()
        } else {
            None
        }
    }
}
