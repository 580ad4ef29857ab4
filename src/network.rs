//! Network constants and endpoint URL construction for Chainweb nodes.

use crate::error::{SdkError, SdkResult};

/// Public mainnet node.
pub const MAINNET_API_URL: &str = "https://api.chainweb.com";

/// Public testnet node.
pub const TESTNET_API_URL: &str = "https://api.testnet.chainweb.com";

/// Mainnet network id.
pub const MAINNET_NETWORK_ID: &str = "mainnet01";

/// Testnet network id.
pub const TESTNET_NETWORK_ID: &str = "testnet04";

/// Chainweb protocol prefix. Part of the node's path contract.
const CHAINWEB_PATH: &str = "chainweb/0.0";

/// Pact API prefix under each chain.
const PACT_API_PATH: &str = "pact/api/v1";

/// Environment variable holding the node base URL.
pub const ENV_NODE_URL: &str = "KADENA_NODE_URL";

/// Environment variable holding the network id.
pub const ENV_NETWORK_ID: &str = "KADENA_NETWORK_ID";

/// Environment variable holding the chain id.
pub const ENV_CHAIN_ID: &str = "CHAIN_ID";

/// Pact API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Durable submission.
    Send,
    /// Read-only simulated execution.
    Local,
    /// Long-poll for a result.
    Listen,
}

impl Endpoint {
    /// Path suffix appended after the Pact API prefix.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Send => "/send",
            Self::Local => "/local",
            Self::Listen => "/listen",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.suffix().trim_start_matches('/'))
    }
}

/// Node location and the network/chain a command targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub base_url: String,
    pub network_id: String,
    pub chain_id: String,
}

impl NetworkConfig {
    /// Create a config. A trailing `/` on the base URL is dropped.
    pub fn new(
        base_url: impl Into<String>,
        network_id: impl Into<String>,
        chain_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            network_id: network_id.into(),
            chain_id: chain_id.into(),
        }
    }

    /// Mainnet via the public node.
    pub fn mainnet(chain_id: impl Into<String>) -> Self {
        Self::new(MAINNET_API_URL, MAINNET_NETWORK_ID, chain_id)
    }

    /// Testnet via the public node.
    pub fn testnet(chain_id: impl Into<String>) -> Self {
        Self::new(TESTNET_API_URL, TESTNET_NETWORK_ID, chain_id)
    }

    /// Read the config from `KADENA_NODE_URL`, `KADENA_NETWORK_ID` and `CHAIN_ID`.
    ///
    /// The node URL is required; network id falls back to testnet and the
    /// chain id to `1`.
    pub fn from_env() -> SdkResult<Self> {
        let base_url = std::env::var(ENV_NODE_URL)
            .map_err(|_| SdkError::InvalidParameter(format!("{} is not set", ENV_NODE_URL)))?;
        let network_id =
            std::env::var(ENV_NETWORK_ID).unwrap_or_else(|_| TESTNET_NETWORK_ID.to_string());
        let chain_id = std::env::var(ENV_CHAIN_ID).unwrap_or_else(|_| "1".to_string());
        Ok(Self::new(base_url, network_id, chain_id))
    }

    /// Same node and network, different chain.
    pub fn with_chain(&self, chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            ..self.clone()
        }
    }

    /// URL of `endpoint` on this config's chain.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        build_url(&self.base_url, &self.network_id, &self.chain_id, endpoint)
    }
}

/// Build `<base>/chainweb/0.0/<network>/chain/<chain>/pact/api/v1<suffix>`.
pub fn build_url(base_url: &str, network_id: &str, chain_id: &str, endpoint: Endpoint) -> String {
    format!(
        "{}/{}/{}/chain/{}/{}{}",
        base_url.trim_end_matches('/'),
        CHAINWEB_PATH,
        urlencoding::encode(network_id),
        urlencoding::encode(chain_id),
        PACT_API_PATH,
        endpoint.suffix()
    )
}
