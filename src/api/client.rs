//! Pact API client implementation.
//!
//! The [`KadenaClient`] wraps the three node endpoints (`send`, `local`,
//! `listen`). Each call is a single request: nothing is retried and no
//! timeout is applied unless one is configured on the builder.
//!
//! # Example
//!
//! ```rust,ignore
//! use kadena_sdk::api::KadenaClient;
//! use kadena_sdk::command::{Capability, Payload, SignerCapability};
//! use kadena_sdk::network::NetworkConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = KadenaClient::new(NetworkConfig::testnet("1"), key_pair)?;
//!
//!     let envelope = client.build_command(
//!         client.key_pair().k_account(),
//!         Payload::exec_code("\"hello\""),
//!         vec![SignerCapability::new(client.key_pair().pub_key(), vec![Capability::gas()])],
//!     );
//!
//!     let preview = client.local(&envelope, true).await?;
//!     println!("gas: {:?}", preview.gas);
//!
//!     let result = client.send_and_listen(&envelope).await?;
//!     println!("status: {}", result.result.status);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::types::{CommandResult, ListenRequest, SendRequest, SendResponse};
use crate::command::{
    build_envelope, CommandParams, Envelope, EnvelopeDefaults, Payload, SignedCommand,
    SignerCapability,
};
use crate::error::{SdkError, SdkResult};
use crate::keys::KeyPair;
use crate::network::{build_url, Endpoint, NetworkConfig};

/// Builder for configuring [`KadenaClient`].
#[derive(Debug, Clone)]
pub struct KadenaClientBuilder {
    config: NetworkConfig,
    key_pair: KeyPair,
    defaults: EnvelopeDefaults,
    timeout: Option<Duration>,
    default_headers: Vec<(String, String)>,
}

impl KadenaClientBuilder {
    pub fn new(config: NetworkConfig, key_pair: KeyPair) -> Self {
        Self {
            config,
            key_pair,
            defaults: EnvelopeDefaults::default(),
            timeout: None,
            default_headers: Vec::new(),
        }
    }

    /// Override gas, ttl and creation time skew defaults.
    pub fn defaults(mut self, defaults: EnvelopeDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set a request timeout. `listen` may otherwise block for as long as the
    /// node holds the poll open.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    pub fn build(self) -> SdkResult<KadenaClient> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let headers = json_headers(&self.default_headers)?;
        let http_client = builder.default_headers(headers).build()?;

        Ok(KadenaClient {
            http_client,
            config: self.config,
            key_pair: self.key_pair,
            defaults: self.defaults,
        })
    }
}

/// JSON content negotiation plus any caller-supplied headers.
fn json_headers(extra: &[(String, String)]) -> SdkResult<HeaderMap> {
    let json = HeaderValue::from_static("application/json");
    let mut headers = HeaderMap::from_iter([(CONTENT_TYPE, json.clone()), (ACCEPT, json)]);

    for (name, value) in extra {
        let invalid = |what: &str, e: &dyn std::fmt::Display| {
            SdkError::InvalidParameter(format!("header {} '{}': {}", what, name, e))
        };
        let name_parsed = HeaderName::try_from(name.as_str()).map_err(|e| invalid("name", &e))?;
        let value_parsed = HeaderValue::from_str(value).map_err(|e| invalid("value", &e))?;
        headers.insert(name_parsed, value_parsed);
    }
    Ok(headers)
}

/// Client for a Chainweb node's Pact API.
#[derive(Debug, Clone)]
pub struct KadenaClient {
    http_client: Client,
    config: NetworkConfig,
    key_pair: KeyPair,
    defaults: EnvelopeDefaults,
}

impl KadenaClient {
    /// Create a client with default settings.
    pub fn new(config: NetworkConfig, key_pair: KeyPair) -> SdkResult<Self> {
        KadenaClientBuilder::new(config, key_pair).build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder(config: NetworkConfig, key_pair: KeyPair) -> KadenaClientBuilder {
        KadenaClientBuilder::new(config, key_pair)
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn defaults(&self) -> &EnvelopeDefaults {
        &self.defaults
    }

    // =========================================================================
    // Command construction
    // =========================================================================

    /// Build an envelope for this client's network and chain with default gas.
    pub fn build_command(
        &self,
        sender: impl Into<String>,
        payload: Payload,
        signers: Vec<SignerCapability>,
    ) -> Envelope {
        self.build_command_with(CommandParams::new(sender, payload, signers))
    }

    /// Build an envelope from full parameters.
    pub fn build_command_with(&self, params: CommandParams) -> Envelope {
        build_envelope(&self.config, &self.defaults, params)
    }

    /// Encode and optionally sign an envelope with this client's key pair.
    pub fn prepare(&self, envelope: &Envelope, include_signer: bool) -> SdkResult<SignedCommand> {
        SignedCommand::from_envelope(envelope, &self.key_pair, include_signer)
    }

    /// URL of `endpoint` for the envelope's network and chain.
    pub fn url_for(&self, envelope: &Envelope, endpoint: Endpoint) -> String {
        build_url(
            &self.config.base_url,
            &envelope.network_id,
            &envelope.meta.chain_id,
            endpoint,
        )
    }

    // =========================================================================
    // Pact API endpoints
    // =========================================================================

    /// Submit a command for durable execution.
    ///
    /// With `include_signer == false` the command goes out with `sigs: []`.
    pub async fn send(&self, envelope: &Envelope, include_signer: bool) -> SdkResult<SendResponse> {
        let signed = self.prepare(envelope, include_signer)?;
        let body = SendRequest { cmds: vec![signed] };
        let url = self.url_for(envelope, Endpoint::Send);

        let response: SendResponse = self.post(&url, &body).await?;
        tracing::debug!(request_keys = ?response.request_keys, "Command submitted");
        Ok(response)
    }

    /// Execute a command without committing it, e.g. to preview gas.
    pub async fn local(&self, envelope: &Envelope, include_signer: bool) -> SdkResult<CommandResult> {
        let signed = self.prepare(envelope, include_signer)?;
        let url = self.url_for(envelope, Endpoint::Local);
        self.post(&url, &signed).await
    }

    /// Block until `request_key` reaches a result on this client's chain.
    pub async fn listen(&self, request_key: &str) -> SdkResult<CommandResult> {
        let url = self.config.endpoint_url(Endpoint::Listen);
        self.listen_at(&url, request_key).await
    }

    /// Submit signed, then listen on the first request key.
    pub async fn send_and_listen(&self, envelope: &Envelope) -> SdkResult<CommandResult> {
        let response = self.send(envelope, true).await?;
        let request_key = response
            .request_keys
            .first()
            .ok_or(SdkError::MissingRequestKey)?;
        tracing::debug!(request_key = %request_key, "Listening for result");

        let url = self.url_for(envelope, Endpoint::Listen);
        self.listen_at(&url, request_key).await
    }

    /// Run read-only code through `local` with no signers.
    pub async fn run_pact(&self, code: impl Into<String>, data: Value) -> SdkResult<CommandResult> {
        let envelope = self.build_command(
            self.key_pair.k_account(),
            Payload::exec(code, data),
            Vec::new(),
        );
        self.local(&envelope, false).await
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    async fn listen_at(&self, url: &str, request_key: &str) -> SdkResult<CommandResult> {
        let body = ListenRequest {
            listen: request_key.to_string(),
        };

        let value: Value = match self.post(url, &body).await {
            Ok(value) => value,
            Err(SdkError::Transport(e)) if e.is_timeout() => {
                return Err(SdkError::Timeout(format!(
                    "listen on {} timed out: {}",
                    request_key, e
                )));
            }
            Err(e) => return Err(e),
        };

        parse_listen_response(value)
    }

    /// POST a JSON body and decode a 2xx JSON response.
    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> SdkResult<T> {
        tracing::debug!(url = %url, "POST");
        let response = self.http_client.post(url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) => text,
                Err(e) => format!("HTTP {} (body unreadable: {})", status, e),
            };
            tracing::warn!(status = status.as_u16(), url = %url, "Node rejected request");
            return Err(SdkError::RemoteRejection {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            SdkError::UnexpectedResponse(format!("Failed to deserialize response: {}: {}", e, text))
        })
    }
}

/// A listen response without a `result` is the node giving up on the poll.
fn parse_listen_response(value: Value) -> SdkResult<CommandResult> {
    if value.get("result").is_none() {
        return Err(SdkError::Timeout(format!("no terminal result: {}", value)));
    }
    serde_json::from_value(value).map_err(SdkError::from)
}
