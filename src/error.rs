//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    /// Signing was attempted with a public-only key pair.
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Connection or transport failure reaching the node. Never retried.
    #[cfg(feature = "http")]
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with a non-2xx status. The body is kept verbatim.
    #[error("Remote rejection {status}: {body}")]
    RemoteRejection { status: u16, body: String },

    /// A listen call came back without a terminal result.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Malformed or mismatched key material.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A signature or content hash that does not check out.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Key file or secret store failure.
    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A 2xx response whose body could not be read as the expected type.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid client configuration.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The send response carried no request key to listen on.
    #[error("Send response contained no request key")]
    MissingRequestKey,
}

/// Result type alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

impl SdkError {
    /// Whether this error is a node-level rejection rather than a local failure.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteRejection { .. })
    }
}
