//! # Kadena Rust SDK
//!
//! Builds, signs and submits Pact commands to Chainweb nodes.
//!
//! ## Modules
//!
//! - [`command`]: Envelope construction, canonical encoding, hashing and signing
//! - [`api`]: HTTP client for the node's `send`, `local` and `listen` endpoints
//! - [`keys`]: Key pairs and the sources they are resolved from
//! - [`network`]: Node URLs, network ids and endpoint URL construction
//! - [`error`]: The SDK error type
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kadena_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let key_pair = KeySource::from_secret_json(&secret)?.resolve(&MemorySecretStore::new())?;
//!     let client = KadenaClient::new(NetworkConfig::testnet("1"), key_pair)?;
//!
//!     let sender = client.key_pair().k_account();
//!     let envelope = client.build_command(
//!         sender.clone(),
//!         Payload::exec_code(format!("(coin.transfer \"{}\" \"k:def\" 1.0)", sender)),
//!         vec![SignerCapability::new(
//!             client.key_pair().pub_key(),
//!             vec![Capability::transfer(sender, "k:def", 1.0), Capability::gas()],
//!         )],
//!     );
//!
//!     let result = client.send_and_listen(&envelope).await?;
//!     println!("{:?}", result.result);
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Pact API request/response types and HTTP client.
pub mod api;

/// Command envelopes, canonical encoding and signing.
pub mod command;

/// SDK error type.
pub mod error;

/// Key pairs and key sources.
pub mod keys;

/// Network constants and URL construction.
pub mod network;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use kadena_sdk::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{CommandResult, PactResult, SendResponse};
    #[cfg(feature = "http")]
    pub use crate::api::{KadenaClient, KadenaClientBuilder};

    pub use crate::command::{
        build_envelope, build_envelope_at, encode_envelope, hash_and_sign, verify_signature,
        Capability, CommandParams, Envelope, EnvelopeDefaults, Meta, Payload, SignedCommand,
        SignerCapability,
    };

    pub use crate::error::{SdkError, SdkResult};

    pub use crate::keys::{KeyPair, KeySource, MemorySecretStore, SecretStore};

    pub use crate::network::{Endpoint, NetworkConfig};
}
