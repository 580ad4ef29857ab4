//! Command construction, canonical encoding and signing.
//!
//! A command goes through three stages:
//!
//! 1. [`build_envelope`] stamps an [`Envelope`] with network, chain, gas and time.
//! 2. [`encode_envelope`] turns it into the exact `cmd` string.
//! 3. [`SignedCommand`] hashes that string and signs the digest.
//!
//! ```rust,ignore
//! use kadena_sdk::command::*;
//! use kadena_sdk::network::NetworkConfig;
//!
//! let config = NetworkConfig::testnet("1");
//! let params = CommandParams::new(
//!     key_pair.k_account(),
//!     Payload::exec_code("(coin.details \"k:abc\")"),
//!     vec![SignerCapability::new(key_pair.pub_key(), vec![Capability::gas()])],
//! );
//! let envelope = build_envelope(&config, &EnvelopeDefaults::default(), params);
//! let signed = SignedCommand::from_envelope(&envelope, &key_pair, true)?;
//! ```

pub mod builder;
pub mod canonical;
pub mod signing;
pub mod types;

pub use builder::{
    build_envelope, build_envelope_at, CommandParams, EnvelopeDefaults, DEFAULT_CREATION_TIME_SKEW,
    DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE, DEFAULT_TTL,
};
pub use canonical::encode_envelope;
pub use signing::{
    decode_hash, encode_hash, hash_and_sign, hash_command, verify_signature, Signature,
    SignedCommand,
};
pub use types::{Capability, Envelope, ExecPayload, Meta, Payload, SignerCapability};
