//! Envelope construction.

use chrono::{DateTime, Local};

use crate::command::types::{Envelope, Meta, Payload, SignerCapability};
use crate::network::NetworkConfig;

/// Default gas limit.
pub const DEFAULT_GAS_LIMIT: u64 = 100_000;

/// Default gas price.
pub const DEFAULT_GAS_PRICE: f64 = 1.0e-5;

/// Default time-to-live in seconds.
pub const DEFAULT_TTL: u64 = 28_000;

/// Seconds subtracted from the clock for `creationTime`, absorbing drift
/// against the node's time-bounds check.
pub const DEFAULT_CREATION_TIME_SKEW: i64 = 15;

/// Nonce format: local time to the second.
const NONCE_FORMAT: &str = "%Y%m%d%H%M%S";

/// Overridable envelope constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeDefaults {
    pub gas_limit: u64,
    pub gas_price: f64,
    pub ttl: u64,
    pub creation_time_skew: i64,
}

impl Default for EnvelopeDefaults {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: DEFAULT_GAS_PRICE,
            ttl: DEFAULT_TTL,
            creation_time_skew: DEFAULT_CREATION_TIME_SKEW,
        }
    }
}

impl EnvelopeDefaults {
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_gas_price(mut self, gas_price: f64) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_creation_time_skew(mut self, secs: i64) -> Self {
        self.creation_time_skew = secs;
        self
    }
}

/// Inputs to [`build_envelope`].
///
/// Gas values are passed through unchecked; the node rejects bad ones.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandParams {
    pub sender: String,
    pub payload: Payload,
    pub signers: Vec<SignerCapability>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<f64>,
}

impl CommandParams {
    pub fn new(sender: impl Into<String>, payload: Payload, signers: Vec<SignerCapability>) -> Self {
        Self {
            sender: sender.into(),
            payload,
            signers,
            gas_limit: None,
            gas_price: None,
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_gas_price(mut self, gas_price: f64) -> Self {
        self.gas_price = Some(gas_price);
        self
    }
}

/// Build an unsigned envelope stamped with the current local time.
pub fn build_envelope(
    config: &NetworkConfig,
    defaults: &EnvelopeDefaults,
    params: CommandParams,
) -> Envelope {
    build_envelope_at(config, defaults, params, Local::now())
}

/// Build an unsigned envelope against a fixed clock reading.
pub fn build_envelope_at(
    config: &NetworkConfig,
    defaults: &EnvelopeDefaults,
    params: CommandParams,
    now: DateTime<Local>,
) -> Envelope {
    Envelope {
        network_id: config.network_id.clone(),
        payload: params.payload,
        signers: params.signers,
        meta: Meta {
            gas_limit: params.gas_limit.unwrap_or(defaults.gas_limit),
            chain_id: config.chain_id.clone(),
            gas_price: params.gas_price.unwrap_or(defaults.gas_price),
            sender: params.sender,
            ttl: defaults.ttl,
            creation_time: now.timestamp() - defaults.creation_time_skew,
        },
        nonce: now.format(NONCE_FORMAT).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    fn params() -> CommandParams {
        CommandParams::new(
            "k:abc",
            Payload::exec_code("\"hello\""),
            vec![SignerCapability::new("abc", vec![])],
        )
    }

    #[test]
    fn test_defaults_applied() {
        let config = NetworkConfig::testnet("1");
        let envelope = build_envelope_at(&config, &EnvelopeDefaults::default(), params(), fixed_now());

        assert_eq!(envelope.network_id, "testnet04");
        assert_eq!(envelope.meta.chain_id, "1");
        assert_eq!(envelope.meta.gas_limit, DEFAULT_GAS_LIMIT);
        assert_eq!(envelope.meta.gas_price, DEFAULT_GAS_PRICE);
        assert_eq!(envelope.meta.ttl, 28_000);
    }

    #[test]
    fn test_creation_time_and_nonce() {
        let config = NetworkConfig::testnet("1");
        let now = fixed_now();
        let envelope = build_envelope_at(&config, &EnvelopeDefaults::default(), params(), now);

        assert_eq!(envelope.meta.creation_time, now.timestamp() - 15);
        assert_eq!(envelope.nonce, "20240309140507");
    }

    #[test]
    fn test_overrides() {
        let config = NetworkConfig::mainnet("2");
        let defaults = EnvelopeDefaults::default()
            .with_ttl(600)
            .with_creation_time_skew(0);
        let envelope = build_envelope_at(
            &config,
            &defaults,
            params().with_gas_limit(2500).with_gas_price(1e-8),
            fixed_now(),
        );

        assert_eq!(envelope.meta.gas_limit, 2500);
        assert_eq!(envelope.meta.gas_price, 1e-8);
        assert_eq!(envelope.meta.ttl, 600);
        assert_eq!(envelope.meta.creation_time, fixed_now().timestamp());
        assert_eq!(envelope.meta.chain_id, "2");
    }

    #[test]
    fn test_unvalidated_gas_passes_through() {
        let config = NetworkConfig::testnet("1");
        let envelope = build_envelope_at(
            &config,
            &EnvelopeDefaults::default(),
            params().with_gas_limit(0).with_gas_price(-1.0),
            fixed_now(),
        );
        assert_eq!(envelope.meta.gas_limit, 0);
        assert_eq!(envelope.meta.gas_price, -1.0);
    }
}
