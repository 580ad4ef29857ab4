//! Canonical JSON encoding of envelopes.
//!
//! The encoded string is both what gets hashed and what is sent as `cmd`, so
//! the layout must never depend on map iteration order. Struct fields are
//! written in a fixed order here; free-form values (`data`, capability args)
//! go through `serde_json::Value`, whose objects are key-sorted.
//!
//! Output is compact: no whitespace between tokens.

use serde::Serialize;

use crate::command::types::{Capability, Envelope, Meta, Payload, SignerCapability};
use crate::error::SdkResult;

/// Encode an envelope to the exact string that is hashed and transmitted.
pub fn encode_envelope(envelope: &Envelope) -> SdkResult<String> {
    let mut obj = JsonObject::new();
    obj.field("networkId", &envelope.network_id)?;
    obj.raw("payload", &encode_payload(&envelope.payload)?);
    obj.raw(
        "signers",
        &encode_array(&envelope.signers, encode_signer)?,
    );
    obj.raw("meta", &encode_meta(&envelope.meta)?);
    obj.field("nonce", &envelope.nonce)?;
    Ok(obj.finish())
}

fn encode_payload(payload: &Payload) -> SdkResult<String> {
    match payload {
        Payload::Exec(exec) => {
            let mut inner = JsonObject::new();
            inner.field("data", &exec.data)?;
            inner.field("code", &exec.code)?;

            let mut outer = JsonObject::new();
            outer.raw("exec", &inner.finish());
            Ok(outer.finish())
        }
    }
}

fn encode_signer(signer: &SignerCapability) -> SdkResult<String> {
    let mut obj = JsonObject::new();
    obj.field("pubKey", &signer.pub_key)?;
    if let Some(clist) = &signer.clist {
        obj.raw("clist", &encode_array(clist, encode_capability)?);
    }
    Ok(obj.finish())
}

fn encode_capability(cap: &Capability) -> SdkResult<String> {
    let mut obj = JsonObject::new();
    obj.field("name", &cap.name)?;
    obj.field("args", &cap.args)?;
    Ok(obj.finish())
}

fn encode_meta(meta: &Meta) -> SdkResult<String> {
    let mut obj = JsonObject::new();
    obj.field("gasLimit", &meta.gas_limit)?;
    obj.field("chainId", &meta.chain_id)?;
    obj.field("gasPrice", &meta.gas_price)?;
    obj.field("sender", &meta.sender)?;
    obj.field("ttl", &meta.ttl)?;
    obj.field("creationTime", &meta.creation_time)?;
    Ok(obj.finish())
}

fn encode_array<T>(items: &[T], encode: fn(&T) -> SdkResult<String>) -> SdkResult<String> {
    let parts = items.iter().map(encode).collect::<SdkResult<Vec<_>>>()?;
    Ok(format!("[{}]", parts.join(",")))
}

/// Object writer that keeps keys in call order.
struct JsonObject {
    buf: String,
    empty: bool,
}

impl JsonObject {
    fn new() -> Self {
        Self {
            buf: String::from("{"),
            empty: true,
        }
    }

    fn key(&mut self, key: &str) {
        if !self.empty {
            self.buf.push(',');
        }
        self.empty = false;
        // keys are static ASCII identifiers
        self.buf.push('"');
        self.buf.push_str(key);
        self.buf.push_str("\":");
    }

    fn field<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> SdkResult<()> {
        let encoded = serde_json::to_string(value)?;
        self.key(key);
        self.buf.push_str(&encoded);
        Ok(())
    }

    fn raw(&mut self, key: &str, json: &str) {
        self.key(key);
        self.buf.push_str(json);
    }

    fn finish(mut self) -> String {
        self.buf.push('}');
        self.buf
    }
}
