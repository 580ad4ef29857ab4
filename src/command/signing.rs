//! Hashing and signing.
//!
//! The content hash is BLAKE2b-256 over the encoded command, base64url without
//! padding. Signatures are Ed25519 over the raw 32 digest bytes and are hex
//! encoded.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::{Signature as Ed25519Signature, Signer, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::command::canonical::encode_envelope;
use crate::command::types::Envelope;
use crate::error::{SdkError, SdkResult};
use crate::keys::KeyPair;

type Blake2b256 = Blake2b<U32>;

/// BLAKE2b-256 digest of `cmd`.
pub fn hash_command(cmd: &str) -> [u8; 32] {
    Blake2b256::digest(cmd.as_bytes()).into()
}

/// base64url (no padding) form of a digest.
pub fn encode_hash(digest: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(digest)
}

/// Decode a content hash back to digest bytes.
pub fn decode_hash(hash: &str) -> SdkResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(hash)
        .map_err(|e| SdkError::InvalidSignature(format!("hash is not valid base64url: {}", e)))
}

/// Hash `cmd` and sign the digest. Returns `(content hash, signature hex)`.
///
/// Fails with [`SdkError::Authorization`] before hashing if the key pair has
/// no private key.
pub fn hash_and_sign(cmd: &str, key_pair: &KeyPair) -> SdkResult<(String, String)> {
    let signing_key = key_pair.signing_key()?;
    let digest = hash_command(cmd);
    let signature = signing_key.sign(&digest);
    Ok((encode_hash(&digest), hex::encode(signature.to_bytes())))
}

/// Check a hex signature over `digest` against a hex public key.
pub fn verify_signature(digest: &[u8], sig_hex: &str, pub_key_hex: &str) -> SdkResult<()> {
    let pub_bytes: [u8; 32] = hex::decode(pub_key_hex)
        .map_err(|e| SdkError::InvalidKey(format!("public key is not valid hex: {}", e)))?
        .try_into()
        .map_err(|_| SdkError::InvalidKey("public key must be 32 bytes".to_string()))?;
    let verifying_key = VerifyingKey::from_bytes(&pub_bytes)
        .map_err(|e| SdkError::InvalidKey(format!("invalid public key: {}", e)))?;

    let sig_bytes = hex::decode(sig_hex)
        .map_err(|e| SdkError::InvalidSignature(format!("signature is not valid hex: {}", e)))?;
    let signature = Ed25519Signature::from_slice(&sig_bytes)
        .map_err(|e| SdkError::InvalidSignature(format!("invalid signature: {}", e)))?;

    verifying_key
        .verify(digest, &signature)
        .map_err(|_| SdkError::InvalidSignature("signature verification failed".to_string()))
}

/// One entry of `sigs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub sig: String,
}

/// A command ready for submission. `cmd` is kept verbatim; it is the exact
/// string `hash` was computed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCommand {
    pub hash: String,
    pub sigs: Vec<Signature>,
    pub cmd: String,
}

impl SignedCommand {
    /// Encode and sign an envelope with one key pair, or leave `sigs` empty
    /// when `include_signer` is false.
    pub fn from_envelope(
        envelope: &Envelope,
        key_pair: &KeyPair,
        include_signer: bool,
    ) -> SdkResult<Self> {
        let cmd = encode_envelope(envelope)?;
        if include_signer {
            Self::sign_with(cmd, &[key_pair])
        } else {
            Ok(Self::unsigned(cmd))
        }
    }

    /// Sign `cmd` with each key pair, in order.
    pub fn sign_with(cmd: String, key_pairs: &[&KeyPair]) -> SdkResult<Self> {
        // refuse up front so no partial signature set is produced
        for key_pair in key_pairs {
            key_pair.signing_key()?;
        }

        let digest = hash_command(&cmd);
        let sigs = key_pairs
            .iter()
            .map(|kp| -> SdkResult<Signature> {
                let signature = kp.signing_key()?.sign(&digest);
                Ok(Signature {
                    sig: hex::encode(signature.to_bytes()),
                })
            })
            .collect::<SdkResult<Vec<_>>>()?;

        Ok(Self {
            hash: encode_hash(&digest),
            sigs,
            cmd,
        })
    }

    /// Hash `cmd` without signing.
    pub fn unsigned(cmd: String) -> Self {
        Self {
            hash: encode_hash(&hash_command(&cmd)),
            sigs: Vec::new(),
            cmd,
        }
    }

    /// Recompute the hash from `cmd` and compare.
    pub fn hash_matches(&self) -> bool {
        encode_hash(&hash_command(&self.cmd)) == self.hash
    }

    /// Verify every signature against the signer at the same position in
    /// `pub_keys`.
    pub fn verify(&self, pub_keys: &[&str]) -> SdkResult<()> {
        if !self.hash_matches() {
            return Err(SdkError::InvalidSignature(
                "hash does not match command".to_string(),
            ));
        }
        if pub_keys.len() != self.sigs.len() {
            return Err(SdkError::InvalidSignature(format!(
                "expected {} signatures, found {}",
                pub_keys.len(),
                self.sigs.len()
            )));
        }
        let digest = hash_command(&self.cmd);
        for (sig, pub_key) in self.sigs.iter().zip(pub_keys) {
            verify_signature(&digest, &sig.sig, pub_key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    #[test]
    fn test_blake2b_reference_vector() {
        assert_eq!(
            hex::encode(hash_command("hello")),
            "324dcf027dd4a30a932c441f365a25e86b173defa4b8e58948253471b81b72cf"
        );
        assert_eq!(
            encode_hash(&hash_command("hello")),
            "Mk3PAn3UowqTLEQfNlol6GsXPe-kuOWJSCU0cbgbcs8"
        );
    }

    #[test]
    fn test_hash_has_no_padding() {
        let hash = encode_hash(&hash_command("anything"));
        assert_eq!(hash.len(), 43);
        assert!(!hash.contains('='));
        assert_eq!(decode_hash(&hash).unwrap(), hash_command("anything").to_vec());
    }

    #[test]
    fn test_signature_reference_vector() {
        let kp = KeyPair::new(SECRET, PUBLIC).unwrap();
        let (hash, sig) = hash_and_sign("hello", &kp).unwrap();
        assert_eq!(hash, "Mk3PAn3UowqTLEQfNlol6GsXPe-kuOWJSCU0cbgbcs8");
        assert_eq!(
            sig,
            "f67f563a5c8e14f27e3c034720f78780fb03bbfb3da2141ac57a225695f47258\
             a266de7f9e43ea4a0ce6a08bf668cd4fba940cd52815151214a37ce918816406"
        );
        verify_signature(&hash_command("hello"), &sig, PUBLIC).unwrap();
    }

    #[test]
    fn test_public_only_refuses_to_sign() {
        let kp = KeyPair::public_only(PUBLIC).unwrap();
        let err = hash_and_sign("hello", &kp).unwrap_err();
        assert!(matches!(err, SdkError::Authorization(_)));

        let err = SignedCommand::sign_with("hello".to_string(), &[&kp]).unwrap_err();
        assert!(matches!(err, SdkError::Authorization(_)));
    }

    #[test]
    fn test_tampered_command_fails_verification() {
        let kp = KeyPair::new(SECRET, PUBLIC).unwrap();
        let mut signed = SignedCommand::sign_with("{\"a\":1}".to_string(), &[&kp]).unwrap();
        signed.verify(&[PUBLIC]).unwrap();

        signed.cmd = "{\"a\": 1}".to_string();
        assert!(!signed.hash_matches());
        assert!(matches!(
            signed.verify(&[PUBLIC]).unwrap_err(),
            SdkError::InvalidSignature(_)
        ));
    }

    #[test]
    fn test_bad_hash_and_signature_encoding() {
        assert!(matches!(
            decode_hash("not base64!").unwrap_err(),
            SdkError::InvalidSignature(_)
        ));
        assert!(matches!(
            verify_signature(&hash_command("hello"), "zz", PUBLIC).unwrap_err(),
            SdkError::InvalidSignature(_)
        ));
        assert!(matches!(
            verify_signature(&hash_command("hello"), "00", "abcd").unwrap_err(),
            SdkError::InvalidKey(_)
        ));
    }

    #[test]
    fn test_signature_count_mismatch() {
        let signed = SignedCommand::unsigned("hello".to_string());
        assert!(matches!(
            signed.verify(&[PUBLIC]).unwrap_err(),
            SdkError::InvalidSignature(_)
        ));
    }

    #[test]
    fn test_unsigned_has_hash_and_no_sigs() {
        let signed = SignedCommand::unsigned("hello".to_string());
        assert!(signed.sigs.is_empty());
        assert_eq!(signed.hash, "Mk3PAn3UowqTLEQfNlol6GsXPe-kuOWJSCU0cbgbcs8");
    }

    #[test]
    fn test_wrong_key_does_not_verify() {
        let kp = KeyPair::new(SECRET, PUBLIC).unwrap();
        let (_, sig) = hash_and_sign("hello", &kp).unwrap();
        let other = "3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c";
        let err = verify_signature(&hash_command("hello"), &sig, other).unwrap_err();
        assert!(matches!(err, SdkError::InvalidSignature(_)));
    }
}
