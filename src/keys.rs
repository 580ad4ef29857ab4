//! Key material for signing commands.
//!
//! A [`KeySource`] describes where keys come from. It is resolved once at
//! startup into an immutable [`KeyPair`]:
//!
//! ```rust,ignore
//! use kadena_sdk::keys::{KeySource, MemorySecretStore};
//!
//! let source = KeySource::from_secret_json(&secret_string)?;
//! let key_pair = source.resolve(&MemorySecretStore::default())?;
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use ed25519_dalek::SigningKey;
use serde::Deserialize;

use crate::error::{SdkError, SdkResult};

/// Length of an Ed25519 key in bytes.
pub const KEY_LENGTH: usize = 32;

/// A public key with an optional private key, both hex encoded.
///
/// Public-only pairs can build and submit unsigned commands but cannot sign.
#[derive(Clone)]
pub struct KeyPair {
    pub_key: String,
    signing_key: Option<SigningKey>,
}

impl KeyPair {
    /// Create a signing key pair. The public key must match the private key.
    pub fn new(priv_key: &str, pub_key: &str) -> SdkResult<Self> {
        let seed = decode_key(priv_key, "private key")?;
        let declared = decode_key(pub_key, "public key")?;

        let signing_key = SigningKey::from_bytes(&seed);
        if signing_key.verifying_key().to_bytes() != declared {
            return Err(SdkError::InvalidKey(
                "public key does not match private key".to_string(),
            ));
        }

        Ok(Self {
            pub_key: hex::encode(declared),
            signing_key: Some(signing_key),
        })
    }

    /// Create a public-only key pair.
    pub fn public_only(pub_key: &str) -> SdkResult<Self> {
        let declared = decode_key(pub_key, "public key")?;
        Ok(Self {
            pub_key: hex::encode(declared),
            signing_key: None,
        })
    }

    /// Lowercase hex public key.
    pub fn pub_key(&self) -> &str {
        &self.pub_key
    }

    /// The `k:` account name derived from the public key.
    pub fn k_account(&self) -> String {
        format!("k:{}", self.pub_key)
    }

    /// Whether this pair can sign.
    pub fn can_sign(&self) -> bool {
        self.signing_key.is_some()
    }

    /// The signing key, or an authorization error for public-only pairs.
    pub(crate) fn signing_key(&self) -> SdkResult<&SigningKey> {
        self.signing_key.as_ref().ok_or_else(|| {
            SdkError::Authorization(format!(
                "no private key available for {}",
                self.pub_key
            ))
        })
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("pub_key", &self.pub_key)
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

fn decode_key(value: &str, what: &str) -> SdkResult<[u8; KEY_LENGTH]> {
    let bytes = hex::decode(value.trim())
        .map_err(|e| SdkError::InvalidKey(format!("{} is not valid hex: {}", what, e)))?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        SdkError::InvalidKey(format!(
            "{} must be {} bytes, got {}",
            what,
            KEY_LENGTH,
            b.len()
        ))
    })
}

// ============================================================================
// Secret stores
// ============================================================================

/// Lookup of private keys held outside the key file (an OS keyring, a
/// secrets manager).
pub trait SecretStore {
    /// Return the secret stored under `service`/`username`, if any.
    fn get_password(&self, service: &str, username: &str) -> Option<String>;
}

/// In-memory secret store.
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    entries: HashMap<(String, String), String>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret.
    pub fn with_entry(
        mut self,
        service: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        self.entries
            .insert((service.into(), username.into()), secret.into());
        self
    }
}

impl SecretStore for MemorySecretStore {
    fn get_password(&self, service: &str, username: &str) -> Option<String> {
        self.entries
            .get(&(service.to_string(), username.to_string()))
            .cloned()
    }
}

// ============================================================================
// Key sources
// ============================================================================

/// Where a key pair comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Key file naming a keyring entry for the private key.
    Keyring { path: PathBuf },
    /// Keys held directly in memory.
    Inline { priv_key: String, pub_key: String },
    /// Public key only; signing is refused.
    PublicOnly { pub_key: String },
}

/// Key file format for [`KeySource::Keyring`].
#[derive(Debug, Deserialize)]
struct KeyringFile {
    priv_key: KeyringEntry,
    pub_key: String,
}

#[derive(Debug, Deserialize)]
struct KeyringEntry {
    service: String,
    username: String,
}

/// Secret value format `{"priv_key": hex, "pub_key": hex}`.
#[derive(Debug, Deserialize)]
struct InlineSecret {
    priv_key: String,
    pub_key: String,
}

impl KeySource {
    /// Parse a secret-store value of the form `{"priv_key": hex, "pub_key": hex}`.
    pub fn from_secret_json(secret: &str) -> SdkResult<Self> {
        let parsed: InlineSecret = serde_json::from_str(secret)
            .map_err(|e| SdkError::Credential(format!("Failed to parse secret: {}", e)))?;
        Ok(Self::Inline {
            priv_key: parsed.priv_key,
            pub_key: parsed.pub_key,
        })
    }

    /// Resolve into a key pair. `store` is only consulted for keyring sources.
    pub fn resolve(&self, store: &dyn SecretStore) -> SdkResult<KeyPair> {
        match self {
            Self::Keyring { path } => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    SdkError::Credential(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::resolve_keyring_file(&text, store)
            }
            Self::Inline { priv_key, pub_key } => KeyPair::new(priv_key, pub_key),
            Self::PublicOnly { pub_key } => KeyPair::public_only(pub_key),
        }
    }

    fn resolve_keyring_file(text: &str, store: &dyn SecretStore) -> SdkResult<KeyPair> {
        let file: KeyringFile = serde_json::from_str(text)
            .map_err(|e| SdkError::Credential(format!("Invalid key file: {}", e)))?;

        let priv_key = store
            .get_password(&file.priv_key.service, &file.priv_key.username)
            .ok_or_else(|| {
                SdkError::Credential(format!(
                    "No keyring entry for {}/{}",
                    file.priv_key.service, file.priv_key.username
                ))
            })?;

        KeyPair::new(&priv_key, &file.pub_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8032, test 1
    const SECRET: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    #[test]
    fn test_key_pair_accepts_matching_keys() {
        let kp = KeyPair::new(SECRET, PUBLIC).unwrap();
        assert!(kp.can_sign());
        assert_eq!(kp.pub_key(), PUBLIC);
        assert_eq!(kp.k_account(), format!("k:{}", PUBLIC));
    }

    #[test]
    fn test_key_pair_rejects_mismatched_public_key() {
        let other = "3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c";
        let err = KeyPair::new(SECRET, other).unwrap_err();
        assert!(matches!(err, SdkError::InvalidKey(_)));
    }

    #[test]
    fn test_key_pair_rejects_bad_hex_and_length() {
        assert!(matches!(
            KeyPair::public_only("zz").unwrap_err(),
            SdkError::InvalidKey(_)
        ));
        assert!(matches!(
            KeyPair::public_only("abcd").unwrap_err(),
            SdkError::InvalidKey(_)
        ));
    }

    #[test]
    fn test_public_only_cannot_sign() {
        let kp = KeyPair::public_only(PUBLIC).unwrap();
        assert!(!kp.can_sign());
        assert!(matches!(
            kp.signing_key().unwrap_err(),
            SdkError::Authorization(_)
        ));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let kp = KeyPair::new(SECRET, PUBLIC).unwrap();
        let debug = format!("{:?}", kp);
        assert!(!debug.contains(SECRET));
    }

    #[test]
    fn test_secret_json_source() {
        let secret = format!(r#"{{"priv_key": "{}", "pub_key": "{}"}}"#, SECRET, PUBLIC);
        let source = KeySource::from_secret_json(&secret).unwrap();
        let kp = source.resolve(&MemorySecretStore::new()).unwrap();
        assert!(kp.can_sign());
    }

    #[test]
    fn test_keyring_file_resolution() {
        let text = format!(
            r#"{{"priv_key": {{"service": "kadena", "username": "deployer"}}, "pub_key": "{}"}}"#,
            PUBLIC
        );
        let store = MemorySecretStore::new().with_entry("kadena", "deployer", SECRET);
        let kp = KeySource::resolve_keyring_file(&text, &store).unwrap();
        assert_eq!(kp.pub_key(), PUBLIC);
        assert!(kp.can_sign());
    }

    #[test]
    fn test_keyring_missing_entry() {
        let text = format!(
            r#"{{"priv_key": {{"service": "kadena", "username": "nobody"}}, "pub_key": "{}"}}"#,
            PUBLIC
        );
        let err = KeySource::resolve_keyring_file(&text, &MemorySecretStore::new()).unwrap_err();
        assert!(matches!(err, SdkError::Credential(_)));
    }

    #[test]
    fn test_keyring_missing_file() {
        let source = KeySource::Keyring {
            path: PathBuf::from("/nonexistent/keys.json"),
        };
        let err = source.resolve(&MemorySecretStore::new()).unwrap_err();
        assert!(matches!(err, SdkError::Credential(_)));
    }
}
