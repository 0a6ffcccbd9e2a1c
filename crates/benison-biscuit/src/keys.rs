//! Keypair management for the signing principal, and client key decoding.

use crate::error::CredentialError;
use biscuit_auth::{Algorithm, KeyPair as BiscuitKeyPair, PrivateKey, PublicKey};
use rand::RngCore;
use std::path::Path;

const ED25519_KEY_LEN: usize = 32;
/// SEC1 compressed and uncompressed P-256 point lengths.
const P256_COMPRESSED_LEN: usize = 33;
const P256_UNCOMPRESSED_LEN: usize = 65;

/// An Ed25519 keypair for signing blessings.
pub struct KeyPair {
    inner: BiscuitKeyPair,
}

impl KeyPair {
    /// Generate a new random keypair.
    pub fn generate() -> Result<Self, CredentialError> {
        let mut rng = rand::rng();
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);

        let private_key = PrivateKey::from_bytes(&bytes, Algorithm::Ed25519)
            .map_err(|e| CredentialError::KeyGenerationFailed(e.to_string()))?;
        Ok(Self::from_private_key(private_key))
    }

    /// Create a keypair from an existing private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let inner = BiscuitKeyPair::from(&private_key);
        Self { inner }
    }

    /// Load a keypair from a hex-encoded private key string.
    pub fn from_private_key_hex(hex: &str) -> Result<Self, CredentialError> {
        let private_key = PrivateKey::from_bytes_hex(hex.trim(), Algorithm::Ed25519)
            .map_err(|e| CredentialError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self::from_private_key(private_key))
    }

    /// Load a keypair from a private key file.
    pub fn load_from_file(private_key_path: &Path) -> Result<Self, CredentialError> {
        let hex = std::fs::read_to_string(private_key_path)?;
        Self::from_private_key_hex(&hex)
    }

    pub fn inner(&self) -> &BiscuitKeyPair {
        &self.inner
    }

    pub fn public_key(&self) -> PublicKey {
        self.inner.public()
    }

    pub fn private_key_hex(&self) -> String {
        self.inner.private().to_bytes_hex()
    }

    pub fn public_key_hex(&self) -> String {
        self.inner.public().to_bytes_hex()
    }
}

/// Parse a client public key.
///
/// Accepts SubjectPublicKeyInfo DER for Ed25519 or ECDSA P-256, a raw
/// 32-byte Ed25519 key, or a SEC1-encoded P-256 point.
pub fn public_key_from_der(bytes: &[u8]) -> Result<PublicKey, CredentialError> {
    let parsed = match bytes {
        raw if raw.len() == ED25519_KEY_LEN => PublicKey::from_bytes(raw, Algorithm::Ed25519),
        [0x02 | 0x03, ..] if bytes.len() == P256_COMPRESSED_LEN => {
            PublicKey::from_bytes(bytes, Algorithm::Secp256r1)
        }
        [0x04, ..] if bytes.len() == P256_UNCOMPRESSED_LEN => {
            PublicKey::from_bytes(bytes, Algorithm::Secp256r1)
        }
        der => PublicKey::from_der(der),
    };

    parsed.map_err(|e| {
        CredentialError::InvalidPublicKey(format!(
            "unsupported key encoding of {} bytes: {e}",
            bytes.len()
        ))
    })
}

/// Encode a public key as SubjectPublicKeyInfo DER.
pub fn public_key_to_der(key: &PublicKey) -> Result<Vec<u8>, CredentialError> {
    key.to_der()
        .map_err(|e| CredentialError::InvalidPublicKey(e.to_string()))
}

/// Load a public key from hex string.
pub fn load_public_key_hex(hex: &str) -> Result<PublicKey, CredentialError> {
    PublicKey::from_bytes_hex(hex.trim(), Algorithm::Ed25519)
        .map_err(|e| CredentialError::InvalidPublicKey(e.to_string()))
}
