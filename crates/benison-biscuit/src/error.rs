//! Error types for the blessing crate.

use thiserror::Error;

/// Errors that can occur while handling keys, caveats and blessings.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Failed to generate keypair.
    #[error("failed to generate keypair: {0}")]
    KeyGenerationFailed(String),

    /// Failed to parse private key.
    #[error("failed to parse private key: {0}")]
    InvalidPrivateKey(String),

    /// Failed to parse public key.
    #[error("failed to parse public key: {0}")]
    InvalidPublicKey(String),

    /// A caveat is structurally invalid.
    #[error("invalid caveat: {0}")]
    InvalidCaveat(String),

    /// Failed to encode or decode a caveat list.
    #[error("caveat codec error: {0}")]
    CaveatCodec(String),

    /// A blessing name or extension is malformed.
    #[error("invalid blessing name {0:?}")]
    InvalidBlessingName(String),

    /// The principal was asked to bless with a name it does not hold.
    #[error("principal does not hold blessing {with:?}")]
    NotBlessedWith { with: String },

    /// Building or signing the blessing failed.
    #[error("failed to sign blessing: {0}")]
    SigningFailed(String),

    /// Failed to serialize a blessing.
    #[error("blessing serialization error: {0}")]
    SerializationError(String),

    /// Failed to issue a revocation caveat.
    #[error("failed to issue revocation caveat: {0}")]
    RevocationFailed(String),

    /// No revocation caveat exists with this identifier.
    #[error("unknown revocation id {0:?}")]
    UnknownRevocation(String),

    /// IO error (reading/writing keys).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
