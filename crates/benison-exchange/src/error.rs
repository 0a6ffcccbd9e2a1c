//! Error types for the exchange.
//!
//! The `Display` text of every variant names only the failing stage and is
//! safe to return to callers. Collaborator detail is kept in `detail` for
//! logging.

use crate::encoding::{BASE64_VOM_FORMAT, JSON_FORMAT};
use thiserror::Error;

/// Why an exchange failed.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// `public_key` is not base64url or not a supported key encoding.
    #[error("failed to decode public key")]
    MalformedKey { detail: String },

    /// `caveats` could not be decoded.
    #[error("failed to decode caveats")]
    MalformedRestrictions { detail: String },

    /// The default caveat could not be synthesized.
    #[error("failed to construct caveats for blessing")]
    RestrictionConstructionFailed { detail: String },

    /// The identity provider did not accept the access token.
    #[error("failed to process access token")]
    TokenVerificationFailed { detail: String },

    /// The principal refused or failed to sign.
    #[error("failed to bless")]
    DelegationFailed { detail: String },

    /// `output_format` names no supported format.
    #[error(
        "unrecognized output format [{format}] in request. Allowed formats are [{}, {}]",
        BASE64_VOM_FORMAT,
        JSON_FORMAT
    )]
    UnsupportedFormat { format: String },

    /// The blessing could not be serialized.
    #[error("failed to encode blessings in format {format}")]
    EncodingFailed { format: String, detail: String },
}

/// Machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedKey,
    MalformedRestrictions,
    RestrictionConstructionFailed,
    TokenVerificationFailed,
    DelegationFailed,
    UnsupportedFormat,
    EncodingFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedKey => "MALFORMED_KEY",
            ErrorKind::MalformedRestrictions => "MALFORMED_RESTRICTIONS",
            ErrorKind::RestrictionConstructionFailed => "RESTRICTION_CONSTRUCTION_FAILED",
            ErrorKind::TokenVerificationFailed => "TOKEN_VERIFICATION_FAILED",
            ErrorKind::DelegationFailed => "DELEGATION_FAILED",
            ErrorKind::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorKind::EncodingFailed => "ENCODING_FAILED",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ExchangeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExchangeError::MalformedKey { .. } => ErrorKind::MalformedKey,
            ExchangeError::MalformedRestrictions { .. } => ErrorKind::MalformedRestrictions,
            ExchangeError::RestrictionConstructionFailed { .. } => {
                ErrorKind::RestrictionConstructionFailed
            }
            ExchangeError::TokenVerificationFailed { .. } => ErrorKind::TokenVerificationFailed,
            ExchangeError::DelegationFailed { .. } => ErrorKind::DelegationFailed,
            ExchangeError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ExchangeError::EncodingFailed { .. } => ErrorKind::EncodingFailed,
        }
    }

    /// Internal detail for logs. Never send this to the caller.
    pub fn detail(&self) -> &str {
        match self {
            ExchangeError::MalformedKey { detail }
            | ExchangeError::MalformedRestrictions { detail }
            | ExchangeError::RestrictionConstructionFailed { detail }
            | ExchangeError::TokenVerificationFailed { detail }
            | ExchangeError::DelegationFailed { detail }
            | ExchangeError::EncodingFailed { detail, .. } => detail,
            ExchangeError::UnsupportedFormat { format } => format,
        }
    }
}
