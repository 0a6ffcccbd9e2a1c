//! Identity provider verification.

use async_trait::async_trait;
use benison_core::StaticToken;
use std::collections::HashMap;
use thiserror::Error;

/// Identity asserted by a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub email: String,
    /// OAuth client the token was issued to.
    pub client_id: String,
}

/// Errors that can occur while verifying an access token.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider rejected the token (invalid, expired, revoked...).
    #[error("access token rejected: {0}")]
    Rejected(String),

    /// The token is valid but its email address is not verified.
    #[error("email address {0:?} is not verified")]
    UnverifiedEmail(String),

    /// The provider could not be reached.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with something unexpected.
    #[error("malformed identity provider response: {0}")]
    MalformedResponse(String),
}

/// Verifies bearer access tokens.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, ProviderError>;
}

/// A provider backed by a fixed token table.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    tokens: HashMap<String, VerifiedIdentity>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(
        mut self,
        token: impl Into<String>,
        email: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        self.tokens.insert(
            token.into(),
            VerifiedIdentity {
                email: email.into(),
                client_id: client_id.into(),
            },
        );
        self
    }

    pub fn from_config(tokens: &[StaticToken]) -> Self {
        tokens.iter().fold(Self::new(), |provider, t| {
            provider.with_token(&t.token, &t.email, &t.client_id)
        })
    }
}

#[async_trait]
impl IdentityProvider for StaticProvider {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, ProviderError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ProviderError::Rejected("unknown token".to_string()))
    }
}
