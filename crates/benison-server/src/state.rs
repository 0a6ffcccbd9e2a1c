//! Application state.

use crate::idp::TokenInfoProvider;
use benison_biscuit::{BiscuitPrincipal, CredentialError, KeyPair, Principal, RevocationManager};
use benison_core::{BenisonConfig, ConfigError, ProviderMode, RestrictionMode};
use benison_exchange::{
    ApplicationRegistry, Exchanger, IdentityProvider, IssuanceCounters, RestrictionPolicy,
    StaticProvider,
};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while wiring the service from its configuration.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("signer error: {0}")]
    Signer(#[from] CredentialError),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    exchanger: Exchanger,
}

impl AppState {
    pub fn new(exchanger: Exchanger) -> Self {
        Self {
            inner: Arc::new(AppStateInner { exchanger }),
        }
    }

    /// Build the service described by `config`.
    ///
    /// Without a configured private key an ephemeral one is generated, so
    /// blessings do not survive a restart.
    pub fn from_config(config: &BenisonConfig) -> Result<Self, StateError> {
        config.validate()?;

        let keypair = match config.signer.resolve_private_key().map_err(ConfigError::from)? {
            Some(hex) => KeyPair::from_private_key_hex(hex.trim())?,
            None => {
                tracing::warn!("No signer private key configured; using an ephemeral key");
                KeyPair::generate()?
            }
        };
        let signer_key = keypair.public_key();
        let principal = BiscuitPrincipal::new(keypair, &config.signer.blessing_name)?;

        let provider: Arc<dyn IdentityProvider> = match config.provider.mode {
            ProviderMode::TokenInfo => {
                Arc::new(TokenInfoProvider::new(&config.provider.tokeninfo_url))
            }
            ProviderMode::Static => Arc::new(StaticProvider::from_config(&config.provider.tokens)),
        };

        let restrictions = match config.restrictions.mode {
            RestrictionMode::Expiry => {
                RestrictionPolicy::expiry(config.restrictions.blessing_duration()?)
            }
            RestrictionMode::Revocation => {
                RestrictionPolicy::revocation(
                    Arc::new(RevocationManager::new(signer_key)),
                    config
                        .restrictions
                        .discharger_location
                        .clone()
                        .unwrap_or_default(),
                )
            }
        };

        let registry = ApplicationRegistry::from_config(&config.apps);

        tracing::info!(
            blessing = %principal.default_blessing(),
            provider = ?config.provider.mode,
            restrictions = ?restrictions,
            apps = registry.len(),
            "Configured blessing exchange"
        );

        let exchanger = Exchanger::new(
            Arc::new(principal),
            provider,
            restrictions,
            registry,
            Arc::new(IssuanceCounters::new()),
        );

        Ok(Self::new(exchanger))
    }

    pub fn exchanger(&self) -> &Exchanger {
        &self.inner.exchanger
    }
}
