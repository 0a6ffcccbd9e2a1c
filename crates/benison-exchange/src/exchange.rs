//! The access-token to blessing exchange.

use crate::counters::IssuanceCounters;
use crate::encoding::{BlessingEncoder, EncodedBlessings, OutputFormat, StandardEncoder};
use crate::error::ExchangeError;
use crate::provider::IdentityProvider;
use crate::registry::ApplicationRegistry;
use crate::request::ExchangeRequest;
use crate::restrictions::RestrictionPolicy;
use benison_biscuit::Principal;
use std::sync::Arc;

/// Runs exchanges against a fixed set of collaborators.
///
/// Cheap to share: everything but the counters is read-only.
pub struct Exchanger {
    principal: Arc<dyn Principal>,
    provider: Arc<dyn IdentityProvider>,
    restrictions: RestrictionPolicy,
    registry: ApplicationRegistry,
    counters: Arc<IssuanceCounters>,
    encoder: Arc<dyn BlessingEncoder>,
}

impl Exchanger {
    pub fn new(
        principal: Arc<dyn Principal>,
        provider: Arc<dyn IdentityProvider>,
        restrictions: RestrictionPolicy,
        registry: ApplicationRegistry,
        counters: Arc<IssuanceCounters>,
    ) -> Self {
        Self {
            principal,
            provider,
            restrictions,
            registry,
            counters,
            encoder: Arc::new(StandardEncoder),
        }
    }

    /// Replace the response encoder.
    pub fn with_encoder(mut self, encoder: Arc<dyn BlessingEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn principal(&self) -> &Arc<dyn Principal> {
        &self.principal
    }

    pub fn counters(&self) -> &Arc<IssuanceCounters> {
        &self.counters
    }

    pub fn registry(&self) -> &ApplicationRegistry {
        &self.registry
    }

    pub fn restrictions(&self) -> &RestrictionPolicy {
        &self.restrictions
    }

    /// Exchange the request's access token for a blessing of its public key.
    ///
    /// Failures are logged with their detail; the returned error's message
    /// names only the failing stage.
    pub async fn exchange(
        &self,
        request: &ExchangeRequest,
    ) -> Result<EncodedBlessings, ExchangeError> {
        let result = self.run(request).await;
        if let Err(err) = &result {
            tracing::info!(
                kind = %err.kind(),
                detail = %err.detail(),
                "Blessing exchange failed: {err}"
            );
        }
        result
    }

    async fn run(&self, request: &ExchangeRequest) -> Result<EncodedBlessings, ExchangeError> {
        let subject = request.decode_public_key()?;
        let extension = self.resolve_extension(&request.token).await?;
        let caveats = self.restrictions.build_caveats(request.caveats(), &subject)?;

        let with = self.principal.default_blessing();
        let blessings = self
            .principal
            .bless(&subject, with, &extension, &caveats)
            .map_err(|e| ExchangeError::DelegationFailed {
                detail: e.to_string(),
            })?;

        let format = OutputFormat::resolve(request.output_format())?;
        let encoded = self.encoder.encode(&blessings, format)?;

        let issued = self.counters.increment(with);
        tracing::debug!(
            blessing = %blessings.name(),
            caveats = caveats.len(),
            format = format.as_str(),
            issued,
            "Issued blessing"
        );

        Ok(encoded)
    }

    /// Verify `token` and derive the blessing extension for its identity.
    pub async fn resolve_extension(&self, token: &str) -> Result<String, ExchangeError> {
        let identity = self.provider.verify(token).await.map_err(|e| {
            ExchangeError::TokenVerificationFailed {
                detail: e.to_string(),
            }
        })?;
        Ok(self.registry.resolve_extension(&identity))
    }
}

impl std::fmt::Debug for Exchanger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exchanger")
            .field("blessing", &self.principal.default_blessing())
            .field("restrictions", &self.restrictions)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
