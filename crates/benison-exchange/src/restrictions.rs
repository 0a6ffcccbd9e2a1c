//! Restriction policy: which caveats a blessing carries.

use crate::error::ExchangeError;
use benison_biscuit::caveat::decode_caveat_list;
use benison_biscuit::codec::decode_base64url;
use benison_biscuit::{Caveat, Caveats, PublicKey, RevocationIssuer};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// How default caveats are synthesized. Chosen once, at startup.
#[derive(Clone)]
pub enum RestrictionPolicy {
    /// Blessings expire `duration` after issuance.
    Expiry { duration: Duration },

    /// Blessings stay valid until revoked through the discharger.
    Revocation {
        issuer: Arc<dyn RevocationIssuer>,
        discharger_location: String,
    },
}

impl RestrictionPolicy {
    pub fn expiry(duration: Duration) -> Self {
        RestrictionPolicy::Expiry { duration }
    }

    pub fn revocation(
        issuer: Arc<dyn RevocationIssuer>,
        discharger_location: impl Into<String>,
    ) -> Self {
        RestrictionPolicy::Revocation {
            issuer,
            discharger_location: discharger_location.into(),
        }
    }

    /// Caveats for a blessing of `subject`.
    ///
    /// A non-empty `requested` blob is decoded and used as is. Otherwise one
    /// default caveat is synthesized from the policy.
    pub fn build_caveats(
        &self,
        requested: Option<&str>,
        subject: &PublicKey,
    ) -> Result<Caveats, ExchangeError> {
        if let Some(blob) = requested.filter(|b| !b.is_empty()) {
            let bytes = decode_base64url(blob).map_err(|e| ExchangeError::MalformedRestrictions {
                detail: format!("base64url decoding failed: {e}"),
            })?;
            let caveats = decode_caveat_list(&bytes).map_err(|e| {
                ExchangeError::MalformedRestrictions {
                    detail: e.to_string(),
                }
            })?;
            if let Some(caveats) = Caveats::from_vec(caveats) {
                return Ok(caveats);
            }
        }

        Ok(Caveats::new(self.default_caveat(subject)?, []))
    }

    fn default_caveat(&self, subject: &PublicKey) -> Result<Caveat, ExchangeError> {
        match self {
            RestrictionPolicy::Expiry { duration } => {
                let not_after = chrono::Duration::from_std(*duration)
                    .ok()
                    .filter(|d| *d > chrono::Duration::zero())
                    .and_then(|d| Utc::now().checked_add_signed(d))
                    .ok_or_else(|| ExchangeError::RestrictionConstructionFailed {
                        detail: format!("cannot expire a blessing after {duration:?}"),
                    })?;
                Ok(Caveat::expiry(not_after))
            }
            RestrictionPolicy::Revocation {
                issuer,
                discharger_location,
            } => issuer
                .new_caveat(subject, discharger_location)
                .map_err(|e| ExchangeError::RestrictionConstructionFailed {
                    detail: e.to_string(),
                }),
        }
    }
}

impl std::fmt::Debug for RestrictionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestrictionPolicy::Expiry { duration } => f
                .debug_struct("Expiry")
                .field("duration", duration)
                .finish(),
            RestrictionPolicy::Revocation {
                discharger_location,
                ..
            } => f
                .debug_struct("Revocation")
                .field("discharger_location", discharger_location)
                .finish_non_exhaustive(),
        }
    }
}
