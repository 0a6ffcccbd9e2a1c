//! The signing principal.

use crate::blessings::Blessings;
use crate::caveat::Caveats;
use crate::error::CredentialError;
use crate::keys::KeyPair;
use biscuit_auth::macros::fact;
use biscuit_auth::{Biscuit, PublicKey};
use chrono::Utc;

/// Separator between the components of a blessing name.
pub const CHAIN_SEPARATOR: &str = "/";

/// A principal that can bless other keys with extensions of its own name.
pub trait Principal: Send + Sync {
    /// Key blessings are signed with.
    fn public_key(&self) -> PublicKey;

    /// Name of the blessing this principal presents by default.
    fn default_blessing(&self) -> &str;

    /// Bless `subject` with `with + "/" + extension`, restricted by `caveats`.
    fn bless(
        &self,
        subject: &PublicKey,
        with: &str,
        extension: &str,
        caveats: &Caveats,
    ) -> Result<Blessings, CredentialError>;
}

/// A principal that issues blessings as Biscuit tokens.
pub struct BiscuitPrincipal {
    keypair: KeyPair,
    blessing_name: String,
}

impl BiscuitPrincipal {
    pub fn new(keypair: KeyPair, blessing_name: impl Into<String>) -> Result<Self, CredentialError> {
        let blessing_name = blessing_name.into();
        validate_name(&blessing_name)?;
        Ok(Self {
            keypair,
            blessing_name,
        })
    }
}

impl Principal for BiscuitPrincipal {
    fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    fn default_blessing(&self) -> &str {
        &self.blessing_name
    }

    fn bless(
        &self,
        subject: &PublicKey,
        with: &str,
        extension: &str,
        caveats: &Caveats,
    ) -> Result<Blessings, CredentialError> {
        if with != self.blessing_name {
            return Err(CredentialError::NotBlessedWith {
                with: with.to_string(),
            });
        }
        validate_name(extension)?;

        let name = format!("{with}{CHAIN_SEPARATOR}{extension}");
        let subject_id = subject.print();
        let now = Utc::now().timestamp();

        let mut builder = Biscuit::builder()
            .fact(fact!("blessing({name})", name = name.clone()))
            .map_err(|e| CredentialError::SigningFailed(e.to_string()))?
            .fact(fact!("subject({subject})", subject = subject_id))
            .map_err(|e| CredentialError::SigningFailed(e.to_string()))?
            .fact(fact!("issued_at({timestamp})", timestamp = now))
            .map_err(|e| CredentialError::SigningFailed(e.to_string()))?;

        for caveat in caveats {
            builder = builder
                .check(caveat.to_check()?)
                .map_err(|e| CredentialError::SigningFailed(e.to_string()))?;
        }

        let token = builder
            .build(self.keypair.inner())
            .map_err(|e| CredentialError::SigningFailed(e.to_string()))?;

        tracing::debug!(blessing = %name, caveats = caveats.len(), "Signed blessing");

        Ok(Blessings::new(
            token,
            name,
            subject.clone(),
            self.keypair.public_key(),
            caveats.clone(),
        ))
    }
}

/// Blessing names are `/`-separated, non-empty components without
/// whitespace or control characters.
fn validate_name(name: &str) -> Result<(), CredentialError> {
    let well_formed = !name.is_empty()
        && name.split(CHAIN_SEPARATOR).all(|c| !c.is_empty())
        && !name.chars().any(|c| c.is_whitespace() || c.is_control());
    if well_formed {
        Ok(())
    } else {
        Err(CredentialError::InvalidBlessingName(name.to_string()))
    }
}
