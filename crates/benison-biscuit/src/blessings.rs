//! Blessings issued by a principal.

use crate::caveat::{Caveat, Caveats};
use crate::codec::encode_base64url;
use crate::error::CredentialError;
use crate::keys::public_key_to_der;
use biscuit_auth::{Biscuit, PublicKey};
use serde::{Deserialize, Serialize};

/// A blessing: a name delegated to a subject key, restricted by caveats and
/// signed by the issuing principal.
pub struct Blessings {
    token: Biscuit,
    name: String,
    subject: PublicKey,
    issuer: PublicKey,
    caveats: Caveats,
}

impl Blessings {
    pub(crate) fn new(
        token: Biscuit,
        name: String,
        subject: PublicKey,
        issuer: PublicKey,
        caveats: Caveats,
    ) -> Self {
        Self {
            token,
            name,
            subject,
            issuer,
            caveats,
        }
    }

    /// Full blessing name, e.g. `root/app/alice@example.com`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key the blessing was granted to.
    pub fn subject(&self) -> &PublicKey {
        &self.subject
    }

    /// Key of the principal that signed the blessing.
    pub fn issuer(&self) -> &PublicKey {
        &self.issuer
    }

    pub fn caveats(&self) -> &Caveats {
        &self.caveats
    }

    pub fn token(&self) -> &Biscuit {
        &self.token
    }

    /// Canonical binary form: the serialized Biscuit.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CredentialError> {
        self.token
            .to_vec()
            .map_err(|e| CredentialError::SerializationError(e.to_string()))
    }

    /// Structural wire form, suitable for JSON.
    pub fn to_wire(&self) -> Result<WireBlessings, CredentialError> {
        let blocks = (0..self.token.block_count())
            .map(|i| {
                self.token
                    .print_block_source(i)
                    .map_err(|e| CredentialError::SerializationError(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let revocation_ids = self
            .token
            .revocation_identifiers()
            .iter()
            .map(hex::encode)
            .collect();

        Ok(WireBlessings {
            name: self.name.clone(),
            public_key: encode_base64url(public_key_to_der(&self.subject)?),
            issuer_key: encode_base64url(public_key_to_der(&self.issuer)?),
            caveats: self.caveats.as_slice().to_vec(),
            blocks,
            revocation_ids,
        })
    }
}

impl std::fmt::Debug for Blessings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blessings")
            .field("name", &self.name)
            .field("subject", &self.subject.to_bytes_hex())
            .field("caveats", &self.caveats)
            .finish()
    }
}

/// Structural representation of a blessing.
///
/// Keys are base64url SubjectPublicKeyInfo DER; block sources are the
/// Datalog of each Biscuit block; revocation ids are hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBlessings {
    pub name: String,
    pub public_key: String,
    pub issuer_key: String,
    pub caveats: Vec<Caveat>,
    pub blocks: Vec<String>,
    pub revocation_ids: Vec<String>,
}
