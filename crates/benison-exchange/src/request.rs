//! Inbound exchange requests.

use crate::error::ExchangeError;
use benison_biscuit::PublicKey;
use benison_biscuit::codec::decode_base64url;
use benison_biscuit::keys::public_key_from_der;
use serde::Deserialize;

/// Form field carrying the base64url DER public key.
pub const PUBLIC_KEY_FIELD: &str = "public_key";
/// Form field carrying the access token.
pub const TOKEN_FIELD: &str = "token";
/// Form field carrying the base64url caveat list.
pub const CAVEATS_FIELD: &str = "caveats";
/// Form field selecting the response encoding.
pub const OUTPUT_FORMAT_FIELD: &str = "output_format";

/// One exchange request, as received.
///
/// Missing fields deserialize as empty so that each is rejected by the stage
/// that owns it rather than by the transport.
#[derive(Clone, Default, Deserialize)]
pub struct ExchangeRequest {
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub caveats: Option<String>,
    #[serde(default)]
    pub output_format: Option<String>,
}

impl ExchangeRequest {
    pub fn new(public_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            token: token.into(),
            caveats: None,
            output_format: None,
        }
    }

    pub fn with_caveats(mut self, caveats: impl Into<String>) -> Self {
        self.caveats = Some(caveats.into());
        self
    }

    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    /// Caveat blob, if the caller sent a non-empty one.
    pub fn caveats(&self) -> Option<&str> {
        self.caveats.as_deref().filter(|c| !c.is_empty())
    }

    /// Requested format, if the caller named one.
    pub fn output_format(&self) -> Option<&str> {
        self.output_format.as_deref().filter(|f| !f.is_empty())
    }

    /// Decode the caller's public key: base64url, then key parsing.
    pub fn decode_public_key(&self) -> Result<PublicKey, ExchangeError> {
        let der = decode_base64url(&self.public_key).map_err(|e| ExchangeError::MalformedKey {
            detail: format!("base64url decoding failed: {e}"),
        })?;
        public_key_from_der(&der).map_err(|e| ExchangeError::MalformedKey {
            detail: e.to_string(),
        })
    }
}

impl std::fmt::Debug for ExchangeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRequest")
            .field(PUBLIC_KEY_FIELD, &self.public_key)
            .field(TOKEN_FIELD, &"<redacted>")
            .field(CAVEATS_FIELD, &self.caveats)
            .field(OUTPUT_FORMAT_FIELD, &self.output_format)
            .finish()
    }
}
