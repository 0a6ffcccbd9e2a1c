//! Response encodings for issued blessings.

use crate::error::ExchangeError;
use benison_biscuit::Blessings;
use benison_biscuit::codec::encode_base64url;

/// Structural JSON encoding.
pub const JSON_FORMAT: &str = "json";
/// Base64url of the serialized token.
pub const BASE64_VOM_FORMAT: &str = "base64vom";

/// Output format requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    /// Opaque base64url token, the default.
    #[default]
    Opaque,
}

impl OutputFormat {
    /// Resolve the caller's `output_format`. Absent or empty means the default.
    pub fn resolve(requested: Option<&str>) -> Result<Self, ExchangeError> {
        match requested {
            None | Some("") => Ok(OutputFormat::default()),
            Some(JSON_FORMAT) => Ok(OutputFormat::Json),
            Some(BASE64_VOM_FORMAT) => Ok(OutputFormat::Opaque),
            Some(other) => Err(ExchangeError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => JSON_FORMAT,
            OutputFormat::Opaque => BASE64_VOM_FORMAT,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Opaque => "text/plain",
        }
    }
}

/// An encoded response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlessings {
    pub format: OutputFormat,
    pub body: Vec<u8>,
}

impl EncodedBlessings {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Serializes issued blessings into a response body.
pub trait BlessingEncoder: Send + Sync {
    fn encode(
        &self,
        blessings: &Blessings,
        format: OutputFormat,
    ) -> Result<EncodedBlessings, ExchangeError>;
}

/// The built-in encodings, see [`encode_blessings`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEncoder;

impl BlessingEncoder for StandardEncoder {
    fn encode(
        &self,
        blessings: &Blessings,
        format: OutputFormat,
    ) -> Result<EncodedBlessings, ExchangeError> {
        encode_blessings(blessings, format)
    }
}

/// Encode `blessings` in `format`.
pub fn encode_blessings(
    blessings: &Blessings,
    format: OutputFormat,
) -> Result<EncodedBlessings, ExchangeError> {
    let failed = |detail: String| ExchangeError::EncodingFailed {
        format: format.as_str().to_string(),
        detail,
    };

    let body = match format {
        OutputFormat::Json => {
            let wire = blessings.to_wire().map_err(|e| failed(e.to_string()))?;
            serde_json::to_vec(&wire).map_err(|e| failed(e.to_string()))?
        }
        OutputFormat::Opaque => {
            let bytes = blessings.to_bytes().map_err(|e| failed(e.to_string()))?;
            encode_base64url(bytes).into_bytes()
        }
    };

    Ok(EncodedBlessings { format, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use benison_biscuit::codec::decode_base64url;
    use benison_biscuit::{BiscuitPrincipal, Caveat, Caveats, KeyPair, Principal, WireBlessings};
    use biscuit_auth::Biscuit;

    fn blessings() -> (Blessings, BiscuitPrincipal) {
        let principal = BiscuitPrincipal::new(KeyPair::generate().unwrap(), "root").unwrap();
        let client = KeyPair::generate().unwrap();
        let blessings = principal
            .bless(
                &client.public_key(),
                "root",
                "app/a@x.com",
                &Caveats::new(Caveat::method(["Get"]), []),
            )
            .unwrap();
        (blessings, principal)
    }

    #[test]
    fn test_resolve() {
        assert_eq!(OutputFormat::resolve(None).unwrap(), OutputFormat::Opaque);
        assert_eq!(OutputFormat::resolve(Some("")).unwrap(), OutputFormat::Opaque);
        assert_eq!(OutputFormat::resolve(Some("json")).unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::resolve(Some("base64vom")).unwrap(),
            OutputFormat::Opaque
        );
        assert!(matches!(
            OutputFormat::resolve(Some("JSON")),
            Err(ExchangeError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_opaque_encoding_is_the_token() {
        let (blessings, principal) = blessings();
        let encoded = encode_blessings(&blessings, OutputFormat::Opaque).unwrap();
        assert_eq!(encoded.content_type(), "text/plain");

        let text = String::from_utf8(encoded.body).unwrap();
        let token = Biscuit::from(decode_base64url(&text).unwrap(), principal.public_key()).unwrap();
        assert!(token.print_block_source(0).unwrap().contains("operation(\"Get\")"));
    }

    #[test]
    fn test_json_encoding_is_the_wire_form() {
        let (blessings, _) = blessings();
        let encoded = encode_blessings(&blessings, OutputFormat::Json).unwrap();
        assert_eq!(encoded.content_type(), "application/json");

        let wire: WireBlessings = serde_json::from_slice(&encoded.body).unwrap();
        assert_eq!(wire, blessings.to_wire().unwrap());
        assert_eq!(wire.name, "root/app/a@x.com");
    }
}
