//! Caveats restricting the validity of a blessing.

use crate::error::CredentialError;
use crate::keys::load_public_key_hex;
use biscuit_auth::builder::Check;
use biscuit_auth::macros::check;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A condition that must hold for a blessing to be valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Caveat {
    /// Valid only before `not_after`.
    Expiry { not_after: DateTime<Utc> },

    /// Valid only for the listed operations.
    Method { methods: Vec<String> },

    /// Valid only while the discharger at `location`, holding
    /// `discharger_key` (hex Ed25519), vouches that `id` is not revoked.
    Revocation {
        id: String,
        discharger_key: String,
        location: String,
    },
}

impl Caveat {
    /// An expiry caveat.
    pub fn expiry(not_after: DateTime<Utc>) -> Self {
        Caveat::Expiry { not_after }
    }

    /// A method caveat.
    pub fn method<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Caveat::Method {
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }

    /// Check structural validity.
    pub fn validate(&self) -> Result<(), CredentialError> {
        match self {
            Caveat::Expiry { .. } => Ok(()),
            Caveat::Method { methods } => {
                if methods.is_empty() {
                    return Err(CredentialError::InvalidCaveat(
                        "method caveat lists no methods".to_string(),
                    ));
                }
                if methods.iter().any(|m| m.is_empty()) {
                    return Err(CredentialError::InvalidCaveat(
                        "method caveat contains an empty method".to_string(),
                    ));
                }
                Ok(())
            }
            Caveat::Revocation {
                id,
                discharger_key,
                location,
            } => {
                if id.is_empty() || location.is_empty() {
                    return Err(CredentialError::InvalidCaveat(
                        "revocation caveat needs an id and a location".to_string(),
                    ));
                }
                load_public_key_hex(discharger_key)
                    .map_err(|e| CredentialError::InvalidCaveat(e.to_string()))?;
                Ok(())
            }
        }
    }

    /// Render the caveat as a Biscuit check.
    pub fn to_check(&self) -> Result<Check, CredentialError> {
        self.validate()?;

        match self {
            Caveat::Expiry { not_after } => Ok(check!(
                "check if time($time), $time < {expires_at}",
                expires_at = not_after.timestamp()
            )),
            Caveat::Method { methods } => {
                let alternatives = (0..methods.len())
                    .map(|i| format!("operation({{m{i}}})"))
                    .collect::<Vec<_>>()
                    .join(" or ");
                let mut check = parse_check(&format!("check if {alternatives}"))?;
                for (i, method) in methods.iter().enumerate() {
                    check
                        .set(&format!("m{i}"), method.clone())
                        .map_err(|e| CredentialError::InvalidCaveat(e.to_string()))?;
                }
                Ok(check)
            }
            Caveat::Revocation {
                id, discharger_key, ..
            } => {
                // Re-encode the parsed key so only canonical hex reaches the parser.
                let key = load_public_key_hex(discharger_key)
                    .map_err(|e| CredentialError::InvalidCaveat(e.to_string()))?;
                let mut check = parse_check(&format!(
                    "check if discharged({{id}}) trusting {}",
                    key.print()
                ))?;
                check
                    .set("id", id.clone())
                    .map_err(|e| CredentialError::InvalidCaveat(e.to_string()))?;
                Ok(check)
            }
        }
    }
}

fn parse_check(source: &str) -> Result<Check, CredentialError> {
    source
        .parse::<Check>()
        .map_err(|e: biscuit_auth::error::Token| CredentialError::InvalidCaveat(e.to_string()))
}

/// A non-empty, ordered list of caveats.
///
/// Blessing always requires at least one caveat; this type makes an empty
/// list unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Caveats(Vec<Caveat>);

impl Caveats {
    pub fn new(first: Caveat, rest: impl IntoIterator<Item = Caveat>) -> Self {
        let mut caveats = vec![first];
        caveats.extend(rest);
        Self(caveats)
    }

    /// Returns `None` for an empty list.
    pub fn from_vec(caveats: Vec<Caveat>) -> Option<Self> {
        if caveats.is_empty() {
            None
        } else {
            Some(Self(caveats))
        }
    }

    pub fn first(&self) -> &Caveat {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Caveat> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Caveat] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Caveats {
    type Item = &'a Caveat;
    type IntoIter = std::slice::Iter<'a, Caveat>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Encode a caveat list with the binary caveat codec.
pub fn encode_caveat_list(caveats: &[Caveat]) -> Result<Vec<u8>, CredentialError> {
    postcard::to_allocvec(caveats).map_err(|e| CredentialError::CaveatCodec(e.to_string()))
}

/// Decode and validate a caveat list.
pub fn decode_caveat_list(bytes: &[u8]) -> Result<Vec<Caveat>, CredentialError> {
    let (caveats, rest): (Vec<Caveat>, _) = postcard::take_from_bytes(bytes)
        .map_err(|e| CredentialError::CaveatCodec(e.to_string()))?;
    if !rest.is_empty() {
        return Err(CredentialError::CaveatCodec(format!(
            "{} trailing bytes after caveat list",
            rest.len()
        )));
    }
    for caveat in &caveats {
        caveat.validate()?;
    }
    Ok(caveats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;
    use chrono::Duration;

    fn revocation(discharger_key: String) -> Caveat {
        Caveat::Revocation {
            id: "rev-1".to_string(),
            discharger_key,
            location: "/discharger".to_string(),
        }
    }

    #[test]
    fn test_caveat_list_codec() {
        let discharger = KeyPair::generate().unwrap();
        let caveats = vec![
            Caveat::expiry(Utc::now() + Duration::hours(1)),
            Caveat::method(["Get", "List"]),
            revocation(discharger.public_key_hex()),
        ];

        let bytes = encode_caveat_list(&caveats).unwrap();
        assert_eq!(decode_caveat_list(&bytes).unwrap(), caveats);
    }

    #[test]
    fn test_decode_empty_list() {
        let bytes = encode_caveat_list(&[]).unwrap();
        assert!(decode_caveat_list(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_caveat_list(&[0x05, 0xff, 0xff]),
            Err(CredentialError::CaveatCodec(_))
        ));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = encode_caveat_list(&[Caveat::method(["Get"])]).unwrap();
        bytes.push(0);
        assert!(matches!(
            decode_caveat_list(&bytes),
            Err(CredentialError::CaveatCodec(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_caveat() {
        let bytes = encode_caveat_list(&[Caveat::Method { methods: vec![] }]).unwrap();
        assert!(matches!(
            decode_caveat_list(&bytes),
            Err(CredentialError::InvalidCaveat(_))
        ));

        let bytes = encode_caveat_list(&[revocation("zz".to_string())]).unwrap();
        assert!(matches!(
            decode_caveat_list(&bytes),
            Err(CredentialError::InvalidCaveat(_))
        ));
    }

    #[test]
    fn test_every_kind_renders_a_check() {
        let discharger = KeyPair::generate().unwrap();
        assert!(Caveat::expiry(Utc::now()).to_check().is_ok());
        assert!(Caveat::method(["Get", "a\") or true"]).to_check().is_ok());
        assert!(revocation(discharger.public_key_hex()).to_check().is_ok());
    }

    #[test]
    fn test_invalid_caveat_has_no_check() {
        assert!(Caveat::method(Vec::<String>::new()).to_check().is_err());
        assert!(revocation("ed25519/00".to_string()).to_check().is_err());
    }

    #[test]
    fn test_caveats_non_empty() {
        assert!(Caveats::from_vec(vec![]).is_none());

        let caveats = Caveats::new(Caveat::method(["Get"]), [Caveat::method(["Put"])]);
        assert_eq!(caveats.len(), 2);
        assert_eq!(caveats.first(), &Caveat::method(["Get"]));
    }
}
