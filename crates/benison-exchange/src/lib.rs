//! # benison-exchange
//!
//! Exchanges an identity provider access token for a blessing bound to a
//! caller-supplied public key.
//!
//! ## Pipeline
//!
//! | Stage | Failure |
//! |-------|---------|
//! | Decode `public_key` | `MALFORMED_KEY` |
//! | Verify `token`, resolve extension | `TOKEN_VERIFICATION_FAILED` |
//! | Decode `caveats` or synthesize a default | `MALFORMED_RESTRICTIONS`, `RESTRICTION_CONSTRUCTION_FAILED` |
//! | Bless with the principal's default name | `DELEGATION_FAILED` |
//! | Encode in `output_format` | `UNSUPPORTED_FORMAT`, `ENCODING_FAILED` |
//!
//! Every stage returns on its first failure; the issuance counter of the
//! signer's blessing is bumped only once a response body exists.
//!
//! Counting happens after encoding rather than right after blessing, so a
//! request rejected for its output format or failing to encode is not
//! counted.

pub mod counters;
pub mod encoding;
pub mod error;
pub mod exchange;
pub mod provider;
pub mod registry;
pub mod request;
pub mod restrictions;

pub use counters::IssuanceCounters;
pub use encoding::{BlessingEncoder, EncodedBlessings, OutputFormat, StandardEncoder};
pub use error::{ErrorKind, ExchangeError};
pub use exchange::Exchanger;
pub use provider::{IdentityProvider, ProviderError, StaticProvider, VerifiedIdentity};
pub use registry::{ApplicationEntry, ApplicationRegistry};
pub use request::ExchangeRequest;
pub use restrictions::RestrictionPolicy;
