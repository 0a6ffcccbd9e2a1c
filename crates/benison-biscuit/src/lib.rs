//! # benison-biscuit
//!
//! Blessings for the Benison identity service, built on Biscuit tokens.
//!
//! This crate provides functionality for:
//! - Generating and loading Ed25519 keypairs for the signing principal
//! - Decoding Ed25519 and P-256 client public keys (raw or SubjectPublicKeyInfo DER)
//! - Caveats (expiry, method, third-party revocation) and their list codec
//! - Blessing a client key with an extension of the principal's name
//! - Issuing revocation caveats
//!
//! ## Blessing Layout
//!
//! A blessing is a single-block Biscuit signed by the principal:
//!
//! | Element | Datalog |
//! |---------|---------|
//! | Name | `blessing("root/app/alice@example.com")` |
//! | Holder | `subject("ed25519/...")` or `subject("secp256r1/...")` |
//! | Issuance | `issued_at(1700000000)` |
//! | Caveats | one `check if ...` per caveat |

pub mod blessings;
pub mod caveat;
pub mod codec;
pub mod error;
pub mod keys;
pub mod principal;
pub mod revocation;

pub use biscuit_auth::PublicKey;
pub use blessings::{Blessings, WireBlessings};
pub use caveat::{Caveat, Caveats};
pub use error::CredentialError;
pub use keys::KeyPair;
pub use principal::{BiscuitPrincipal, CHAIN_SEPARATOR, Principal};
pub use revocation::{RevocationIssuer, RevocationManager, RevocationRecord};
