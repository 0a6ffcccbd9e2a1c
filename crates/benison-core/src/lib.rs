//! # benison-core
//!
//! Configuration types shared across the Benison crates.
//!
//! A deployment is described by a single TOML file:
//!
//! | Section | Purpose |
//! |---------|---------|
//! | `[server]` | Listen address |
//! | `[signer]` | Blessing name and private key of the issuing principal |
//! | `[provider]` | How access tokens are verified |
//! | `[restrictions]` | Default caveat policy (expiry or revocation) |
//! | `[apps.<client_id>]` | Registered application extensions |

pub mod config;
pub mod error;

pub use config::{
    BenisonConfig, ProviderConfig, ProviderMode, RegisteredApp, RestrictionMode,
    RestrictionsConfig, ServerConfig, SignerConfig, StaticToken,
};
pub use error::ConfigError;
