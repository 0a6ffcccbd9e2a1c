//! Configuration types for the Benison blessing service.
//!
//! Configuration is loaded from a TOML file, `benison.toml` by default or the
//! path named by the `BENISON_CONFIG` environment variable.

pub mod provider;
pub mod restrictions;
pub mod signer;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use provider::{ProviderConfig, ProviderMode, StaticToken};
pub use restrictions::{RestrictionMode, RestrictionsConfig};
pub use signer::SignerConfig;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "BENISON_CONFIG";

/// Complete Benison configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenisonConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub signer: SignerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub restrictions: RestrictionsConfig,

    /// Registered applications keyed by OAuth client ID.
    #[serde(default)]
    pub apps: HashMap<String, RegisteredApp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8080"
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// A registered application.
///
/// Blessings for tokens issued to this client are named by extending the
/// signer's blessing with `extension`, after replacing every `{email}` with
/// the verified email address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisteredApp {
    pub extension: String,
}

impl BenisonConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load configuration from a file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Load configuration from `BENISON_CONFIG` or `benison.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file(&config_path())
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.signer.blessing_name.trim();
        if name.is_empty() {
            return Err(ConfigError::Invalid(
                "signer.blessing_name must not be empty".to_string(),
            ));
        }
        if name.split('/').any(str::is_empty) {
            return Err(ConfigError::Invalid(format!(
                "signer.blessing_name {name:?} contains an empty component"
            )));
        }

        match self.restrictions.mode {
            RestrictionMode::Expiry => {
                if self.restrictions.blessing_duration()?.is_zero() {
                    return Err(ConfigError::Invalid(
                        "restrictions.blessing_duration must be positive".to_string(),
                    ));
                }
            }
            RestrictionMode::Revocation => {
                let location = self.restrictions.discharger_location.as_deref();
                if location.is_none_or(|l| l.trim().is_empty()) {
                    return Err(ConfigError::Invalid(
                        "restrictions.discharger_location is required in revocation mode"
                            .to_string(),
                    ));
                }
            }
        }

        if self.provider.mode == ProviderMode::Static && self.provider.tokens.is_empty() {
            return Err(ConfigError::Invalid(
                "provider.tokens must not be empty in static mode".to_string(),
            ));
        }

        for (client_id, app) in &self.apps {
            if app.extension.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "apps.{client_id}.extension must not be empty"
                )));
            }
        }

        Ok(())
    }
}

fn config_path() -> PathBuf {
    if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(p);
    }
    PathBuf::from("benison.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    const FULL: &str = r#"
        [server]
        bind = "127.0.0.1:9000"

        [signer]
        blessing_name = "dev.benison.io"
        private_key_env = "BENISON_SIGNER_KEY"

        [provider]
        mode = "static"

        [[provider.tokens]]
        token = "tok-alice"
        email = "alice@example.com"
        client_id = "cli"

        [restrictions]
        mode = "expiry"
        blessing_duration = "2h"

        [apps.cli]
        extension = "cli/{email}"
    "#;

    #[test]
    fn test_defaults() {
        let config = BenisonConfig::default();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.signer.blessing_name, "benison");
        assert_eq!(config.provider.mode, ProviderMode::TokenInfo);
        assert_eq!(config.restrictions.mode, RestrictionMode::Expiry);
        assert!(config.apps.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = BenisonConfig::from_toml_str(FULL).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.signer.blessing_name, "dev.benison.io");
        assert_eq!(config.provider.tokens.len(), 1);
        assert_eq!(config.provider.tokens[0].client_id, "cli");
        assert_eq!(
            config.restrictions.blessing_duration().unwrap(),
            Duration::from_secs(7200)
        );
        assert_eq!(config.apps["cli"].extension, "cli/{email}");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let config = BenisonConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.signer.blessing_name, "dev.benison.io");
    }

    #[test]
    fn test_load_missing_file() {
        let err = BenisonConfig::load_from_file(Path::new("/nonexistent/benison.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_revocation_requires_discharger() {
        let config = BenisonConfig::from_toml_str(
            r#"
            [restrictions]
            mode = "revocation"
            "#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = BenisonConfig::from_toml_str(
            r#"
            [restrictions]
            mode = "revocation"
            discharger_location = "/discharger.benison.io"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_static_provider_requires_tokens() {
        let config = BenisonConfig::from_toml_str(
            r#"
            [provider]
            mode = "static"
            "#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_blessing_name() {
        let mut config = BenisonConfig::default();
        config.signer.blessing_name = "root//child".to_string();
        assert!(config.validate().is_err());

        config.signer.blessing_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_duration() {
        let mut config = BenisonConfig::default();
        config.restrictions.blessing_duration = "0s".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_mode_is_parse_error() {
        let err = BenisonConfig::from_toml_str(
            r#"
            [restrictions]
            mode = "forever"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
