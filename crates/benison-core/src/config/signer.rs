//! Signing principal configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the principal that signs blessings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Default blessing name of the principal. Every issued blessing is an
    /// extension of this name.
    #[serde(default = "default_blessing_name")]
    pub blessing_name: String,

    /// Environment variable containing the private key (hex-encoded).
    #[serde(default)]
    pub private_key_env: Option<String>,

    /// Path to the private key file.
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            blessing_name: default_blessing_name(),
            private_key_env: None,
            private_key_file: None,
        }
    }
}

impl SignerConfig {
    /// Resolve the private key from environment or file.
    pub fn resolve_private_key(&self) -> Result<Option<String>, std::io::Error> {
        // Try environment variable first
        if let Some(env_var) = &self.private_key_env {
            if let Ok(key) = std::env::var(env_var) {
                return Ok(Some(key.trim().to_string()));
            }
        }

        if let Some(path) = &self.private_key_file {
            if path.exists() {
                let key = std::fs::read_to_string(path)?;
                return Ok(Some(key.trim().to_string()));
            }
        }

        Ok(None)
    }
}

fn default_blessing_name() -> String {
    "benison".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolve_private_key_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "  abcdef  ").unwrap();

        let config = SignerConfig {
            private_key_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(config.resolve_private_key().unwrap(), Some("abcdef".to_string()));
    }

    #[test]
    fn test_resolve_private_key_env_wins() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "from-file").unwrap();

        // SAFETY: We're in a test and controlling the environment
        unsafe {
            std::env::set_var("BENISON_TEST_SIGNER_KEY", "from-env");
        }

        let config = SignerConfig {
            private_key_env: Some("BENISON_TEST_SIGNER_KEY".to_string()),
            private_key_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(config.resolve_private_key().unwrap(), Some("from-env".to_string()));

        // SAFETY: Cleanup in test
        unsafe {
            std::env::remove_var("BENISON_TEST_SIGNER_KEY");
        }
    }

    #[test]
    fn test_resolve_private_key_missing() {
        let config = SignerConfig {
            private_key_file: Some(PathBuf::from("/nonexistent/benison.key")),
            ..Default::default()
        };
        assert_eq!(config.resolve_private_key().unwrap(), None);
    }
}
