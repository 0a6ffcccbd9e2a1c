//! Default caveat policy.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which caveat is attached when the caller supplies none.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionMode {
    /// Blessings expire after `blessing_duration`.
    #[default]
    Expiry,
    /// Blessings carry a third-party revocation caveat.
    Revocation,
}

/// Restriction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestrictionsConfig {
    #[serde(default)]
    pub mode: RestrictionMode,

    /// Lifetime of blessings in expiry mode (e.g., "24h", "30m").
    #[serde(default = "default_blessing_duration")]
    pub blessing_duration: String,

    /// Object name of the discharger service. Required in revocation mode.
    #[serde(default)]
    pub discharger_location: Option<String>,
}

impl Default for RestrictionsConfig {
    fn default() -> Self {
        Self {
            mode: RestrictionMode::default(),
            blessing_duration: default_blessing_duration(),
            discharger_location: None,
        }
    }
}

impl RestrictionsConfig {
    /// Parse `blessing_duration`.
    pub fn blessing_duration(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(self.blessing_duration.trim()).map_err(|e| {
            ConfigError::InvalidDuration {
                value: self.blessing_duration.clone(),
                reason: e.to_string(),
            }
        })
    }
}

fn default_blessing_duration() -> String {
    "24h".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_duration() {
        let config = RestrictionsConfig::default();
        assert_eq!(
            config.blessing_duration().unwrap(),
            Duration::from_secs(24 * 60 * 60)
        );
    }

    #[test]
    fn test_invalid_duration() {
        let config = RestrictionsConfig {
            blessing_duration: "soon".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.blessing_duration(),
            Err(ConfigError::InvalidDuration { .. })
        ));
    }
}
