//! Identity provider configuration.

use serde::{Deserialize, Serialize};

/// How bearer access tokens are verified.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// Ask a remote OAuth2 token-info endpoint.
    #[default]
    TokenInfo,
    /// Look tokens up in a fixed table (development and tests).
    Static,
}

/// Identity provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub mode: ProviderMode,

    /// Token-info endpoint; the access token is passed as `access_token`.
    #[serde(default = "default_tokeninfo_url")]
    pub tokeninfo_url: String,

    /// Tokens accepted in `static` mode.
    #[serde(default)]
    pub tokens: Vec<StaticToken>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            mode: ProviderMode::default(),
            tokeninfo_url: default_tokeninfo_url(),
            tokens: Vec::new(),
        }
    }
}

/// A token accepted by the static provider and the identity it maps to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaticToken {
    pub token: String,
    pub email: String,
    pub client_id: String,
}

fn default_tokeninfo_url() -> String {
    "https://www.googleapis.com/oauth2/v3/tokeninfo".to_string()
}
