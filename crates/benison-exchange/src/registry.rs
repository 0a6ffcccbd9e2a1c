//! Registered applications and blessing extensions.

use crate::provider::VerifiedIdentity;
use benison_biscuit::CHAIN_SEPARATOR;
use benison_core::RegisteredApp;
use std::collections::HashMap;

/// Placeholder replaced by the verified email in an extension template.
pub const EMAIL_PLACEHOLDER: &str = "{email}";

/// A registered application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationEntry {
    pub client_id: String,
    /// Extension template, e.g. `svc/{email}`.
    pub extension: String,
}

/// Client ID to extension template mapping. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ApplicationRegistry {
    apps: HashMap<String, ApplicationEntry>,
}

impl ApplicationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, client_id: impl Into<String>, extension: impl Into<String>) -> Self {
        let client_id = client_id.into();
        self.apps.insert(
            client_id.clone(),
            ApplicationEntry {
                client_id,
                extension: extension.into(),
            },
        );
        self
    }

    pub fn from_config(apps: &HashMap<String, RegisteredApp>) -> Self {
        apps.iter().fold(Self::new(), |registry, (client_id, app)| {
            registry.register(client_id, &app.extension)
        })
    }

    pub fn get(&self, client_id: &str) -> Option<&ApplicationEntry> {
        self.apps.get(client_id)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Blessing extension for a verified identity.
    ///
    /// Registered clients get their template with every `{email}` replaced.
    /// Anything else is namespaced as `<client_id>/<email>`, so that a
    /// blessing obtained by one application is never mistaken for the user's
    /// own unscoped identity.
    pub fn resolve_extension(&self, identity: &VerifiedIdentity) -> String {
        match self.apps.get(&identity.client_id) {
            Some(entry) => entry.extension.replace(EMAIL_PLACEHOLDER, &identity.email),
            None => [identity.client_id.as_str(), identity.email.as_str()].join(CHAIN_SEPARATOR),
        }
    }
}
