//! Third-party revocation caveats.

use crate::caveat::Caveat;
use crate::error::CredentialError;
use biscuit_auth::PublicKey;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// Issues caveats that a discharger can later refuse to discharge.
pub trait RevocationIssuer: Send + Sync {
    /// Create a revocation caveat for a blessing granted to `subject`,
    /// dischargeable by the service at `discharger_location`.
    fn new_caveat(
        &self,
        subject: &PublicKey,
        discharger_location: &str,
    ) -> Result<Caveat, CredentialError>;
}

/// What the manager remembers about an issued revocation caveat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevocationRecord {
    /// Hex key of the blessed subject.
    pub subject: String,
    pub location: String,
    pub issued_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// In-memory revocation manager.
///
/// Records are never evicted and are lost on restart, so this is an issuer
/// for development and single-process deployments. Revocation is driven
/// in-process through [`RevocationManager::revoke`]; the HTTP service does
/// not expose it.
pub struct RevocationManager {
    discharger_key: PublicKey,
    records: RwLock<HashMap<String, RevocationRecord>>,
}

impl RevocationManager {
    /// Create a manager whose caveats name `discharger_key` as the trusted
    /// third party.
    pub fn new(discharger_key: PublicKey) -> Self {
        Self {
            discharger_key,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Look up an issued caveat.
    pub fn record(&self, id: &str) -> Option<RevocationRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Mark a caveat revoked. Revoking twice keeps the first timestamp.
    pub fn revoke(&self, id: &str) -> Result<(), CredentialError> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let record = records
            .get_mut(id)
            .ok_or_else(|| CredentialError::UnknownRevocation(id.to_string()))?;
        if record.revoked_at.is_none() {
            record.revoked_at = Some(Utc::now());
            tracing::info!(revocation_id = %id, "Revoked blessing");
        }
        Ok(())
    }

    pub fn is_revoked(&self, id: &str) -> bool {
        self.record(id).is_some_and(|r| r.revoked_at.is_some())
    }
}

impl RevocationIssuer for RevocationManager {
    fn new_caveat(
        &self,
        subject: &PublicKey,
        discharger_location: &str,
    ) -> Result<Caveat, CredentialError> {
        if discharger_location.trim().is_empty() {
            return Err(CredentialError::RevocationFailed(
                "no discharger location configured".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let record = RevocationRecord {
            subject: subject.to_bytes_hex(),
            location: discharger_location.to_string(),
            issued_at: Utc::now(),
            revoked_at: None,
        };
        self.records
            .write()
            .map_err(|_| CredentialError::RevocationFailed("revocation state poisoned".to_string()))?
            .insert(id.clone(), record);

        Ok(Caveat::Revocation {
            id,
            discharger_key: self.discharger_key.to_bytes_hex(),
            location: discharger_location.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;

    fn manager() -> (RevocationManager, KeyPair) {
        let discharger = KeyPair::generate().unwrap();
        (RevocationManager::new(discharger.public_key()), discharger)
    }

    #[test]
    fn test_new_caveat_records_subject() {
        let (manager, discharger) = manager();
        let subject = KeyPair::generate().unwrap();

        let caveat = manager
            .new_caveat(&subject.public_key(), "/discharger.benison.io")
            .unwrap();
        let Caveat::Revocation {
            id,
            discharger_key,
            location,
        } = &caveat
        else {
            panic!("expected a revocation caveat, got {caveat:?}");
        };

        assert_eq!(discharger_key, &discharger.public_key_hex());
        assert_eq!(location, "/discharger.benison.io");
        assert!(caveat.validate().is_ok());

        let record = manager.record(id).unwrap();
        assert_eq!(record.subject, subject.public_key_hex());
        assert!(!manager.is_revoked(id));
    }

    #[test]
    fn test_ids_are_unique() {
        let (manager, _) = manager();
        let subject = KeyPair::generate().unwrap();

        let a = manager.new_caveat(&subject.public_key(), "/d").unwrap();
        let b = manager.new_caveat(&subject.public_key(), "/d").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_revoke() {
        let (manager, _) = manager();
        let subject = KeyPair::generate().unwrap();

        let Caveat::Revocation { id, .. } =
            manager.new_caveat(&subject.public_key(), "/d").unwrap()
        else {
            panic!("expected a revocation caveat");
        };

        manager.revoke(&id).unwrap();
        assert!(manager.is_revoked(&id));
        let first = manager.record(&id).unwrap().revoked_at;

        manager.revoke(&id).unwrap();
        assert_eq!(manager.record(&id).unwrap().revoked_at, first);
    }

    #[test]
    fn test_records_outlive_revocation() {
        let (manager, _) = manager();
        let subject = KeyPair::generate().unwrap();

        let ids: Vec<String> = (0..3)
            .map(|_| match manager.new_caveat(&subject.public_key(), "/d").unwrap() {
                Caveat::Revocation { id, .. } => id,
                other => panic!("expected a revocation caveat, got {other:?}"),
            })
            .collect();
        manager.revoke(&ids[0]).unwrap();

        for id in &ids {
            let record = manager.record(id).unwrap();
            assert_eq!(record.location, "/d");
        }
        assert!(manager.is_revoked(&ids[0]));
        assert!(!manager.is_revoked(&ids[1]));
    }

    #[test]
    fn test_revoke_unknown() {
        let (manager, _) = manager();
        assert!(matches!(
            manager.revoke("missing"),
            Err(CredentialError::UnknownRevocation(_))
        ));
    }

    #[test]
    fn test_requires_location() {
        let (manager, _) = manager();
        let subject = KeyPair::generate().unwrap();
        assert!(matches!(
            manager.new_caveat(&subject.public_key(), " "),
            Err(CredentialError::RevocationFailed(_))
        ));
    }
}
