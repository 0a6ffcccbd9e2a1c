//! Issuance counters.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

/// Number of blessings issued per signer name.
///
/// Counters are created on first use and only ever grow.
#[derive(Debug, Default)]
pub struct IssuanceCounters {
    counts: Mutex<HashMap<String, u64>>,
}

impl IssuanceCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the counter for `name`, returning its new value.
    pub fn increment(&self, name: &str) -> u64 {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        let count = counts.entry(name.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    /// Point-in-time copy, ordered by name.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect()
    }
}
