// Path: crates/state/src/memory/mod.rs
//! A sorted in-memory state backend.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::Arc;
use zoracle_api::state::{StateAccess, StateScanIter};
use zoracle_types::error::StateError;

/// A `StateAccess` backed by a `BTreeMap`.
///
/// Iteration is in ascending key order, which is all the oracle module needs
/// for deterministic ID-ordered scans. `root_hash` gives a digest of the full
/// contents, used to compare replicas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryState {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// SHA-256 over every length-prefixed key and value, in key order.
    pub fn root_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for (k, v) in &self.data {
            hasher.update((k.len() as u64).to_be_bytes());
            hasher.update(k);
            hasher.update((v.len() as u64).to_be_bytes());
            hasher.update(v);
        }
        hasher.finalize().into()
    }
}

fn upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut ub = prefix.to_vec();
    while let Some(last) = ub.pop() {
        if last != 0xFF {
            ub.push(last + 1);
            return Some(ub);
        }
    }
    None
}

impl StateAccess for InMemoryState {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.data.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.data.remove(key);
        Ok(())
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        log::trace!(
            "applying batch: {} inserts, {} deletes",
            inserts.len(),
            deletes.len()
        );
        for key in deletes {
            self.data.remove(key);
        }
        for (key, value) in inserts {
            self.data.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let start = Included(prefix.to_vec());
        let end = match upper_bound(prefix) {
            Some(ub) => Excluded(ub),
            None => Unbounded,
        };
        let iter = self
            .data
            .range::<Vec<u8>, _>((start, end))
            .map(|(k, v)| Ok((Arc::from(k.as_slice()), Arc::from(v.as_slice()))));
        Ok(Box::new(iter))
    }
}
