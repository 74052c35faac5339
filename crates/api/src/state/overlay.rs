// Path: crates/api/src/state/overlay.rs

//! A copy-on-write state overlay giving a message commit-or-discard semantics.

use crate::state::{StateAccess, StateKVPair, StateScanIter};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::{Fuse, Peekable};
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::Arc;
use zoracle_types::error::StateError;

/// A batch of key-value pairs to be inserted or updated in the state.
pub type StateInserts = Vec<(Vec<u8>, Vec<u8>)>;

/// A batch of keys to be deleted from the state.
pub type StateDeletes = Vec<Vec<u8>>;

/// A complete set of state changes (inserts/updates and deletes).
pub type StateChangeSet = (StateInserts, StateDeletes);

/// The smallest key strictly greater than every key starting with `prefix`.
/// `None` if the prefix is empty or all 0xFF bytes.
fn next_prefix(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut ub = prefix.to_vec();
    while let Some(last) = ub.pop() {
        if last != 0xFF {
            ub.push(last + 1);
            return Some(ub);
        }
    }
    None
}

struct MergingIterator<'a> {
    base: Peekable<Fuse<StateScanIter<'a>>>,
    writes: Peekable<btree_map::Range<'a, Vec<u8>, Option<Vec<u8>>>>,
}

impl<'a> MergingIterator<'a> {
    fn take_write(&mut self) -> Option<Option<StateKVPair>> {
        self.writes.next().map(|(key, value)| {
            value
                .as_ref()
                .map(|v| (Arc::from(key.as_slice()), Arc::from(v.as_slice())))
        })
    }
}

impl<'a> Iterator for MergingIterator<'a> {
    type Item = Result<StateKVPair, StateError>;

    fn next(&mut self) -> Option<Self::Item> {
        use std::cmp::Ordering;
        loop {
            let base_key = match self.base.peek() {
                Some(Err(_)) => return self.base.next(),
                Some(Ok((k, _))) => Some(k.clone()),
                None => None,
            };
            let write_key = self.writes.peek().map(|(k, _)| k.as_slice());

            let order = match (base_key.as_deref(), write_key) {
                (Some(bk), Some(wk)) => bk.cmp(wk),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => return None,
            };

            match order {
                Ordering::Less => return self.base.next(),
                Ordering::Greater => {
                    if let Some(Some(pair)) = self.take_write() {
                        return Some(Ok(pair));
                    }
                }
                Ordering::Equal => {
                    // The overlay shadows the base entry.
                    self.base.next();
                    if let Some(Some(pair)) = self.take_write() {
                        return Some(Ok(pair));
                    }
                }
            }
        }
    }
}

/// An in-memory, copy-on-write overlay for any `StateAccess`.
///
/// Reads check the local write set first and fall through to `base`. Writes
/// never touch `base`; call [`StateOverlay::into_ordered_batch`] and apply the
/// result to commit, or drop the overlay to discard.
#[derive(Clone)]
pub struct StateOverlay<'a> {
    base: &'a dyn StateAccess,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> StateOverlay<'a> {
    /// Creates a new, empty overlay on top of a base state accessor.
    pub fn new(base: &'a dyn StateAccess) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// True if nothing has been written.
    pub fn is_clean(&self) -> bool {
        self.writes.is_empty()
    }

    /// Consumes the overlay and returns its writes in key order.
    pub fn into_ordered_batch(self) -> StateChangeSet {
        let mut inserts = Vec::new();
        let mut deletes = Vec::new();
        for (key, value_opt) in self.writes {
            match value_opt {
                Some(value) => inserts.push((key, value)),
                None => deletes.push(key),
            }
        }
        (inserts, deletes)
    }
}

impl<'a> StateAccess for StateOverlay<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.writes.get(key) {
            Some(value_opt) => Ok(value_opt.clone()),
            None => self.base.get(key),
        }
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        for key in deletes {
            self.delete(key)?;
        }
        for (key, value) in inserts {
            self.insert(key, value)?;
        }
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let base = self.base.prefix_scan(prefix)?.fuse().peekable();
        let start = Included(prefix.to_vec());
        let end = match next_prefix(prefix) {
            Some(ub) => Excluded(ub),
            None => Unbounded,
        };
        let writes = self.writes.range((start, end)).peekable();
        Ok(Box::new(MergingIterator { base, writes }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal sorted-map base for exercising the overlay.
    #[derive(Default)]
    struct MapState(BTreeMap<Vec<u8>, Vec<u8>>);

    impl StateAccess for MapState {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
            Ok(self.0.get(key).cloned())
        }
        fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
            self.0.insert(key.to_vec(), value.to_vec());
            Ok(())
        }
        fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
            self.0.remove(key);
            Ok(())
        }
        fn batch_apply(
            &mut self,
            inserts: &[(Vec<u8>, Vec<u8>)],
            deletes: &[Vec<u8>],
        ) -> Result<(), StateError> {
            for k in deletes {
                self.0.remove(k);
            }
            for (k, v) in inserts {
                self.0.insert(k.clone(), v.clone());
            }
            Ok(())
        }
        fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
            let prefix = prefix.to_vec();
            Ok(Box::new(
                self.0
                    .iter()
                    .filter(move |(k, _)| k.starts_with(&prefix))
                    .map(|(k, v)| Ok((Arc::from(k.as_slice()), Arc::from(v.as_slice())))),
            ))
        }
    }

    fn keys(iter: StateScanIter<'_>) -> Vec<Vec<u8>> {
        iter.map(|r| r.unwrap().0.to_vec()).collect()
    }

    #[test]
    fn scan_merges_in_order_and_hides_deletes() {
        let mut base = MapState::default();
        base.insert(b"p/1", b"a").unwrap();
        base.insert(b"p/3", b"c").unwrap();
        base.insert(b"q/1", b"z").unwrap();

        let mut overlay = StateOverlay::new(&base);
        overlay.insert(b"p/2", b"b").unwrap();
        overlay.delete(b"p/3").unwrap();

        assert_eq!(
            keys(overlay.prefix_scan(b"p/").unwrap()),
            vec![b"p/1".to_vec(), b"p/2".to_vec()]
        );
        assert_eq!(overlay.get(b"p/3").unwrap(), None);
        assert_eq!(base.get(b"p/3").unwrap(), Some(b"c".to_vec()));
    }

    #[test]
    fn dropped_overlay_leaves_base_untouched() {
        let mut base = MapState::default();
        base.insert(b"k", b"v").unwrap();
        {
            let mut overlay = StateOverlay::new(&base);
            overlay.insert(b"k", b"changed").unwrap();
            assert!(!overlay.is_clean());
        }
        assert_eq!(base.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn committed_batch_is_applied() {
        let mut base = MapState::default();
        base.insert(b"gone", b"x").unwrap();
        let batch = {
            let mut overlay = StateOverlay::new(&base);
            overlay.insert(b"new", b"y").unwrap();
            overlay.delete(b"gone").unwrap();
            overlay.into_ordered_batch()
        };
        base.batch_apply(&batch.0, &batch.1).unwrap();
        assert!(base.has(b"new").unwrap());
        assert!(!base.has(b"gone").unwrap());
    }

    #[test]
    fn next_prefix_handles_trailing_ff() {
        assert_eq!(next_prefix(b"a\xff"), Some(b"b".to_vec()));
        assert_eq!(next_prefix(b"\xff\xff"), None);
    }
}
