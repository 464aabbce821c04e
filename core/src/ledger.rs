//! Insertion-ordered keyed storage for a single aggregation pass.
//!
//! Lookups go through a hash index; iteration follows first-insertion order,
//! which is what makes layout and export ordering deterministic.

use crate::types::AccountId;
use std::{borrow::Borrow, collections::HashMap, hash::Hash};

#[derive(Debug, Clone)]
pub struct Ledger<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<V>,
}

impl<K: Eq + Hash, V> Ledger<K, V> {
    pub fn new() -> Self {
        Self { index: HashMap::new(), entries: Vec::new() }
    }

    /// Fetch the entry for `key`, creating it with `create` on first sight.
    pub fn get_or_insert_with<Q>(&mut self, key: &Q, create: impl FnOnce() -> V) -> &mut V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        let existing = self.index.get(key).copied();
        let slot = match existing {
            Some(slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push(create());
                self.index.insert(key.to_owned(), slot);
                slot
            }
        };
        &mut self.entries[slot]
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&slot| &self.entries[slot])
    }

    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_values(self) -> Vec<V> {
        self.entries
    }
}

impl<K: Eq + Hash, V> Default for Ledger<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Directed edge key. `(A, B)` and `(B, A)` are different edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub source: AccountId,
    pub target: AccountId,
}

impl EdgeKey {
    pub fn new(source: &str, target: &str) -> Self {
        Self { source: source.to_string(), target: target.to_string() }
    }
}
