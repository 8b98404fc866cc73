//! Keyed enter/update/exit reconciliation
//!
//! The core of the engine: given the previously rendered mark set and a new
//! record collection, compute the minimal create/update/remove partition
//! keyed by a stable identity function. This is the data-join idiom expressed
//! as a pure function, decoupled from any rendering backend: the same
//! machinery drives scatter points, legend rows, time-axis points, and the
//! corpus trend view, each with its own key derivation.
//!
//! Keys must derive only from semantic record fields, never array position,
//! so a mark's identity survives reordering of the backing array between
//! loads and transitions animate the same logical point moving.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

// =============================================================================
// Delta
// =============================================================================

/// Partition of a new record collection against the previous rendered set.
///
/// The three parts are exhaustive and disjoint: every new record lands in
/// exactly one of `enter`/`update`, every previous mark in exactly one of
/// `update`/`exit`.
#[derive(Debug, Clone)]
pub struct Delta<K, R, M> {
    /// Records whose key has no entry in the previous set, in record order
    pub enter: Vec<(K, R)>,
    /// Records whose key matched a previous mark, paired with that mark so
    /// the renderer can animate from the old position to the new one
    pub update: Vec<(K, R, M)>,
    /// Previous marks whose key is absent from the new collection, in
    /// previous insertion order
    pub exit: Vec<(K, M)>,
}

impl<K, R, M> Delta<K, R, M> {
    /// True when nothing is created or removed (reload of an unchanged set)
    pub fn is_noop(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }

    pub fn stats(&self) -> DeltaStats {
        DeltaStats {
            entered: self.enter.len(),
            updated: self.update.len(),
            exited: self.exit.len(),
        }
    }
}

/// Counts of one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// A reconciliation result: the delta plus the keys dropped as duplicates
#[derive(Debug, Clone)]
pub struct Reconciliation<K, R, M> {
    pub delta: Delta<K, R, M>,
    /// Keys of records dropped by keep-first deduplication, in record order
    pub duplicate_keys: Vec<K>,
}

// =============================================================================
// Core Functions
// =============================================================================

/// Keep-first deduplication by key.
///
/// Returns the surviving records (first occurrence of each key, input order
/// preserved) and the keys of the dropped later occurrences.
pub fn dedup_by_key<K, R, F>(records: Vec<R>, key_of: F) -> (Vec<(K, R)>, Vec<K>)
where
    K: Eq + Hash + Clone,
    F: Fn(&R) -> K,
{
    let mut seen: IndexSet<K> = IndexSet::with_capacity(records.len());
    let mut unique = Vec::with_capacity(records.len());
    let mut duplicates = Vec::new();

    for record in records {
        let key = key_of(&record);
        if seen.insert(key.clone()) {
            unique.push((key, record));
        } else {
            duplicates.push(key);
        }
    }

    (unique, duplicates)
}

/// Partition `next` against `previous` by identity key.
///
/// Duplicate keys in `next` are dropped keep-first before partitioning and
/// surfaced on the result. An empty `next` is a pure exit of everything; an
/// empty `previous` is a pure enter.
pub fn reconcile<K, R, M, F>(
    previous: &IndexMap<K, M>,
    next: Vec<R>,
    key_of: F,
) -> Reconciliation<K, R, M>
where
    K: Eq + Hash + Clone,
    M: Clone,
    F: Fn(&R) -> K,
{
    let (unique, duplicate_keys) = dedup_by_key(next, key_of);

    let mut next_keys: IndexSet<K> = IndexSet::with_capacity(unique.len());
    for (key, _) in &unique {
        next_keys.insert(key.clone());
    }

    let mut enter = Vec::new();
    let mut update = Vec::new();
    for (key, record) in unique {
        match previous.get(&key) {
            Some(mark) => update.push((key, record, mark.clone())),
            None => enter.push((key, record)),
        }
    }

    let exit = previous
        .iter()
        .filter(|(key, _)| !next_keys.contains(*key))
        .map(|(key, mark)| (key.clone(), mark.clone()))
        .collect();

    Reconciliation {
        delta: Delta {
            enter,
            update,
            exit,
        },
        duplicate_keys,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Rec {
        id: u32,
        value: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Mark {
        id: u32,
        x: f32,
    }

    fn rec(id: u32, value: f32) -> Rec {
        Rec { id, value }
    }

    fn previous_of(ids: &[u32]) -> IndexMap<u32, Mark> {
        ids.iter()
            .map(|&id| (id, Mark { id, x: id as f32 * 10.0 }))
            .collect()
    }

    fn keys_of<R, M>(pairs: &[(u32, R, M)]) -> Vec<u32> {
        pairs.iter().map(|(k, _, _)| *k).collect()
    }

    // -------------------------------------------------------------------------
    // Pure enter / pure exit
    // -------------------------------------------------------------------------

    #[test]
    fn test_first_load_is_pure_enter() {
        let previous: IndexMap<u32, Mark> = IndexMap::new();
        let next = vec![rec(1, 0.8), rec(2, 0.4)];

        let result = reconcile(&previous, next, |r| r.id);

        assert_eq!(result.delta.enter.len(), 2);
        assert!(result.delta.update.is_empty());
        assert!(result.delta.exit.is_empty());
    }

    #[test]
    fn test_empty_next_is_pure_exit() {
        let previous = previous_of(&[1, 2, 3]);

        let result = reconcile(&previous, Vec::<Rec>::new(), |r| r.id);

        assert!(result.delta.enter.is_empty());
        assert!(result.delta.update.is_empty());
        assert_eq!(result.delta.exit.len(), 3);
    }

    // -------------------------------------------------------------------------
    // Partition properties: exhaustive and disjoint
    // -------------------------------------------------------------------------

    #[test]
    fn test_partitions_are_exhaustive_and_disjoint() {
        let previous = previous_of(&[1, 2, 3]);
        let next = vec![rec(2, 0.5), rec(3, 0.6), rec(4, 0.7)];

        let result = reconcile(&previous, next, |r| r.id);

        // enter ∪ update covers exactly the new collection
        let mut new_keys: Vec<u32> = result.delta.enter.iter().map(|(k, _)| *k).collect();
        new_keys.extend(keys_of(&result.delta.update));
        new_keys.sort_unstable();
        assert_eq!(new_keys, vec![2, 3, 4]);

        // update ∪ exit covers exactly the previous set
        let mut old_keys = keys_of(&result.delta.update);
        old_keys.extend(result.delta.exit.iter().map(|(k, _)| *k));
        old_keys.sort_unstable();
        assert_eq!(old_keys, vec![1, 2, 3]);
    }

    #[test]
    fn test_update_pairs_old_mark_with_new_record() {
        let previous = previous_of(&[2]);
        let next = vec![rec(2, 0.9)];

        let result = reconcile(&previous, next, |r| r.id);

        let (key, record, old_mark) = &result.delta.update[0];
        assert_eq!(*key, 2);
        assert_eq!(record.value, 0.9);
        assert_eq!(old_mark.x, 20.0);
    }

    // -------------------------------------------------------------------------
    // Key stability under permutation
    // -------------------------------------------------------------------------

    #[test]
    fn test_permuting_next_yields_same_partition_by_key() {
        let previous = previous_of(&[1, 2, 3]);
        let forward = vec![rec(2, 0.5), rec(4, 0.7), rec(3, 0.6)];
        let reversed: Vec<Rec> = forward.iter().rev().cloned().collect();

        let a = reconcile(&previous, forward, |r| r.id);
        let b = reconcile(&previous, reversed, |r| r.id);

        let sorted = |mut v: Vec<u32>| {
            v.sort_unstable();
            v
        };
        assert_eq!(
            sorted(a.delta.enter.iter().map(|(k, _)| *k).collect()),
            sorted(b.delta.enter.iter().map(|(k, _)| *k).collect())
        );
        assert_eq!(
            sorted(keys_of(&a.delta.update)),
            sorted(keys_of(&b.delta.update))
        );
        assert_eq!(
            sorted(a.delta.exit.iter().map(|(k, _)| *k).collect()),
            sorted(b.delta.exit.iter().map(|(k, _)| *k).collect())
        );
    }

    // -------------------------------------------------------------------------
    // Idempotence
    // -------------------------------------------------------------------------

    #[test]
    fn test_reconciling_same_set_twice_is_noop() {
        let previous = previous_of(&[1, 2]);
        let next = vec![rec(1, 10.0), rec(2, 20.0)];

        let result = reconcile(&previous, next, |r| r.id);

        assert!(result.delta.is_noop());
        assert_eq!(result.delta.update.len(), 2);
    }

    // -------------------------------------------------------------------------
    // Duplicate keys
    // -------------------------------------------------------------------------

    #[test]
    fn test_duplicate_keys_keep_first_and_report() {
        let previous: IndexMap<u32, Mark> = IndexMap::new();
        let next = vec![rec(1, 0.8), rec(1, 0.2), rec(2, 0.4), rec(1, 0.6)];

        let result = reconcile(&previous, next, |r| r.id);

        assert_eq!(result.duplicate_keys, vec![1, 1]);
        assert_eq!(result.delta.enter.len(), 2);
        // First occurrence of id 1 survives
        assert_eq!(result.delta.enter[0].1.value, 0.8);
    }

    #[test]
    fn test_dedup_by_key_preserves_input_order() {
        let records = vec![rec(5, 0.1), rec(4, 0.2), rec(5, 0.3), rec(6, 0.4)];

        let (unique, duplicates) = dedup_by_key(records, |r| r.id);

        let ids: Vec<u32> = unique.iter().map(|(k, _)| *k).collect();
        assert_eq!(ids, vec![5, 4, 6]);
        assert_eq!(duplicates, vec![5]);
    }

    // -------------------------------------------------------------------------
    // Ordering guarantees
    // -------------------------------------------------------------------------

    #[test]
    fn test_exit_follows_previous_insertion_order() {
        let previous = previous_of(&[7, 3, 9, 5]);
        let next = vec![rec(3, 0.5)];

        let result = reconcile(&previous, next, |r| r.id);

        let exited: Vec<u32> = result.delta.exit.iter().map(|(k, _)| *k).collect();
        assert_eq!(exited, vec![7, 9, 5]);
    }

    #[test]
    fn test_enter_follows_next_order() {
        let previous: IndexMap<u32, Mark> = IndexMap::new();
        let next = vec![rec(9, 0.1), rec(2, 0.2), rec(7, 0.3)];

        let result = reconcile(&previous, next, |r| r.id);

        let entered: Vec<u32> = result.delta.enter.iter().map(|(k, _)| *k).collect();
        assert_eq!(entered, vec![9, 2, 7]);
    }

    // -------------------------------------------------------------------------
    // Stats
    // -------------------------------------------------------------------------

    #[test]
    fn test_delta_stats_counts() {
        let previous = previous_of(&[1, 2]);
        let next = vec![rec(2, 0.5), rec(3, 0.6)];

        let result = reconcile(&previous, next, |r| r.id);

        assert_eq!(
            result.delta.stats(),
            DeltaStats {
                entered: 1,
                updated: 1,
                exited: 1,
            }
        );
    }
}
