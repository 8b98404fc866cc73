//! Categorical color palette with stable assignment
//!
//! The d3 `category20` scheme as a fixed table. Slots are handed
//! out in palette order the first time a key is seen and never reassigned, so
//! a document keeps its color across reloads for the lifetime of the engine.
//! Past 20 distinct keys the palette wraps; collisions are acceptable.

use indexmap::IndexMap;
use std::hash::Hash;

/// The d3 category20 scheme, in assignment order
pub const CATEGORY20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728",
    "#ff9896", "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2",
    "#7f7f7f", "#c7c7c7", "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// First-sight palette slot assignment, keyed by any hashable id
#[derive(Debug, Clone, Default)]
pub struct ColorAssigner<K> {
    slots: IndexMap<K, usize>,
}

impl<K: Eq + Hash + Clone> ColorAssigner<K> {
    pub fn new() -> Self {
        Self {
            slots: IndexMap::new(),
        }
    }

    /// Color for a key, assigning the next palette slot on first sight
    pub fn color_for(&mut self, key: K) -> &'static str {
        let next_slot = self.slots.len();
        let slot = *self.slots.entry(key).or_insert(next_slot);
        CATEGORY20[slot % CATEGORY20.len()]
    }

    /// Color for a key only if one was already assigned
    pub fn peek(&self, key: &K) -> Option<&'static str> {
        self.slots
            .get(key)
            .map(|slot| CATEGORY20[slot % CATEGORY20.len()])
    }

    pub fn assigned_count(&self) -> usize {
        self.slots.len()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_follows_palette_order() {
        let mut colors: ColorAssigner<u32> = ColorAssigner::new();
        assert_eq!(colors.color_for(7), CATEGORY20[0]);
        assert_eq!(colors.color_for(3), CATEGORY20[1]);
        assert_eq!(colors.color_for(12), CATEGORY20[2]);
    }

    #[test]
    fn test_assignment_is_stable_across_repeat_lookups() {
        let mut colors: ColorAssigner<u32> = ColorAssigner::new();
        let first = colors.color_for(7);
        colors.color_for(3);
        colors.color_for(9);
        assert_eq!(colors.color_for(7), first);
    }

    #[test]
    fn test_palette_wraps_past_twenty_keys() {
        let mut colors: ColorAssigner<u32> = ColorAssigner::new();
        for id in 0..20 {
            colors.color_for(id);
        }
        assert_eq!(colors.color_for(20), CATEGORY20[0]);
        assert_eq!(colors.color_for(21), CATEGORY20[1]);
    }

    #[test]
    fn test_peek_does_not_assign() {
        let mut colors: ColorAssigner<u32> = ColorAssigner::new();
        assert_eq!(colors.peek(&5), None);
        colors.color_for(5);
        assert_eq!(colors.peek(&5), Some(CATEGORY20[0]));
        assert_eq!(colors.assigned_count(), 1);
    }

    #[test]
    fn test_all_palette_entries_are_distinct() {
        for (i, a) in CATEGORY20.iter().enumerate() {
            for b in CATEGORY20.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
