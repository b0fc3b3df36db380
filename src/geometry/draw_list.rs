//! Depth-ordered insertion and the per-frame draw list
//!
//! Both the per-object face list and the cross-object draw list are kept in
//! non-decreasing key order by the same rule: a new item goes in front of the
//! first item with a strictly greater key, otherwise at the end. Equal keys
//! therefore keep arrival order.

use serde::{Deserialize, Serialize};

/// Insert `item` keeping `items` sorted by `key`, stable on ties
pub fn insert_by_depth<T>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> f64) {
    let k = key(&item);
    match items.iter().position(|e| k < key(e)) {
        Some(i) => items.insert(i, item),
        None => items.push(item),
    }
}

/// Which entity table a draw entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawRef {
    /// Index into the ship slots
    Ship(usize),
    /// Index into the debris pool
    Debris(usize),
}

impl DrawRef {
    pub fn is_ship(&self) -> bool {
        matches!(self, DrawRef::Ship(_))
    }
}

/// One rendered object in painting order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawEntry {
    pub target: DrawRef,
    /// The object's Z translation
    pub depth: f64,
}

/// Rendered objects for the current frame, farthest first.
///
/// Owned by the simulation and cleared at the start of every step; later
/// entries are nearer the viewpoint and paint over earlier ones.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    entries: Vec<DrawEntry>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn insert(&mut self, target: DrawRef, depth: f64) {
        insert_by_depth(&mut self.entries, DrawEntry { target, depth }, |e| e.depth);
    }

    pub fn entries(&self) -> &[DrawEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_insert_keeps_ties_in_arrival_order() {
        let mut v: Vec<(f64, u32)> = Vec::new();
        for (i, d) in [5.0, 1.0, 5.0, 3.0, 1.0].into_iter().enumerate() {
            insert_by_depth(&mut v, (d, i as u32), |e| e.0);
        }
        assert_eq!(v, vec![(1.0, 1), (1.0, 4), (3.0, 3), (5.0, 0), (5.0, 2)]);
    }

    #[test]
    fn test_draw_list_far_before_near() {
        let mut list = DrawList::new();
        list.insert(DrawRef::Ship(0), -200.0);
        list.insert(DrawRef::Ship(1), -800.0);
        list.insert(DrawRef::Debris(3), -500.0);
        let order: Vec<_> = list.iter().map(|e| e.target).collect();
        assert_eq!(
            order,
            vec![DrawRef::Ship(1), DrawRef::Debris(3), DrawRef::Ship(0)]
        );
        list.clear();
        assert!(list.is_empty());
    }

    proptest! {
        #[test]
        fn prop_insert_sorted_and_stable(depths in prop::collection::vec(-50i32..50, 0..40)) {
            let mut v: Vec<(f64, usize)> = Vec::new();
            for (i, d) in depths.iter().enumerate() {
                insert_by_depth(&mut v, (*d as f64, i), |e| e.0);
            }
            prop_assert_eq!(v.len(), depths.len());
            for pair in v.windows(2) {
                prop_assert!(pair[0].0 <= pair[1].0);
                if pair[0].0 == pair[1].0 {
                    prop_assert!(pair[0].1 < pair[1].1);
                }
            }
        }
    }
}
