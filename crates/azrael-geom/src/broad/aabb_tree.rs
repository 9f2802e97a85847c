use crate::types::aabb::Aabb;
use core::cmp::Ordering;
use std::collections::BTreeMap;

/// Broad-phase interface for inserting proxies and querying overlapping pairs.
///
/// Implementations must return pairs deterministically: the pair `(a, b)` is
/// canonicalized such that `a < b`, and the full list is sorted ascending by
/// `(a, b)`. Proxy ids are body ids (`usize`), so pair order matches the
/// total order the orchestrator merges islands in.
pub trait BroadPhase {
    /// Inserts or updates the proxy with the given `id` and `aabb`.
    fn upsert(&mut self, id: usize, aabb: Aabb);
    /// Removes a proxy if present.
    fn remove(&mut self, id: usize);
    /// Returns a canonical, deterministically-ordered list of overlapping pairs.
    fn pairs(&self) -> Vec<(usize, usize)>;
}

/// A minimal AABB-based broad-phase using an `O(n^2)` all-pairs sweep.
///
/// Why this exists:
/// - Serves as a correctness and determinism baseline while the worker-pool
///   island dispatch stabilizes (canonical pair identity, inclusive overlap).
/// - Keeps the algorithm small and easy to reason about for tests.
///
/// Performance plan (to be replaced): Sweep-and-Prune over stable per-axis
/// endpoint arrays, preserving the `(min_id, max_id)` canonical ordering.
#[derive(Default)]
pub struct AabbTree {
    items: BTreeMap<usize, Aabb>,
}

impl AabbTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Number of proxies currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when no proxies are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl BroadPhase for AabbTree {
    fn upsert(&mut self, id: usize, aabb: Aabb) {
        self.items.insert(id, aabb);
    }

    fn remove(&mut self, id: usize) {
        self.items.remove(&id);
    }

    fn pairs(&self) -> Vec<(usize, usize)> {
        let items: Vec<(usize, Aabb)> = self.items.iter().map(|(id, aabb)| (*id, *aabb)).collect();
        let mut out: Vec<(usize, usize)> = Vec::new();
        for (i, (a_id, a_bb)) in items.iter().enumerate() {
            for (b_id, b_bb) in items.iter().skip(i + 1) {
                if a_bb.overlaps(b_bb) {
                    out.push((*a_id, *b_id));
                }
            }
        }
        out.sort_unstable_by(|x, y| match x.0.cmp(&y.0) {
            Ordering::Equal => x.1.cmp(&y.1),
            o => o,
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azrael_math::Vec3;

    #[test]
    fn pair_order_is_deterministic_regardless_of_insertion_order() {
        let mut bp = AabbTree::new();
        let a = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, 0.0), 1.0, 1.0, 1.0);
        let b = Aabb::from_center_half_extents(Vec3::new(1.0, 0.0, 0.0), 1.0, 1.0, 1.0);
        let c = Aabb::from_center_half_extents(Vec3::new(100.0, 0.0, 0.0), 1.0, 1.0, 1.0);

        bp.upsert(2, c);
        bp.upsert(1, b);
        bp.upsert(0, a);

        assert_eq!(bp.pairs(), vec![(0, 1)]);

        let d = Aabb::from_center_half_extents(Vec3::new(0.5, 0.0, 0.0), 1.0, 1.0, 1.0);
        bp.upsert(3, d);
        assert_eq!(bp.pairs(), vec![(0, 1), (0, 3), (1, 3)]);
    }

    #[test]
    fn touching_faces_count_as_overlap() {
        let mut bp = AabbTree::new();
        bp.upsert(0, Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, 0.0), 1.0, 1.0, 1.0));
        bp.upsert(1, Aabb::from_center_half_extents(Vec3::new(2.0, 0.0, 0.0), 1.0, 1.0, 1.0));
        assert_eq!(bp.pairs(), vec![(0, 1)]);
    }

    #[test]
    fn remove_drops_proxy_from_future_pairs() {
        let mut bp = AabbTree::new();
        bp.upsert(0, Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, 0.0), 1.0, 1.0, 1.0));
        bp.upsert(1, Aabb::from_center_half_extents(Vec3::new(0.5, 0.0, 0.0), 1.0, 1.0, 1.0));
        assert_eq!(bp.pairs(), vec![(0, 1)]);
        bp.remove(1);
        assert!(bp.pairs().is_empty());
    }
}
