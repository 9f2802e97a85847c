//! Connected-component partitioning of broad-phase overlap pairs into islands.
//!
//! An island is the transitive closure of "may interact this tick" over the
//! overlap graph. Partitioning only considers ids present in the `ids`
//! iterator (active, non-static bodies); static bodies are attached to the
//! dispatched island by the caller, not by the partitioner, since a static
//! body may legitimately belong to more than one island.

use core::cmp::Ordering;
use std::collections::BTreeMap;

struct UnionFind {
    parent: BTreeMap<usize, usize>,
    rank: BTreeMap<usize, u8>,
}

impl UnionFind {
    fn new(ids: impl IntoIterator<Item = usize>) -> Self {
        let mut parent = BTreeMap::new();
        let mut rank = BTreeMap::new();
        for id in ids {
            parent.insert(id, id);
            rank.insert(id, 0);
        }
        Self { parent, rank }
    }

    fn find(&mut self, x: usize) -> usize {
        let parent = *self.parent.get(&x).unwrap_or(&x);
        if parent == x {
            return x;
        }
        let root = self.find(parent);
        self.parent.insert(x, root);
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        let rank_a = *self.rank.get(&root_a).unwrap_or(&0);
        let rank_b = *self.rank.get(&root_b).unwrap_or(&0);
        match rank_a.cmp(&rank_b) {
            Ordering::Less => {
                self.parent.insert(root_a, root_b);
            }
            Ordering::Greater => {
                self.parent.insert(root_b, root_a);
            }
            Ordering::Equal => {
                self.parent.insert(root_b, root_a);
                self.rank.insert(root_a, rank_a + 1);
            }
        }
    }
}

/// Partitions `ids` into connected components under `pairs`.
///
/// Pairs referencing an id outside `ids` are ignored (the partitioner never
/// introduces an id it wasn't told about — static-only pairs are filtered
/// out by the caller before this point). Each returned island is sorted
/// ascending, and islands are sorted by their smallest member, so the result
/// does not depend on the order `pairs` was supplied in.
#[must_use]
pub fn partition_islands(ids: impl IntoIterator<Item = usize>, pairs: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let ids: Vec<usize> = ids.into_iter().collect();
    let mut uf = UnionFind::new(ids.iter().copied());
    for &(a, b) in pairs {
        if uf.parent.contains_key(&a) && uf.parent.contains_key(&b) {
            uf.union(a, b);
        }
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for &id in &ids {
        let root = uf.find(id);
        groups.entry(root).or_default().push(id);
    }

    let mut islands: Vec<Vec<usize>> = groups.into_values().collect();
    for island in &mut islands {
        island.sort_unstable();
    }
    islands.sort_by_key(|island| island[0]);
    islands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_bodies_form_their_own_island() {
        let islands = partition_islands([0, 1, 2], &[]);
        assert_eq!(islands, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn overlapping_pairs_merge_into_one_island() {
        let islands = partition_islands([0, 1, 2, 3], &[(0, 1), (2, 3)]);
        assert_eq!(islands, vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn transitive_overlap_chains_merge_all_members() {
        let islands = partition_islands([0, 1, 2, 3], &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(islands, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn pair_order_does_not_change_the_partition() {
        let forward = partition_islands([0, 1, 2, 3, 4], &[(0, 1), (1, 2), (3, 4)]);
        let shuffled = partition_islands([0, 1, 2, 3, 4], &[(3, 4), (1, 2), (0, 1)]);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn pairs_referencing_unknown_ids_are_ignored() {
        let islands = partition_islands([0, 1], &[(0, 99), (99, 1)]);
        assert_eq!(islands, vec![vec![0], vec![1]]);
    }
}
