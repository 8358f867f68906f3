//! Canonical value-path order of a table.
//!
//! Each record lists its value paths in its own traversal order, and records
//! do not always agree. Every pair of paths gets one precedence fact, taken
//! from the first record (in date order) listing both. The facts form a
//! directed graph that is sorted topologically with Kahn's algorithm; ties,
//! and pairs no record relates, fall back to first-appearance order.
//!
//! Facts from different records can contradict each other transitively
//! (a < b, b < c, c < a). Such cycles are broken by releasing the earliest
//! seen path still waiting, and counted so the caller can report them.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexSet;
use ipp_model::ColumnPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathOrder {
    pub paths: Vec<ColumnPath>,
    /// Number of times a cycle had to be broken.
    pub cycles_broken: usize,
}

/// Reconcile per-record path orders, given in record date order.
pub fn canonical_order(local_orders: &[Vec<ColumnPath>]) -> PathOrder {
    let mut seen: IndexSet<&ColumnPath> = IndexSet::new();
    for local in local_orders {
        for path in local {
            seen.insert(path);
        }
    }
    let count = seen.len();

    let mut successors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); count];
    let mut in_degree = vec![0usize; count];
    let mut decided: HashSet<(usize, usize)> = HashSet::new();
    for local in local_orders {
        let indices: Vec<usize> = local
            .iter()
            .filter_map(|path| seen.get_index_of(path))
            .collect();
        for (position, &before) in indices.iter().enumerate() {
            for &after in &indices[position + 1..] {
                if before == after {
                    continue;
                }
                let pair = (before.min(after), before.max(after));
                if decided.insert(pair) && successors[before].insert(after) {
                    in_degree[after] += 1;
                }
            }
        }
    }

    let mut placed = vec![false; count];
    let mut ready: BTreeSet<usize> = (0..count).filter(|&index| in_degree[index] == 0).collect();
    let mut order = Vec::with_capacity(count);
    let mut cycles_broken = 0usize;

    while order.len() < count {
        let next = match ready.pop_first() {
            Some(index) => index,
            None => {
                // Every remaining path waits on another one: release the earliest seen.
                cycles_broken += 1;
                match (0..count).find(|&index| !placed[index]) {
                    Some(index) => index,
                    None => break,
                }
            }
        };
        if placed[next] {
            continue;
        }
        placed[next] = true;
        order.push(next);
        for &after in &successors[next] {
            if placed[after] {
                continue;
            }
            in_degree[after] = in_degree[after].saturating_sub(1);
            if in_degree[after] == 0 {
                ready.insert(after);
            }
        }
    }

    PathOrder {
        paths: order
            .into_iter()
            .filter_map(|index| seen.get_index(index).map(|path| (*path).clone()))
            .collect(),
        cycles_broken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(name: &str) -> ColumnPath {
        ColumnPath::new(vec![name.to_string()])
    }

    fn paths(names: &[&str]) -> Vec<ColumnPath> {
        names.iter().map(|name| path(name)).collect()
    }

    #[test]
    fn single_record_order_is_kept() {
        let order = canonical_order(&[paths(&["c", "a", "b"])]);
        assert_eq!(order.paths, paths(&["c", "a", "b"]));
        assert_eq!(order.cycles_broken, 0);
    }

    #[test]
    fn later_record_inserts_new_path_in_between() {
        let order = canonical_order(&[paths(&["a", "c"]), paths(&["a", "b", "c"])]);
        assert_eq!(order.paths, paths(&["a", "b", "c"]));
    }

    #[test]
    fn first_record_listing_a_pair_decides_it() {
        let order = canonical_order(&[paths(&["a", "b", "c"]), paths(&["c", "a"])]);
        assert_eq!(order.paths, paths(&["a", "b", "c"]));
        assert_eq!(order.cycles_broken, 0);
    }

    #[test]
    fn unrelated_paths_follow_first_appearance() {
        let order = canonical_order(&[paths(&["x"]), paths(&["y"]), paths(&["w"])]);
        assert_eq!(order.paths, paths(&["x", "y", "w"]));
    }

    #[test]
    fn contradicting_records_are_broken_deterministically() {
        let order = canonical_order(&[paths(&["a", "b"]), paths(&["b", "c"]), paths(&["c", "a"])]);
        assert_eq!(order.paths, paths(&["a", "b", "c"]));
        assert_eq!(order.cycles_broken, 1);
    }
}
