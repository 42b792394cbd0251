//! Tests for pp-grid.

use std::cmp::Ordering;
use std::thread;

use parking_lot::Mutex;

use crate::{insert_ordered, Cell, Grid, GridError, PutAgent, SyncAppend, SyncOrdered};

/// Agent ordered by `key` only; `tag` tells equal-key agents apart.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Tagged {
    key: u32,
    tag: char,
}

impl PartialOrd for Tagged {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tagged {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

fn tagged(key: u32, tag: char) -> Tagged {
    Tagged { key, tag }
}

/// Insert `items` into one shared list from `threads` threads, each taking
/// every `threads`-th element.
fn insert_concurrently<S: PutAgent>(strategy: &S, items: &[u32], threads: usize) -> Vec<u32> {
    let list = Mutex::new(Vec::new());
    thread::scope(|s| {
        for t in 0..threads {
            let list = &list;
            s.spawn(move || {
                for item in items.iter().skip(t).step_by(threads) {
                    strategy.put(list, *item);
                }
            });
        }
    });
    list.into_inner()
}

// ── Ordered insertion ─────────────────────────────────────────────────────────

#[cfg(test)]
mod put_tests {
    use super::*;

    #[test]
    fn insert_into_empty_appends() {
        let mut v = Vec::new();
        insert_ordered(&mut v, 5);
        assert_eq!(v, vec![5]);
    }

    #[test]
    fn insert_keeps_sorted() {
        let mut v = Vec::new();
        for x in [5, 1, 9, 3, 7, 3] {
            insert_ordered(&mut v, x);
        }
        assert_eq!(v, vec![1, 3, 3, 5, 7, 9]);
    }

    #[test]
    fn ties_go_after_existing_equals() {
        let mut v = Vec::new();
        insert_ordered(&mut v, tagged(2, 'x'));
        insert_ordered(&mut v, tagged(1, 'a'));
        insert_ordered(&mut v, tagged(1, 'b'));
        insert_ordered(&mut v, tagged(1, 'c'));
        let tags: Vec<char> = v.iter().map(|t| t.tag).collect();
        assert_eq!(tags, vec!['a', 'b', 'c', 'x']);
    }

    #[test]
    fn concurrent_ordered_is_sorted() {
        let items: Vec<u32> = (0..2_000).map(|i| (i * 7_919) % 1_013).collect();
        let got = insert_concurrently(&SyncOrdered, &items, 8);
        let mut want = items.clone();
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn concurrent_ordered_independent_of_thread_count() {
        let items: Vec<u32> = (0..500).rev().chain(0..500).collect();
        let one = insert_concurrently(&SyncOrdered, &items, 1);
        let many = insert_concurrently(&SyncOrdered, &items, 6);
        assert_eq!(one, many);
    }

    #[test]
    fn append_keeps_every_agent() {
        let items: Vec<u32> = (0..1_000).collect();
        let mut got = insert_concurrently(&SyncAppend, &items, 4);
        assert_eq!(got.len(), 1_000);
        got.sort();
        assert_eq!(got, items);
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cell_tests {
    use super::*;

    #[test]
    fn put_and_take() {
        let cell = Cell::new();
        cell.put(&SyncOrdered, 3);
        cell.put(&SyncOrdered, 1);
        assert_eq!(cell.len(), 2);
        assert_eq!(cell.take_agents(), vec![1, 3]);
        assert!(cell.is_empty());
    }

    #[test]
    fn future_is_invisible_until_commit() {
        let cell = Cell::new();
        cell.put_future(&SyncOrdered, 4);
        assert!(cell.is_empty());
        assert_eq!(cell.future_len(), 1);

        cell.commit_future();
        assert_eq!(cell.snapshot(), vec![4]);
        assert_eq!(cell.future_len(), 0);
    }

    #[test]
    fn commit_merges_in_order() {
        let cell = Cell::new();
        cell.put(&SyncOrdered, tagged(2, 'c'));
        cell.put(&SyncOrdered, tagged(5, 'c'));
        cell.put_future(&SyncOrdered, tagged(5, 'f'));
        cell.put_future(&SyncOrdered, tagged(1, 'f'));
        cell.commit_future();
        let got: Vec<(u32, char)> = cell.snapshot().iter().map(|t| (t.key, t.tag)).collect();
        assert_eq!(got, vec![(1, 'f'), (2, 'c'), (5, 'c'), (5, 'f')]);
    }

    #[test]
    fn appended_arrivals_commit_sorted_into_empty_cell() {
        let cell = Cell::new();
        for (key, tag) in [(9, 'a'), (4, 'b'), (9, 'c'), (1, 'd')] {
            cell.put_future(&SyncAppend, tagged(key, tag));
        }
        cell.commit_future();
        let got: Vec<(u32, char)> = cell.snapshot().iter().map(|t| (t.key, t.tag)).collect();
        assert_eq!(got, vec![(1, 'd'), (4, 'b'), (9, 'a'), (9, 'c')]);
    }

    #[test]
    fn appended_arrivals_commit_sorted_into_occupied_cell() {
        let cell = Cell::new();
        cell.put(&SyncOrdered, tagged(5, 'c'));
        for (key, tag) in [(7, 'a'), (5, 'b'), (2, 'd')] {
            cell.put_future(&SyncAppend, tagged(key, tag));
        }
        cell.commit_future();
        let got: Vec<(u32, char)> = cell.snapshot().iter().map(|t| (t.key, t.tag)).collect();
        assert_eq!(got, vec![(2, 'd'), (5, 'c'), (5, 'b'), (7, 'a')]);
    }

    #[test]
    fn concurrent_arrivals_while_owner_drains() {
        let cell = Cell::new();
        for x in [10, 20, 30] {
            cell.put(&SyncOrdered, x);
        }
        thread::scope(|s| {
            s.spawn(|| assert_eq!(cell.take_agents(), vec![10, 20, 30]));
            for t in 0..4u32 {
                let cell = &cell;
                s.spawn(move || {
                    for i in 0..25 {
                        cell.put_future(&SyncOrdered, 100 + t * 25 + i);
                    }
                });
            }
        });
        cell.commit_future();
        assert_eq!(cell.snapshot(), (100..200).collect::<Vec<_>>());
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid_tests {
    use super::*;

    #[test]
    fn zero_dimension_rejected() {
        assert_eq!(
            Grid::<u32>::new(0, 5).err(),
            Some(GridError::EmptyDimensions { width: 0, height: 5 })
        );
    }

    #[test]
    fn overflow_rejected() {
        assert!(matches!(Grid::<u32>::new(usize::MAX, 2), Err(GridError::TooLarge { .. })));
    }

    #[test]
    fn index_coords_roundtrip() {
        let g = Grid::<u32>::new(4, 3).unwrap();
        assert_eq!(g.len(), 12);
        for i in 0..g.len() {
            let (x, y) = g.coords(i);
            assert_eq!(g.index(x, y), i);
        }
    }

    #[test]
    fn neighbours_wrap_around() {
        let g = Grid::<u32>::new(4, 3).unwrap();
        // (0, 0): north wraps to row 2, west wraps to column 3.
        assert_eq!(g.neighbours(0), [g.index(0, 2), g.index(1, 0), g.index(0, 1), g.index(3, 0)]);
        // Interior cell.
        let c = g.index(1, 1);
        assert_eq!(g.neighbours(c), [g.index(1, 0), g.index(2, 1), g.index(1, 2), g.index(0, 1)]);
    }

    #[test]
    fn census_counts_matching_agents() {
        let g = Grid::new(3, 3).unwrap();
        for i in 0..g.len() {
            for k in 0..i as u32 {
                g.cell(i).put(&SyncOrdered, k);
            }
        }
        assert_eq!(g.total_agents(), 36);
        assert_eq!(g.census(|a| *a == 0), 8);
        assert_eq!(g.census(|a| a % 2 == 1), (0..9).map(|i: usize| i / 2).sum::<usize>());
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn ordered_insert_matches_sort(items in proptest::collection::vec(0u32..50, 0..200)) {
            let mut v = Vec::new();
            for x in &items {
                insert_ordered(&mut v, *x);
            }
            let mut want = items.clone();
            want.sort();
            prop_assert_eq!(v, want);
        }

        #[test]
        fn concurrent_ordered_insert_is_canonical(
            items in proptest::collection::vec(0u32..100, 0..300),
            threads in 1usize..6,
        ) {
            let got = insert_concurrently(&SyncOrdered, &items, threads);
            let mut want = items.clone();
            want.sort();
            prop_assert_eq!(got, want);
        }
    }
}
