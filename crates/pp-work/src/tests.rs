//! Tests for the work providers.

use std::sync::Barrier;
use std::thread;

use pp_core::WorkerId;

use crate::{EqualProvider, OnDemandProvider, WorkProvider};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Drain `provider` for `rounds` rounds on `workers` real threads.
///
/// Each thread resets after it sees exhaustion and then waits on a barrier,
/// mirroring the engine's worker loop.  Returns every token seen, per round.
fn drain_rounds<P: WorkProvider>(provider: &P, workers: usize, rounds: usize) -> Vec<Vec<usize>> {
    let barrier = Barrier::new(workers);
    let per_worker: Vec<Vec<Vec<usize>>> = thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|w| {
                let barrier = &barrier;
                s.spawn(move || {
                    let mut state = provider.new_worker_state(WorkerId(w as u32));
                    let mut seen = Vec::with_capacity(rounds);
                    for _ in 0..rounds {
                        let mut got = Vec::new();
                        while let Some(t) = provider.next_token(&mut state) {
                            got.push(t);
                        }
                        provider.reset_work(&mut state);
                        barrier.wait();
                        seen.push(got);
                    }
                    seen
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    (0..rounds)
        .map(|r| {
            let mut all: Vec<usize> = per_worker.iter().flat_map(|w| w[r].iter().copied()).collect();
            all.sort_unstable();
            all
        })
        .collect()
}

fn expected(work_size: usize) -> Vec<usize> {
    (0..work_size).collect()
}

// ── OnDemandProvider ──────────────────────────────────────────────────────────

#[cfg(test)]
mod on_demand_tests {
    use super::*;
    use crate::WorkError;

    #[test]
    fn rejects_zero_block_size() {
        assert_eq!(OnDemandProvider::new(2, 0, 10).unwrap_err(), WorkError::ZeroBlockSize);
    }

    #[test]
    fn rejects_zero_workers() {
        assert_eq!(OnDemandProvider::new(0, 1, 10).unwrap_err(), WorkError::NoWorkers);
    }

    #[test]
    fn new_state_is_zeroed() {
        let p = OnDemandProvider::new(2, 3, 10).unwrap();
        let s = p.new_worker_state(WorkerId(1));
        assert_eq!((s.next, s.limit), (0, 0));
        assert_eq!(s.worker, WorkerId(1));
    }

    #[test]
    fn single_worker_gets_everything_in_order() {
        let p = OnDemandProvider::new(1, 4, 10).unwrap();
        let mut s = p.new_worker_state(WorkerId(0));
        let got: Vec<usize> = std::iter::from_fn(|| p.next_token(&mut s)).collect();
        assert_eq!(got, expected(10));
    }

    #[test]
    fn empty_work_is_immediately_exhausted() {
        let p = OnDemandProvider::new(3, 5, 0).unwrap();
        let mut s = p.new_worker_state(WorkerId(0));
        assert_eq!(p.next_token(&mut s), None);
    }

    #[test]
    fn blocks_are_contiguous_per_worker() {
        let p = OnDemandProvider::new(2, 3, 10).unwrap();
        let mut a = p.new_worker_state(WorkerId(0));
        let mut b = p.new_worker_state(WorkerId(1));
        assert_eq!(p.next_token(&mut a), Some(0));
        assert_eq!(p.next_token(&mut b), Some(3));
        assert_eq!(p.next_token(&mut a), Some(1));
        assert_eq!(p.next_token(&mut a), Some(2));
        // a's block is used up; the next claim comes after b's block.
        assert_eq!(p.next_token(&mut a), Some(6));
    }

    #[test]
    fn last_block_is_truncated() {
        let p = OnDemandProvider::new(1, 4, 6).unwrap();
        let mut s = p.new_worker_state(WorkerId(0));
        for _ in 0..5 {
            p.next_token(&mut s);
        }
        assert_eq!(s.limit, 6);
        assert_eq!(p.next_token(&mut s), Some(5));
        assert_eq!(p.next_token(&mut s), None);
    }

    /// workSize=10, blockSize=3, two workers draining alternately, twice.
    #[test]
    fn alternating_two_worker_scenario() {
        let p = OnDemandProvider::new(2, 3, 10).unwrap();
        let mut a = p.new_worker_state(WorkerId(0));
        let mut b = p.new_worker_state(WorkerId(1));

        for _round in 0..2 {
            let mut got = Vec::new();
            let (mut a_done, mut b_done) = (false, false);
            while !(a_done && b_done) {
                if !a_done {
                    match p.next_token(&mut a) {
                        Some(t) => got.push(t),
                        None => a_done = true,
                    }
                }
                if !b_done {
                    match p.next_token(&mut b) {
                        Some(t) => got.push(t),
                        None => b_done = true,
                    }
                }
            }
            got.sort_unstable();
            assert_eq!(got, expected(10));

            p.reset_work(&mut a);
            p.reset_work(&mut b);
        }
    }

    #[test]
    fn huge_block_is_handed_out_once() {
        let p = OnDemandProvider::new(2, usize::MAX / 2 + 1, 10).unwrap();
        let mut a = p.new_worker_state(WorkerId(0));
        let mut b = p.new_worker_state(WorkerId(1));

        for _round in 0..2 {
            // a claims the whole round, so b comes back empty and a finishes.
            let mut got = vec![p.next_token(&mut a).unwrap()];
            got.extend(std::iter::from_fn(|| p.next_token(&mut b)));
            got.extend(std::iter::from_fn(|| p.next_token(&mut a)));
            got.sort_unstable();
            assert_eq!(got, expected(10));

            p.reset_work(&mut a);
            p.reset_work(&mut b);
        }
    }

    #[test]
    fn fetching_past_exhaustion_keeps_round_closed() {
        let p = OnDemandProvider::new(1, usize::MAX, 3).unwrap();
        let mut s = p.new_worker_state(WorkerId(0));
        let got: Vec<usize> = std::iter::from_fn(|| p.next_token(&mut s)).collect();
        assert_eq!(got, expected(3));
        for _ in 0..4 {
            assert_eq!(p.next_token(&mut s), None);
        }
    }

    #[test]
    fn reports_its_worker_count() {
        let p = OnDemandProvider::new(3, 4, 20).unwrap();
        assert_eq!(p.num_workers(), 3);
        let boxed: Box<dyn WorkProvider> = Box::new(EqualProvider::new(5, 20).unwrap());
        assert_eq!(boxed.num_workers(), 5);
    }

    #[test]
    fn cursor_not_rearmed_until_all_workers_reset() {
        let p = OnDemandProvider::new(2, 3, 4).unwrap();
        let mut a = p.new_worker_state(WorkerId(0));
        let mut b = p.new_worker_state(WorkerId(1));
        while p.next_token(&mut a).is_some() {}
        while p.next_token(&mut b).is_some() {}

        p.reset_work(&mut a);
        // b has not reset yet, so a must not see fresh work.
        assert_eq!(p.next_token(&mut a), None);

        p.reset_work(&mut b);
        let mut s = p.new_worker_state(WorkerId(0));
        assert_eq!(p.next_token(&mut s), Some(0));
    }

    #[test]
    fn rearm_discards_partial_round() {
        let p = OnDemandProvider::new(3, 2, 5).unwrap();
        let mut a = p.new_worker_state(WorkerId(0));
        p.next_token(&mut a);
        p.next_token(&mut a);
        p.next_token(&mut a);
        p.reset_work(&mut a);
        p.rearm();

        let drained = drain_rounds(&p, 3, 2);
        assert_eq!(drained[0], expected(5));
        assert_eq!(drained[1], expected(5));
    }

    #[test]
    fn concurrent_drain_partitions_work() {
        let p = OnDemandProvider::new(8, 7, 10_000).unwrap();
        let drained = drain_rounds(&p, 8, 1);
        assert_eq!(drained[0], expected(10_000));
    }

    #[test]
    fn many_rounds_stay_partitioned() {
        let p = OnDemandProvider::new(4, 5, 333).unwrap();
        for round in drain_rounds(&p, 4, 50) {
            assert_eq!(round, expected(333));
        }
    }

    #[test]
    fn reset_after_barrier_still_partitions() {
        // Resetting after the barrier lets a fast worker see a stale cursor and
        // skip its share, but no token is lost or duplicated.
        let p = OnDemandProvider::new(3, 2, 50).unwrap();
        let barrier = Barrier::new(3);
        let rounds = 20;
        let per_worker: Vec<Vec<Vec<usize>>> = thread::scope(|s| {
            let handles: Vec<_> = (0..3)
                .map(|w| {
                    let (p, barrier) = (&p, &barrier);
                    s.spawn(move || {
                        let mut state = p.new_worker_state(WorkerId(w));
                        let mut seen = Vec::new();
                        for _ in 0..rounds {
                            let mut got = Vec::new();
                            while let Some(t) = p.next_token(&mut state) {
                                got.push(t);
                            }
                            barrier.wait();
                            p.reset_work(&mut state);
                            seen.push(got);
                        }
                        seen
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for r in 0..rounds {
            let mut all: Vec<usize> = per_worker.iter().flat_map(|w| w[r].iter().copied()).collect();
            all.sort_unstable();
            assert_eq!(all, expected(50), "round {r}");
        }
    }
}

// ── EqualProvider ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod equal_tests {
    use super::*;

    #[test]
    fn ranges_cover_work_without_overlap() {
        let p = EqualProvider::new(3, 10).unwrap();
        assert_eq!(p.range_of(WorkerId(0)), (0, 4));
        assert_eq!(p.range_of(WorkerId(1)), (4, 7));
        assert_eq!(p.range_of(WorkerId(2)), (7, 10));
    }

    #[test]
    fn more_workers_than_items() {
        let p = EqualProvider::new(4, 2).unwrap();
        let drained = drain_rounds(&p, 4, 1);
        assert_eq!(drained[0], expected(2));
        assert_eq!(p.range_of(WorkerId(3)), (2, 2));
    }

    #[test]
    fn reset_reloads_same_range() {
        let p = EqualProvider::new(2, 6).unwrap();
        let mut s = p.new_worker_state(WorkerId(1));
        let first: Vec<usize> = std::iter::from_fn(|| p.next_token(&mut s)).collect();
        p.reset_work(&mut s);
        let second: Vec<usize> = std::iter::from_fn(|| p.next_token(&mut s)).collect();
        assert_eq!(first, vec![3, 4, 5]);
        assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_worker_owns_nothing() {
        let p = EqualProvider::new(2, 6).unwrap();
        let mut s = p.new_worker_state(WorkerId(9));
        assert_eq!(p.next_token(&mut s), None);
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
        fn on_demand_partitions_every_round(
            workers in 1usize..6,
            block in prop_oneof![
                1usize..20,
                300usize..1000,
                Just(usize::MAX / 2 + 1),
                (usize::MAX - 4)..=usize::MAX,
            ],
            work in 0usize..300,
            rounds in 1usize..4,
        ) {
            let p = OnDemandProvider::new(workers, block, work).unwrap();
            for round in drain_rounds(&p, workers, rounds) {
                prop_assert_eq!(round, expected(work));
            }
        }

        #[test]
        fn equal_partitions_every_round(
            workers in 1usize..6,
            work in 0usize..300,
            rounds in 1usize..3,
        ) {
            let p = EqualProvider::new(workers, work).unwrap();
            for round in drain_rounds(&p, workers, rounds) {
                prop_assert_eq!(round, expected(work));
            }
        }
    }
}
