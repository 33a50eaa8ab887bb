//! Round-robin work dispatch
//!
//! Every kernel in the workspace is driven through a [`Dispatcher`]. A call
//! describes its work as a number of independent units (samples, pairs or
//! features) and the dispatcher decides whether to run them on the calling
//! thread or fan them out over a short-lived worker pool.
//!
//! # Ownership rule
//!
//! With `n` workers, worker `i` owns every unit `u` with `u % n == i`. Output
//! slots are *dealt* to the owning worker as exclusive borrows before any
//! worker starts, so kernels write without locks and without `unsafe`, and
//! the value written to each slot does not depend on the worker count.
//!
//! # Fallback
//!
//! If the pool cannot be built the lanes are executed one after another on
//! the calling thread. Every unit is still processed exactly once.

use tracing::{debug, warn};

use crate::config::DispatchConfig;

/// Identity of one worker within a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Worker {
    /// Zero-based worker index
    pub index: usize,
    /// Total number of workers in this dispatch
    pub count: usize,
}

impl Worker {
    /// The single worker of a sequential dispatch
    pub const SOLO: Worker = Worker { index: 0, count: 1 };

    /// Whether this worker owns `unit` under round-robin partitioning
    #[inline]
    pub fn owns(&self, unit: usize) -> bool {
        unit % self.count == self.index
    }

    /// Units owned by this worker, ascending
    pub fn units(&self, total: usize) -> impl Iterator<Item = usize> {
        (self.index..total).step_by(self.count.max(1))
    }
}

/// Split items into `workers` lanes, sending each item to `owner(item) % workers`.
///
/// Relative order within a lane follows the input order.
pub fn deal<T, I, F>(items: I, workers: usize, owner: F) -> Vec<Vec<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> usize,
{
    let workers = workers.max(1);
    let mut lanes: Vec<Vec<T>> = (0..workers).map(|_| Vec::new()).collect();
    for item in items {
        let lane = owner(&item) % workers;
        lanes[lane].push(item);
    }
    lanes
}

/// Launches kernels over round-robin partitions of a unit range
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    /// Create a dispatcher from a configuration
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    /// A dispatcher that never spawns workers
    pub fn sequential() -> Self {
        Self::new(DispatchConfig::sequential())
    }

    /// A dispatcher requesting `threads` workers with the default threshold
    pub fn with_threads(threads: usize) -> Self {
        Self::new(DispatchConfig::default().with_threads(threads))
    }

    /// The active configuration
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Worker count for a job of `units` units
    pub fn workers_for(&self, units: usize) -> usize {
        self.config.workers_for(units)
    }

    /// Run `f` once per lane, lane `i` as worker `i` of `lanes.len()`.
    ///
    /// Lanes run concurrently when more than one is given and the `parallel`
    /// feature is enabled. Returns after every lane has finished.
    pub fn run_lanes<L, F>(&self, lanes: Vec<L>, f: F)
    where
        L: Send,
        F: Fn(Worker, L) + Sync,
    {
        let count = lanes.len();
        if count <= 1 {
            for lane in lanes {
                f(Worker::SOLO, lane);
            }
            return;
        }

        #[cfg(feature = "parallel")]
        {
            match rayon::ThreadPoolBuilder::new().num_threads(count).build() {
                Ok(pool) => {
                    debug!("Dispatching {} lanes on a dedicated pool", count);
                    let f = &f;
                    pool.scope(|scope| {
                        for (index, lane) in lanes.into_iter().enumerate() {
                            scope.spawn(move |_| f(Worker { index, count }, lane));
                        }
                    });
                    return;
                }
                Err(e) => {
                    warn!("Failed to create thread pool ({e}); running {count} lanes sequentially");
                }
            }
        }

        for (index, lane) in lanes.into_iter().enumerate() {
            f(Worker { index, count }, lane);
        }
    }

    /// Call `f(unit, slot)` for every slot, partitioning units round-robin.
    pub fn for_each_unit<S, F>(&self, slots: &mut [S], f: F)
    where
        S: Send,
        F: Fn(usize, &mut S) + Sync,
    {
        self.for_each_unit_with(slots, || (), |_, unit, slot| f(unit, slot));
    }

    /// Like [`for_each_unit`](Self::for_each_unit) with a per-worker scratch
    /// value built by `init` once per worker.
    pub fn for_each_unit_with<S, W, I, F>(&self, slots: &mut [S], init: I, f: F)
    where
        S: Send,
        I: Fn() -> W + Sync,
        F: Fn(&mut W, usize, &mut S) + Sync,
    {
        let workers = self.workers_for(slots.len());
        if workers == 1 {
            let mut scratch = init();
            for (unit, slot) in slots.iter_mut().enumerate() {
                f(&mut scratch, unit, slot);
            }
            return;
        }

        debug!("Dealing {} units over {} workers", slots.len(), workers);
        let lanes = deal(slots.iter_mut().enumerate(), workers, |(unit, _)| *unit);
        self.run_lanes(lanes, |_, lane| {
            let mut scratch = init();
            for (unit, slot) in lane {
                f(&mut scratch, unit, slot);
            }
        });
    }

    /// Call `f(unit, chunk)` for each `chunk_len`-sized chunk of `buf`.
    pub fn for_each_chunk<T, F>(&self, buf: &mut [T], chunk_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        if chunk_len == 0 {
            return;
        }
        let mut chunks: Vec<&mut [T]> = buf.chunks_mut(chunk_len).collect();
        self.for_each_unit(&mut chunks, |unit, chunk| f(unit, chunk));
    }

    /// Evaluate `f` for units `0..units` into a fresh vector.
    pub fn map_units<R, F>(&self, units: usize, f: F) -> crate::Result<Vec<R>>
    where
        R: Send + Clone + Default,
        F: Fn(usize) -> R + Sync,
    {
        let mut out = crate::error::try_zeroed(units, "dispatch output")?;
        self.for_each_unit(&mut out, |unit, slot| *slot = f(unit));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_worker_ownership() {
        let w = Worker { index: 1, count: 3 };
        assert!(w.owns(1));
        assert!(w.owns(4));
        assert!(!w.owns(2));
        assert_eq!(w.units(8).collect::<Vec<_>>(), vec![1, 4, 7]);
        assert_eq!(Worker::SOLO.units(3).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_deal_preserves_order() {
        let lanes = deal(0..10usize, 3, |u| *u);
        assert_eq!(lanes[0], vec![0, 3, 6, 9]);
        assert_eq!(lanes[1], vec![1, 4, 7]);
        assert_eq!(lanes[2], vec![2, 5, 8]);
    }

    #[test]
    fn test_sequential_below_threshold() {
        let dispatcher = Dispatcher::with_threads(4);
        let mut slots = vec![0usize; 10];
        dispatcher.for_each_unit(&mut slots, |unit, slot| *slot = unit * 2);
        assert_eq!(slots, (0..10).map(|u| u * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_every_unit_visited_once() {
        for threads in [1, 2, 3, 8] {
            let dispatcher = Dispatcher::with_threads(threads);
            let calls = AtomicUsize::new(0);
            let mut slots = vec![0u32; 1000];
            dispatcher.for_each_unit(&mut slots, |_, slot| {
                calls.fetch_add(1, Ordering::Relaxed);
                *slot += 1;
            });
            assert_eq!(calls.load(Ordering::Relaxed), 1000);
            assert!(slots.iter().all(|&s| s == 1));
        }
    }

    #[test]
    fn test_results_independent_of_threads() {
        let reference = Dispatcher::sequential()
            .map_units(500, |u| (u as f64).sqrt().sin())
            .unwrap();
        for threads in [2, 8] {
            let got = Dispatcher::with_threads(threads)
                .map_units(500, |u| (u as f64).sqrt().sin())
                .unwrap();
            assert_eq!(got, reference);
        }
    }

    #[test]
    fn test_scratch_built_per_worker() {
        let inits = AtomicUsize::new(0);
        let mut slots = vec![0usize; 400];
        Dispatcher::with_threads(4).for_each_unit_with(
            &mut slots,
            || {
                inits.fetch_add(1, Ordering::Relaxed);
                Vec::<usize>::new()
            },
            |scratch, unit, slot| {
                scratch.push(unit);
                *slot = unit;
            },
        );
        let expected = if cfg!(feature = "parallel") { 4 } else { 1 };
        assert_eq!(inits.load(Ordering::Relaxed), expected);
        assert_eq!(slots[399], 399);
    }

    #[test]
    fn test_for_each_chunk() {
        let mut buf = vec![0.0; 12];
        Dispatcher::sequential().for_each_chunk(&mut buf, 4, |unit, chunk| {
            chunk.iter_mut().for_each(|x| *x = unit as f64);
        });
        assert_eq!(&buf[4..8], &[1.0; 4]);
        assert_eq!(buf[11], 2.0);
    }

    #[test]
    fn test_run_lanes_reports_workers() {
        let seen = std::sync::Mutex::new(Vec::new());
        Dispatcher::with_threads(3).run_lanes(vec![10, 20, 30], |worker, lane| {
            seen.lock().unwrap().push((worker.index, worker.count, lane));
        });
        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec![(0, 3, 10), (1, 3, 20), (2, 3, 30)]);
    }
}
