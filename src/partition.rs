//! Static work partitioning and worker placement.

use crate::topology::TopologyMap;

/// The requested thread count and what the harness will actually run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadCount {
    pub requested: i64,
    pub effective: usize,
}

impl ThreadCount {
    pub fn adjusted(&self) -> bool {
        i64::try_from(self.effective).map_or(true, |effective| effective != self.requested)
    }
}

/// `max(1, min(requested, available_cores - 1))`: one physical core stays
/// with the OS and the main thread.
pub fn clamp_thread_count(requested: i64, available_cores: usize) -> ThreadCount {
    let ceiling = i64::try_from(available_cores.saturating_sub(1)).unwrap_or(i64::MAX);
    let effective = requested.min(ceiling).max(1) as usize;
    ThreadCount {
        requested,
        effective,
    }
}

/// Splits `total` into `threads` shares. The remainder of the integer
/// division goes entirely to the first share, so the shares always sum to
/// `total`.
pub fn partition(total: u64, threads: usize) -> Vec<u64> {
    let threads = threads.max(1);
    let base = total / threads as u64;
    let remainder = total - base * threads as u64;

    let mut shares = vec![base; threads];
    shares[0] += remainder;
    shares
}

/// One worker's slice of the run. Built before any thread starts and handed
/// to its worker by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub ordinal: usize,
    pub trial_count: u64,
    pub cpu: Option<usize>,
}

/// Logical CPU for each worker: the first hardware thread of physical core
/// `ordinal + 1` in key order. Physical core 0 is left to the OS and the
/// main thread, which stays unpinned so that threads it spawns do not
/// inherit a single-CPU mask. Workers beyond the known cores get no CPU.
pub fn worker_cpus(map: &TopologyMap, threads: usize) -> Vec<Option<usize>> {
    let mut cores = map.values().skip(1).map(|cpus| cpus.first().copied());
    (0..threads).map(|_| cores.next().flatten()).collect()
}

pub fn plan(total: u64, threads: usize, map: &TopologyMap) -> Vec<Partition> {
    partition(total, threads)
        .into_iter()
        .zip(worker_cpus(map, threads.max(1)))
        .enumerate()
        .map(|(ordinal, (trial_count, cpu))| Partition {
            ordinal,
            trial_count,
            cpu,
        })
        .collect()
}

/// `(base share, remainder)` of a plan: every worker runs the base share and
/// the first also runs the remainder.
pub fn shares(partitions: &[Partition]) -> (u64, u64) {
    match (partitions.first(), partitions.last()) {
        (Some(first), Some(last)) => (last.trial_count, first.trial_count - last.trial_count),
        _ => (0, 0),
    }
}
