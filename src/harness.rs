//! Parallel execution of one run.
//!
//! One OS thread per partition. A worker pins itself, builds its own sampler
//! and random source, runs its trials and returns a [`PartialResult`] as the
//! thread's result. Workers share no mutable state; joining every handle is
//! the only synchronization, and it is what makes the partial results
//! visible to the reducer.

use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::affinity::{Affinity, Placement};
use crate::error::HarnessError;
use crate::partition::Partition;
use crate::reduce::{reduce, GlobalEstimate, PartialResult};
use crate::simulation::Strategy;

/// What every worker runs; copied into each thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub strategy: Strategy,
    pub ngon: usize,
    pub seed: Option<u64>,
}

impl Job {
    /// Worker `ordinal` seeds with `seed + ordinal`, or from OS entropy.
    pub fn rng_for(&self, ordinal: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(ordinal as u64)),
            None => StdRng::from_entropy(),
        }
    }
}

/// Body of one worker thread.
pub fn run_worker<A: Affinity>(partition: Partition, job: Job, affinity: &A) -> PartialResult {
    if let Some(cpu) = partition.cpu {
        if !affinity.pin_current_thread_to(cpu) {
            warn!(
                worker = partition.ordinal,
                cpu, "failed to pin worker thread, continuing unpinned"
            );
        }
    }

    // Read after pinning so diagnostics see the final placement.
    let placement = Placement::of(affinity);
    debug!(
        worker = partition.ordinal,
        trials = partition.trial_count,
        cpu = ?placement.cpu,
        pinned = placement.pinned,
        "worker running"
    );
    let mut sampler = job.strategy.build(
        partition.trial_count,
        job.ngon,
        job.rng_for(partition.ordinal),
        placement,
    );
    sampler.run();

    PartialResult::new(sampler.sum_of_ratios(), sampler.completed_trials())
}

/// Runs every partition on its own thread and returns the partial results in
/// worker-ordinal order. A worker that panics fails the whole run.
pub fn run<A>(partitions: &[Partition], job: Job, affinity: A) -> Result<Vec<PartialResult>, HarnessError>
where
    A: Affinity + Clone + Send + 'static,
{
    let mut handles = Vec::with_capacity(partitions.len());
    let mut spawn_error = None;

    for &partition in partitions {
        let affinity = affinity.clone();
        let spawned = thread::Builder::new()
            .name(format!("worker-{}", partition.ordinal))
            .spawn(move || run_worker(partition, job, &affinity));
        match spawned {
            Ok(handle) => handles.push((partition.ordinal, handle)),
            Err(source) => {
                spawn_error = Some(HarnessError::Spawn {
                    worker: partition.ordinal,
                    source,
                });
                break;
            }
        }
    }

    let mut results = Vec::with_capacity(handles.len());
    let mut panicked = None;
    for (ordinal, handle) in handles {
        match handle.join() {
            Ok(result) => results.push(result),
            Err(_) => {
                panicked.get_or_insert(ordinal);
            }
        }
    }

    if let Some(err) = spawn_error {
        return Err(err);
    }
    if let Some(ordinal) = panicked {
        return Err(HarnessError::WorkerPanicked(ordinal));
    }
    Ok(results)
}

/// [`run`] followed by the reduction.
pub fn estimate<A>(partitions: &[Partition], job: Job, affinity: A) -> Result<GlobalEstimate, HarnessError>
where
    A: Affinity + Clone + Send + 'static,
{
    let results = run(partitions, job, affinity)?;
    Ok(reduce(&results)?)
}
