//! Topology-aware Monte Carlo estimation of the expected ratio between a
//! random polygon's area and the area of its axis-aligned bounding box.
//!
//! The trial count is split statically across CPU-pinned worker threads.
//! Each worker owns its sampler and random source; partial sums are combined
//! only after every worker has been joined.

pub mod affinity;
pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod partition;
pub mod reduce;
pub mod simulation;
pub mod topology;

pub use affinity::{Affinity, Placement, SystemAffinity};
pub use config::{Args, Config};
pub use error::{ConfigError, Error, HarnessError, ReduceError, Result};
pub use harness::Job;
pub use partition::{clamp_thread_count, partition, Partition, ThreadCount};
pub use reduce::{reduce, GlobalEstimate, PartialResult};
pub use simulation::{Sampler, Strategy};
pub use topology::{CoreKey, Topology, TopologyMap};
