//! Sampling strategies for the polygon/bounding-box area ratio.
//!
//! Every strategy draws vertex coordinates uniformly from `[1, 2)` and sums
//! one ratio per trial. They differ only in how they lay out and reuse
//! coordinates. A strategy is picked once by name; its sampler then runs a
//! whole partition without further dispatch.

mod batched;
mod columnar;
pub mod geometry;
mod points;
mod triangle;
mod window;

use std::fmt;
use std::str::FromStr;

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;

use crate::affinity::Placement;
use crate::error::ConfigError;

pub use geometry::{area_ratio, polygon_area, BoundingBox, Point};

pub const COORD_MIN: f64 = 1.0;
pub const COORD_MAX: f64 = 2.0;

/// Largest polygon any strategy accepts. Keeps per-worker buffers, which
/// grow with the point count, to a few megabytes.
pub const MAX_NGON: usize = 1 << 16;

/// A batch of trials owned by one worker.
pub trait Sampler {
    /// Runs every trial the sampler was built with.
    fn run(&mut self);

    fn sum_of_ratios(&self) -> f64;

    /// Equals the constructed trial count once `run` returns.
    fn completed_trials(&self) -> u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// A fresh point list per trial.
    #[default]
    Points,
    /// `Points`, logging where it was constructed.
    Traced,
    /// All coordinates of a batch generated up front.
    Batched,
    /// One column per vertex, whole-column min/max and area passes.
    Columnar,
    /// Triangles only; a six-coordinate window shifted by one draw per trial.
    Triangle,
    /// Any polygon; a ring of coordinates shifted by one draw per trial.
    Window,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Points,
        Strategy::Traced,
        Strategy::Batched,
        Strategy::Columnar,
        Strategy::Triangle,
        Strategy::Window,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Points => "points",
            Strategy::Traced => "traced",
            Strategy::Batched => "batched",
            Strategy::Columnar => "columnar",
            Strategy::Triangle => "triangle",
            Strategy::Window => "window",
        }
    }

    pub fn supports(self, ngon: usize) -> bool {
        match self {
            Strategy::Triangle => ngon == 3,
            _ => (3..=MAX_NGON).contains(&ngon),
        }
    }

    /// Builds the sampler on the calling thread; it owns `rng` from here on.
    /// `ngon` must satisfy [`Strategy::supports`]. `placement` is where the
    /// calling worker runs; only `traced` reports it.
    pub fn build(self, trials: u64, ngon: usize, rng: StdRng, placement: Placement) -> Box<dyn Sampler> {
        let coords = Coords::new(rng);
        match self {
            Strategy::Points => Box::new(points::PointsSampler::new(trials, ngon, coords)),
            Strategy::Traced => Box::new(points::PointsSampler::traced(trials, ngon, coords, placement)),
            Strategy::Batched => Box::new(batched::BatchedSampler::new(trials, ngon, coords)),
            Strategy::Columnar => Box::new(columnar::ColumnarSampler::new(trials, ngon, coords)),
            Strategy::Triangle => Box::new(triangle::TriangleSampler::new(trials, coords)),
            Strategy::Window => Box::new(window::WindowSampler::new(trials, ngon, coords)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| ConfigError::UnknownSimulation(s.to_string()))
    }
}

/// Private coordinate source of one sampler.
pub(crate) struct Coords {
    rng: StdRng,
    dist: Uniform<f64>,
}

impl Coords {
    fn new(rng: StdRng) -> Self {
        Coords {
            rng,
            dist: Uniform::new(COORD_MIN, COORD_MAX),
        }
    }

    #[inline]
    pub(crate) fn draw(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }

    pub(crate) fn fill(&mut self, buf: &mut [f64]) {
        for value in buf {
            *value = self.draw();
        }
    }
}
