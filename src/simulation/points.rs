use tracing::debug;

use super::geometry::{area_ratio, Point};
use super::{Coords, Sampler};
use crate::affinity::Placement;

pub struct PointsSampler {
    trials: u64,
    ngon: usize,
    coords: Coords,
    placement: Option<Placement>,
    points: Vec<Point>,
    ratios_sum: f64,
    completed: u64,
}

impl PointsSampler {
    pub fn new(trials: u64, ngon: usize, coords: Coords) -> Self {
        PointsSampler {
            trials,
            ngon,
            coords,
            placement: None,
            points: Vec::with_capacity(ngon),
            ratios_sum: 0.0,
            completed: 0,
        }
    }

    /// Reports the placement of the worker that builds it.
    pub fn traced(trials: u64, ngon: usize, coords: Coords, placement: Placement) -> Self {
        debug!(
            ngon,
            trials,
            cpu = ?placement.cpu,
            pinned = placement.pinned,
            "sampler initialized"
        );
        PointsSampler {
            placement: Some(placement),
            ..PointsSampler::new(trials, ngon, coords)
        }
    }

    fn run_one(&mut self) {
        self.points.clear();
        for _ in 0..self.ngon {
            let x = self.coords.draw();
            let y = self.coords.draw();
            self.points.push(Point::new(x, y));
        }
        self.ratios_sum += area_ratio(&self.points);
    }
}

impl Sampler for PointsSampler {
    fn run(&mut self) {
        while self.completed < self.trials {
            self.run_one();
            self.completed += 1;
        }
        if let Some(placement) = self.placement {
            debug!(cpu = ?placement.cpu, completed = self.completed, "sampler finished");
        }
    }

    fn sum_of_ratios(&self) -> f64 {
        self.ratios_sum
    }

    fn completed_trials(&self) -> u64 {
        self.completed
    }
}
