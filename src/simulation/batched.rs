use super::geometry::{polygon_area_xy, BoundingBox};
use super::{Coords, Sampler};

/// Most trials whose coordinates are generated together.
pub const BATCH_TRIALS: usize = 1 << 16;

/// Most coordinates per axis held by one batch.
pub const BATCH_COORDS: usize = 1 << 20;

/// Trials per batch for `ngon`-point polygons. Large polygons get smaller
/// batches so that `batch_trials(ngon) * ngon` stays within
/// `max(BATCH_COORDS, ngon)`.
pub fn batch_trials(ngon: usize) -> usize {
    (BATCH_COORDS / ngon.max(1)).clamp(1, BATCH_TRIALS)
}

pub struct BatchedSampler {
    trials: u64,
    ngon: usize,
    batch: usize,
    coords: Coords,
    xs: Vec<f64>,
    ys: Vec<f64>,
    ratios_sum: f64,
    completed: u64,
}

impl BatchedSampler {
    pub fn new(trials: u64, ngon: usize, coords: Coords) -> Self {
        BatchedSampler {
            trials,
            ngon,
            batch: batch_trials(ngon),
            coords,
            xs: Vec::new(),
            ys: Vec::new(),
            ratios_sum: 0.0,
            completed: 0,
        }
    }

    fn run_batch(&mut self, batch: usize) {
        let len = batch * self.ngon;
        self.xs.resize(len, 0.0);
        self.ys.resize(len, 0.0);
        for (x, y) in self.xs.iter_mut().zip(self.ys.iter_mut()) {
            *x = self.coords.draw();
            *y = self.coords.draw();
        }

        let mut sum = 0.0;
        for (xs, ys) in self.xs.chunks_exact(self.ngon).zip(self.ys.chunks_exact(self.ngon)) {
            let area = polygon_area_xy(xs, ys);
            if let Some(bbox) = BoundingBox::of_xy(xs, ys) {
                sum += area / bbox.area();
            }
        }
        self.ratios_sum += sum;
    }
}

impl Sampler for BatchedSampler {
    fn run(&mut self) {
        while self.completed < self.trials {
            let batch = (self.trials - self.completed).min(self.batch as u64) as usize;
            self.run_batch(batch);
            self.completed += batch as u64;
        }
    }

    fn sum_of_ratios(&self) -> f64 {
        self.ratios_sum
    }

    fn completed_trials(&self) -> u64 {
        self.completed
    }
}
