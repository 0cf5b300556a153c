use super::batched::batch_trials;
use super::{Coords, Sampler};

/// Vertex `p` of every trial in a batch lives in `xs[p]` / `ys[p]`.
pub struct ColumnarSampler {
    trials: u64,
    ngon: usize,
    batch: usize,
    coords: Coords,
    xs: Vec<Vec<f64>>,
    ys: Vec<Vec<f64>>,
    ratios_sum: f64,
    completed: u64,
}

fn min_accumulate(acc: &mut [f64], column: &[f64]) {
    for (a, &v) in acc.iter_mut().zip(column) {
        *a = a.min(v);
    }
}

fn max_accumulate(acc: &mut [f64], column: &[f64]) {
    for (a, &v) in acc.iter_mut().zip(column) {
        *a = a.max(v);
    }
}

impl ColumnarSampler {
    pub fn new(trials: u64, ngon: usize, coords: Coords) -> Self {
        ColumnarSampler {
            trials,
            ngon,
            batch: batch_trials(ngon),
            coords,
            xs: vec![Vec::new(); ngon],
            ys: vec![Vec::new(); ngon],
            ratios_sum: 0.0,
            completed: 0,
        }
    }

    fn run_batch(&mut self, batch: usize) {
        for column in self.xs.iter_mut().chain(self.ys.iter_mut()) {
            column.resize(batch, 0.0);
            self.coords.fill(column);
        }

        let mut min_x = self.xs[0].clone();
        let mut min_y = self.ys[0].clone();
        let mut max_x = self.xs[0].clone();
        let mut max_y = self.ys[0].clone();
        for p in 1..self.ngon {
            min_accumulate(&mut min_x, &self.xs[p]);
            min_accumulate(&mut min_y, &self.ys[p]);
            max_accumulate(&mut max_x, &self.xs[p]);
            max_accumulate(&mut max_y, &self.ys[p]);
        }

        let box_areas: Vec<f64> = (0..batch)
            .map(|i| (max_x[i] - min_x[i]) * (max_y[i] - min_y[i]))
            .collect();

        let mut twice_areas = vec![0.0; batch];
        for p in 0..self.ngon {
            let next = (p + 1) % self.ngon;
            let (x0, y0) = (&self.xs[p], &self.ys[p]);
            let (x1, y1) = (&self.xs[next], &self.ys[next]);
            for i in 0..batch {
                twice_areas[i] += x0[i] * y1[i] - x1[i] * y0[i];
            }
        }

        self.ratios_sum += twice_areas
            .iter()
            .zip(&box_areas)
            .map(|(twice, bbox)| (twice.abs() / 2.0) / bbox)
            .sum::<f64>();
    }
}

impl Sampler for ColumnarSampler {
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
