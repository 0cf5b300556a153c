use super::{Coords, Sampler};

/// A ring of `2 * ngon` coordinates read as consecutive (x, y) pairs from a
/// moving offset. Each trial replaces the coordinate at the offset and
/// advances it, so one draw per trial regardless of `ngon`.
pub struct WindowSampler {
    trials: u64,
    ngon: usize,
    coords: Coords,
    ratios_sum: f64,
    completed: u64,
}

impl WindowSampler {
    pub fn new(trials: u64, ngon: usize, coords: Coords) -> Self {
        WindowSampler {
            trials,
            ngon,
            coords,
            ratios_sum: 0.0,
            completed: 0,
        }
    }
}

impl Sampler for WindowSampler {
    fn run(&mut self) {
        let len = self.ngon * 2;
        let mut ring = vec![0.0; len];
        self.coords.fill(&mut ring);

        let mut shift = 0;
        let mut sum = 0.0;
        for _ in 0..self.trials {
            let mut twice_area = 0.0;
            let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
            let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);

            for i in 0..self.ngon {
                let at = shift + 2 * i;
                let x = ring[at % len];
                let y = ring[(at + 1) % len];
                let next_x = ring[(at + 2) % len];
                let next_y = ring[(at + 3) % len];
                twice_area += x * next_y - next_x * y;

                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }

            sum += (twice_area.abs() / 2.0) / ((max_x - min_x) * (max_y - min_y));

            ring[shift] = self.coords.draw();
            shift = (shift + 1) % len;
        }

        self.ratios_sum += sum;
        self.completed += self.trials;
    }

    fn sum_of_ratios(&self) -> f64 {
        self.ratios_sum
    }

    fn completed_trials(&self) -> u64 {
        self.completed
    }
}
