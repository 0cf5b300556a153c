use super::{Coords, Sampler};

/// Keeps the six coordinates of the current triangle in locals. Each trial
/// drops the oldest coordinate and draws one new one.
pub struct TriangleSampler {
    trials: u64,
    coords: Coords,
    ratios_sum: f64,
    completed: u64,
}

impl TriangleSampler {
    pub fn new(trials: u64, coords: Coords) -> Self {
        TriangleSampler {
            trials,
            coords,
            ratios_sum: 0.0,
            completed: 0,
        }
    }
}

impl Sampler for TriangleSampler {
    fn run(&mut self) {
        let c = &mut self.coords;
        let (mut ax, mut ay) = (c.draw(), c.draw());
        let (mut bx, mut by) = (c.draw(), c.draw());
        let (mut cx, mut cy) = (c.draw(), c.draw());

        let mut sum = 0.0;
        for _ in 0..self.trials {
            let area = (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by)).abs() / 2.0;
            let width = (ax - bx).abs().max((ax - cx).abs()).max((bx - cx).abs());
            let height = (ay - by).abs().max((ay - cy).abs()).max((by - cy).abs());
            sum += area / (width * height);

            ax = ay;
            ay = bx;
            bx = by;
            by = cx;
            cx = cy;
            cy = c.draw();
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
