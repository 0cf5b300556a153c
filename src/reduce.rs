use crate::error::ReduceError;

/// One worker's output. Produced once, read after the join.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PartialResult {
    pub sum_of_ratios: f64,
    pub completed_trials: u64,
}

impl PartialResult {
    pub fn new(sum_of_ratios: f64, completed_trials: u64) -> Self {
        PartialResult {
            sum_of_ratios,
            completed_trials,
        }
    }
}

/// Totals over every partial result; the average is derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalEstimate {
    pub total_sum: f64,
    pub total_trials: u64,
}

impl GlobalEstimate {
    pub fn average(&self) -> f64 {
        self.total_sum / self.total_trials as f64
    }
}

/// Sums in slice order. Different thread counts associate the floating-point
/// additions differently, so the last bits of the average may differ.
pub fn reduce(partials: &[PartialResult]) -> Result<GlobalEstimate, ReduceError> {
    let mut total_sum = 0.0;
    let mut total_trials = 0u64;
    for partial in partials {
        total_sum += partial.sum_of_ratios;
        total_trials += partial.completed_trials;
    }

    if total_trials == 0 {
        return Err(ReduceError::DivisionByZero);
    }

    Ok(GlobalEstimate {
        total_sum,
        total_trials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn averages_over_all_workers() {
        let partials = [
            PartialResult::new(13.0, 26),
            PartialResult::new(12.5, 25),
            PartialResult::new(12.0, 25),
            PartialResult::new(13.0, 25),
        ];
        let estimate = reduce(&partials).unwrap();
        assert_eq!(estimate.total_trials, 101);
        assert_eq!(estimate.total_sum, 50.5);
        assert_eq!(estimate.average(), 0.5);
    }

    #[test]
    fn zero_trials_is_division_by_zero() {
        assert_eq!(reduce(&[]), Err(ReduceError::DivisionByZero));
        let idle = [PartialResult::default(), PartialResult::default()];
        assert_eq!(reduce(&idle), Err(ReduceError::DivisionByZero));
    }

    #[test]
    fn idle_workers_do_not_skew_the_average() {
        let partials = [PartialResult::new(3.0, 4), PartialResult::default()];
        assert_eq!(reduce(&partials).unwrap().average(), 0.75);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn totals_ignore_worker_order(
            partials in prop::collection::vec((0.0f64..1.0e6, 1u64..1_000_000), 1..32),
            rotation in 0usize..32,
        ) {
            let partials: Vec<PartialResult> = partials
                .into_iter()
                .map(|(sum, trials)| PartialResult::new(sum, trials))
                .collect();
            let mut reordered = partials.clone();
            reordered.rotate_left(rotation % partials.len());
            reordered.reverse();

            let a = reduce(&partials).unwrap();
            let b = reduce(&reordered).unwrap();
            prop_assert_eq!(a.total_trials, b.total_trials);
            let tolerance = 1e-9 * a.total_sum.abs().max(1.0);
            prop_assert!((a.total_sum - b.total_sum).abs() <= tolerance);
        }
    }
}
