use clap::Parser;

use crate::error::ConfigError;
use crate::simulation::{Strategy, MAX_NGON};

pub const DEFAULT_TRIALS: u64 = 1_000_000_000;
pub const DEFAULT_MAX_THREADS: i64 = 30;
pub const DEFAULT_NGON: usize = 3;

/// Monte Carlo estimate of a random polygon's area over its bounding box area.
#[derive(Debug, Parser)]
#[command(name = "polygon-ratio", version)]
pub struct Args {
    /// Number of simulations (trials)
    #[arg(short = 'n', long = "nsims", default_value_t = DEFAULT_TRIALS)]
    pub nsims: u64,

    /// Maximum number of worker threads
    #[arg(
        short = 't',
        long = "mxthreads",
        default_value_t = DEFAULT_MAX_THREADS,
        allow_negative_numbers = true
    )]
    pub mxthreads: i64,

    /// Number of points of the polygon
    #[arg(short = 'g', long = "ngon", default_value_t = DEFAULT_NGON)]
    pub ngon: usize,

    /// Simulation name: points, traced, batched, columnar, triangle or window
    #[arg(short = 's', long = "simulation", default_value_t = Strategy::default().to_string())]
    pub simulation: String,

    /// Base seed; worker i uses seed + i. Seeds from OS entropy when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print topology, placement and timing diagnostics
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// A validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub trials: u64,
    pub max_threads: i64,
    pub ngon: usize,
    pub strategy: Strategy,
    pub seed: Option<u64>,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            trials: DEFAULT_TRIALS,
            max_threads: DEFAULT_MAX_THREADS,
            ngon: DEFAULT_NGON,
            strategy: Strategy::default(),
            seed: None,
            verbose: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        if self.ngon < 3 {
            return Err(ConfigError::TooFewPoints(self.ngon));
        }
        if self.ngon > MAX_NGON {
            return Err(ConfigError::TooManyPoints {
                ngon: self.ngon,
                max: MAX_NGON,
            });
        }
        if !self.strategy.supports(self.ngon) {
            return Err(ConfigError::UnsupportedPointCount {
                simulation: self.strategy.name(),
                ngon: self.ngon,
            });
        }
        Ok(())
    }
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let config = Config {
            trials: args.nsims,
            max_threads: args.mxthreads,
            ngon: args.ngon,
            strategy: args.simulation.parse()?,
            seed: args.seed,
            verbose: args.verbose,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config, ConfigError> {
        let args = Args::try_parse_from(std::iter::once("polygon-ratio").chain(argv.iter().copied()))
            .expect("arguments should parse");
        Config::try_from(args)
    }

    #[test]
    fn defaults() {
        assert_eq!(parse(&[]).unwrap(), Config::default());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn short_and_long_flags() {
        let config = parse(&["-n", "1000", "--mxthreads", "4", "-g", "5", "-s", "window", "-v", "--seed", "9"]).unwrap();
        assert_eq!(
            config,
            Config {
                trials: 1000,
                max_threads: 4,
                ngon: 5,
                strategy: Strategy::Window,
                seed: Some(9),
                verbose: true,
            }
        );
    }

    #[test]
    fn negative_thread_count_is_accepted() {
        assert_eq!(parse(&["-t", "-3"]).unwrap().max_threads, -3);
    }

    #[test]
    fn rejects_unknown_simulation() {
        assert_eq!(
            parse(&["-s", "hexagonal"]),
            Err(ConfigError::UnknownSimulation("hexagonal".into()))
        );
    }

    #[test]
    fn rejects_degenerate_polygons() {
        assert_eq!(parse(&["-g", "2"]), Err(ConfigError::TooFewPoints(2)));
    }

    #[test]
    fn rejects_oversized_polygons() {
        assert_eq!(
            parse(&["-s", "batched", "-g", "281474976710657"]),
            Err(ConfigError::TooManyPoints {
                ngon: 281_474_976_710_657,
                max: MAX_NGON,
            })
        );
        let too_many = (MAX_NGON + 1).to_string();
        assert!(matches!(
            parse(&["-s", "window", "-g", &too_many]),
            Err(ConfigError::TooManyPoints { .. })
        ));
        let largest = MAX_NGON.to_string();
        assert_eq!(parse(&["-g", &largest]).unwrap().ngon, MAX_NGON);
    }

    #[test]
    fn triangle_needs_three_points() {
        assert_eq!(
            parse(&["-s", "triangle", "-g", "4"]),
            Err(ConfigError::UnsupportedPointCount { simulation: "triangle", ngon: 4 })
        );
        assert!(parse(&["-s", "triangle"]).is_ok());
    }

    #[test]
    fn rejects_zero_trials() {
        assert_eq!(parse(&["-n", "0"]), Err(ConfigError::NoTrials));
    }

    #[test]
    fn unparsable_numbers_fail_in_clap() {
        assert!(Args::try_parse_from(["polygon-ratio", "-n", "lots"]).is_err());
        assert!(Args::try_parse_from(["polygon-ratio", "-n", "-5"]).is_err());
    }
}
