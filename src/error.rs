use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid simulation name: {0}")]
    UnknownSimulation(String),
    #[error("Polygons must have at least 3 points, got {0}")]
    TooFewPoints(usize),
    #[error("Polygons can have at most {max} points, got {ngon}")]
    TooManyPoints { ngon: usize, max: usize },
    #[error("Simulation '{simulation}' only supports 3-point polygons, got {ngon}")]
    UnsupportedPointCount { simulation: &'static str, ngon: usize },
    #[error("Number of simulations must be at least 1")]
    NoTrials,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceError {
    #[error("Division by zero: no trials were completed")]
    DivisionByZero,
}

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Failed to spawn worker thread {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("Worker thread {0} panicked")]
    WorkerPanicked(usize),
    #[error(transparent)]
    Reduce(#[from] ReduceError),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Harness(#[from] HarnessError),
}

impl Error {
    /// Configuration problems exit with 1 before any work starts; failures
    /// during the run exit with 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 1,
            Error::Harness(_) => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
