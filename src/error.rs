use thiserror::Error;

/// Error type for BiNormal construction, numerics and fitting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(
        "Invalid component: mean {mean}, std {std} (std must be finite and > 0, mean finite)"
    )]
    InvalidComponent { mean: f64, std: f64 },

    #[error("Invalid mixture weight: {0} (must lie in [0.5, 1])")]
    InvalidWeight(f64),

    #[error("Invalid probability: {0} (must lie strictly between 0 and 1)")]
    InvalidProbability(f64),

    #[error(
        "{method} did not converge after {iterations} iterations \
         (last x = {last}, residual = {residual})"
    )]
    Convergence {
        method: &'static str,
        iterations: usize,
        last: f64,
        residual: f64,
    },

    /// A numerically solved functional failed. `input` is the quantile
    /// probability, the median starting point or the entropy quadrature
    /// tolerance.
    #[error("{operation}({input}) failed for {distribution}")]
    Solve {
        operation: &'static str,
        input: f64,
        distribution: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Raw moment of order {0} is not supported (orders 1..=8 only)")]
    UnsupportedMomentOrder(u32),

    #[error("Sample is empty")]
    EmptySample,

    #[error(
        "Numerical instability at sample {index} (x = {x}): mixture density {density} too small"
    )]
    NumericalInstability { index: usize, x: f64, density: f64 },

    #[error("Invalid parameter vector: expected {expected} values, got {got}")]
    InvalidParameterVector { expected: usize, got: usize },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
