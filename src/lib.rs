//! A mixture of two univariate Gaussian distributions ("BiNormal").
//!
//! [`BiNormal`] provides closed-form density, CDF, moments, skewness,
//! kurtosis, MGF and characteristic function, plus numerically solved
//! quantile, median and entropy. The [`fitting`] module evaluates the
//! log-likelihood of a sample and its analytic gradient for use by an
//! external optimizer, and seeds fits from kernel density peaks.
//!
//! ```
//! use binormal::{BiNormal, DistributionMethods};
//!
//! let d = BiNormal::<f64>::new(0.7, 0.0, 1.0, 3.0, 0.5).unwrap();
//! let x = d.quantile(0.9).unwrap();
//! assert!((d.cdf(x) - 0.9).abs() < 1e-9);
//! ```

pub mod config;
pub mod dist;
pub mod error;
pub mod fitting;
pub mod moments;
pub mod num;
pub mod numerics;

// Re-export commonly used types at crate root
pub use config::SolverOptions;
pub use dist::{BiNormal, DistributionMethods, Normal};
pub use error::{Error, Result};
pub use fitting::{gradient_log_likelihood, log_likelihood, LogLikelihood};
pub use moments::{central_moments, moments};
pub use num::Real;
pub use numerics::Quadrature;
