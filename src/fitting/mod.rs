//! Fitting support: log-likelihood with its gradient, and KDE-based seeding.

pub mod likelihood;
pub mod peaks;

pub use likelihood::{
    gradient_log_likelihood, gradient_log_likelihood_with, log_likelihood, LogLikelihood, N_PARAMS,
};
pub use peaks::{initial_guess, kde, kde_maxes, maxes, silverman_bandwidth, Kde, KdePeaks, Peaks};
