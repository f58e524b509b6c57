//! Tolerances and iteration bounds for the numeric routines.

use crate::error::{Error, Result};

/// Options shared by the root finders, the quadrature routine, the KDE and
/// the likelihood gradient.
///
/// Every operation that iterates has a default entry point that uses
/// `SolverOptions::default()` and a `*_with` variant taking explicit options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    /// Absolute tolerance on the root residual and on the step size.
    pub tolerance: f64,
    /// Upper bound on root-finder iterations (and on bracket growth steps).
    pub max_iterations: usize,
    /// Absolute error target for adaptive quadrature.
    pub quad_tolerance: f64,
    /// Upper bound on the number of quadrature subintervals.
    pub max_subdivisions: usize,
    /// Number of grid points the kernel density estimate is evaluated on.
    pub kde_points: usize,
    /// Mixture densities below this value make the gradient unstable.
    pub min_density: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            tolerance: 1e-12,
            max_iterations: 100,
            quad_tolerance: 1e-10,
            max_subdivisions: 500,
            kde_points: 2048,
            min_density: 1e-300,
        }
    }
}

impl SolverOptions {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_quad_tolerance(mut self, quad_tolerance: f64) -> Self {
        self.quad_tolerance = quad_tolerance;
        self
    }

    pub fn with_max_subdivisions(mut self, max_subdivisions: usize) -> Self {
        self.max_subdivisions = max_subdivisions;
        self
    }

    pub fn with_kde_points(mut self, kde_points: usize) -> Self {
        self.kde_points = kde_points;
        self
    }

    pub fn with_min_density(mut self, min_density: f64) -> Self {
        self.min_density = min_density;
        self
    }

    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(Error::InvalidOptions(format!(
                "tolerance {} must be > 0 and finite",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidOptions(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.quad_tolerance > 0.0 && self.quad_tolerance.is_finite()) {
            return Err(Error::InvalidOptions(format!(
                "quad_tolerance {} must be > 0 and finite",
                self.quad_tolerance
            )));
        }
        if self.max_subdivisions == 0 {
            return Err(Error::InvalidOptions(
                "max_subdivisions must be at least 1".to_string(),
            ));
        }
        if self.kde_points < 3 {
            return Err(Error::InvalidOptions(format!(
                "kde_points {} must be at least 3",
                self.kde_points
            )));
        }
        if !(self.min_density >= 0.0 && self.min_density.is_finite()) {
            return Err(Error::InvalidOptions(format!(
                "min_density {} must be >= 0 and finite",
                self.min_density
            )));
        }
        Ok(())
    }
}
