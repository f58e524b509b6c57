//! Log-likelihood and its analytic gradient for BiNormal fitting.
//!
//! Nothing here optimizes: an external optimizer consumes the
//! `(value, gradient)` pairs produced by [`LogLikelihood`].

use crate::config::SolverOptions;
use crate::dist::{BiNormal, DistributionMethods};
use crate::error::{Error, Result};
use crate::num::{cast, to_f64, Real};
use ndarray::Array1;

/// Number of BiNormal parameters: `[λ, μ₁, σ₁, μ₂, σ₂]`.
pub const N_PARAMS: usize = 5;

/// Sum of `logpdf` over the sample. An empty sample gives zero.
pub fn log_likelihood<T, D>(d: &D, sample: &Array1<T>) -> T
where
    T: Real,
    D: DistributionMethods<T>,
{
    sample.iter().fold(T::zero(), |acc, &x| acc + d.logpdf(x))
}

/// Gradient of the log-likelihood with default options.
pub fn gradient_log_likelihood<T: Real>(d: &BiNormal<T>, sample: &Array1<T>) -> Result<Array1<T>> {
    gradient_log_likelihood_with(d, sample, &SolverOptions::default())
}

/// Gradient `[∂λ, ∂μ₁, ∂σ₁, ∂μ₂, ∂σ₂]` of the log-likelihood.
///
/// Each point contributes through the component responsibilities
/// `r₁ = λf₁/p` and `r₂ = (1 - λ)f₂/p`, where `p` is the mixture density:
///
/// - `∂λ  = (f₁ - f₂) / p`
/// - `∂μⱼ = rⱼ (x - μⱼ) / σⱼ²`
/// - `∂σⱼ = rⱼ (zⱼ² - 1) / σⱼ` with `zⱼ = (x - μⱼ) / σⱼ`
///
/// A mixture density at or below `opts.min_density`, or any non-finite
/// term, is reported as [`Error::NumericalInstability`].
pub fn gradient_log_likelihood_with<T: Real>(
    d: &BiNormal<T>,
    sample: &Array1<T>,
    opts: &SolverOptions,
) -> Result<Array1<T>> {
    opts.validate()?;
    let (l, m1, s1, m2, s2) = d.params();
    let (first, second) = d.components();
    let one = T::one();
    let min_density: T = cast(opts.min_density);

    let mut grad = Array1::zeros(N_PARAMS);
    for (index, &x) in sample.iter().enumerate() {
        let f1 = first.pdf(x);
        let f2 = second.pdf(x);
        let p = l * f1 + (one - l) * f2;
        let unstable = || Error::NumericalInstability {
            index,
            x: to_f64(x),
            density: to_f64(p),
        };
        if !p.is_finite() || p <= min_density {
            return Err(unstable());
        }

        let r1 = l * f1 / p;
        let r2 = (one - l) * f2 / p;
        let z1 = (x - m1) / s1;
        let z2 = (x - m2) / s2;
        let terms = [
            (f1 - f2) / p,
            r1 * z1 / s1,
            r1 * (z1 * z1 - one) / s1,
            r2 * z2 / s2,
            r2 * (z2 * z2 - one) / s2,
        ];
        if terms.iter().any(|t| !t.is_finite()) {
            return Err(unstable());
        }
        for (g, t) in grad.iter_mut().zip(terms) {
            *g = *g + t;
        }
    }
    Ok(grad)
}

/// Log-likelihood of a fixed sample as a function of the parameter vector
/// `[λ, μ₁, σ₁, μ₂, σ₂]`.
#[derive(Debug, Clone)]
pub struct LogLikelihood<'a, T: Real> {
    sample: &'a Array1<T>,
    opts: SolverOptions,
}

impl<'a, T: Real> LogLikelihood<'a, T> {
    pub fn new(sample: &'a Array1<T>) -> Self {
        LogLikelihood {
            sample,
            opts: SolverOptions::default(),
        }
    }

    pub fn with_options(mut self, opts: SolverOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn sample(&self) -> &Array1<T> {
        self.sample
    }

    /// Builds the distribution described by `params`.
    pub fn distribution(&self, params: &Array1<T>) -> Result<BiNormal<T>> {
        if params.len() != N_PARAMS {
            return Err(Error::InvalidParameterVector {
                expected: N_PARAMS,
                got: params.len(),
            });
        }
        BiNormal::new(params[0], params[1], params[2], params[3], params[4])
    }

    pub fn value(&self, params: &Array1<T>) -> Result<T> {
        let d = self.distribution(params)?;
        Ok(log_likelihood(&d, self.sample))
    }

    pub fn gradient(&self, params: &Array1<T>) -> Result<Array1<T>> {
        let d = self.distribution(params)?;
        gradient_log_likelihood_with(&d, self.sample, &self.opts)
    }

    pub fn value_and_gradient(&self, params: &Array1<T>) -> Result<(T, Array1<T>)> {
        let d = self.distribution(params)?;
        let grad = gradient_log_likelihood_with(&d, self.sample, &self.opts)?;
        Ok((log_likelihood(&d, self.sample), grad))
    }
}
