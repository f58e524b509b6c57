pub mod binormal;
pub mod normal;

pub use binormal::BiNormal;
pub use normal::Normal;

use crate::error::Result;
use crate::num::Real;
use num_complex::Complex;

/// Common methods of a univariate continuous distribution.
///
/// Implemented by the Gaussian component [`Normal`] and by the mixture
/// [`BiNormal`]; the likelihood functions in [`crate::fitting`] accept any
/// implementor.
pub trait DistributionMethods<T: Real> {
    /// Returns the mean of the distribution.
    fn mean(&self) -> T;

    /// Returns the variance of the distribution.
    fn variance(&self) -> T;

    /// Returns the standard deviation of the distribution.
    fn std(&self) -> T {
        self.variance().sqrt()
    }

    /// Evaluates the probability density function at `x`.
    fn pdf(&self, x: T) -> T;

    /// Evaluates the log probability density function at `x`.
    fn logpdf(&self, x: T) -> T {
        self.pdf(x).ln()
    }

    /// Evaluates the cumulative distribution function at `x`.
    fn cdf(&self, x: T) -> T;

    /// Returns the survival function (1 - CDF) at `x`.
    fn sf(&self, x: T) -> T {
        T::one() - self.cdf(x)
    }

    /// Moment-generating function E[exp(tX)].
    fn mgf(&self, t: T) -> T;

    /// Characteristic function E[exp(itX)].
    fn cf(&self, t: T) -> Complex<T>;

    /// Raw moment E[X^k] about zero.
    fn moment(&self, k: u32) -> Result<T>;
}
