use crate::config::SolverOptions;
use crate::dist::{DistributionMethods, Normal};
use crate::error::{Error, Result};
use crate::num::{cast, to_f64, Real};
use crate::numerics::{
    derivative, expand_bracket, integrate_real_line_with_breaks, newton_bracketed, secant,
    Quadrature,
};
use ndarray::Array1;
use num_complex::Complex;
use rand::Rng;
use statrs::function::erf::erf;
use std::f64::consts::SQRT_2;
use std::fmt;

/// Mixture of two univariate Normal distributions.
///
/// The density is `λ·N(μ₁, σ₁) + (1 - λ)·N(μ₂, σ₂)`. Component 1 is the
/// primary component: the weight `λ` must lie in `[1/2, 1]` and is checked
/// at construction.
///
/// # Sampling
///
/// [`BiNormal::sample`] returns the weighted sum `λ·x₁ + (1 - λ)·x₂` of one
/// draw from each component. That is *not* a draw from the mixture density:
/// the analytic mean, variance and higher moments of this type describe the
/// mixture, and only [`BiNormal::sample_mixture`] (component 1 with
/// probability `λ`, component 2 otherwise) produces samples that follow them.
/// The weighted sum has mean `λμ₁ + (1 - λ)μ₂` but variance
/// `λ²σ₁² + (1 - λ)²σ₂²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiNormal<T: Real = f64> {
    weight: T,
    first: Normal<T>,
    second: Normal<T>,
}

impl<T: Real> BiNormal<T> {
    /// Creates the mixture `λ·N(μ₁, σ₁) + (1 - λ)·N(μ₂, σ₂)`.
    ///
    /// Fails with [`Error::InvalidWeight`] if `λ ∉ [1/2, 1]` and with
    /// [`Error::InvalidComponent`] if either standard deviation is not
    /// strictly positive.
    pub fn new(lambda: T, mu1: T, sigma1: T, mu2: T, sigma2: T) -> Result<Self> {
        let w = to_f64(lambda);
        if !(0.5..=1.0).contains(&w) {
            return Err(Error::InvalidWeight(w));
        }
        let first = Normal::new(mu1, sigma1)?;
        let second = Normal::new(mu2, sigma2)?;
        Ok(BiNormal {
            weight: lambda,
            first,
            second,
        })
    }

    /// The mixture weight `λ` of the first component.
    pub fn weight(&self) -> T {
        self.weight
    }

    pub fn components(&self) -> (&Normal<T>, &Normal<T>) {
        (&self.first, &self.second)
    }

    /// Returns `(λ, μ₁, σ₁, μ₂, σ₂)` in constructor order.
    pub fn params(&self) -> (T, T, T, T, T) {
        (
            self.weight,
            self.first.loc(),
            self.first.scale(),
            self.second.loc(),
            self.second.scale(),
        )
    }

    /// Pre-weighted component densities `(λ·f₁(x), (1 - λ)·f₂(x))`.
    pub fn component_pdfs(&self, x: T) -> (T, T) {
        (
            self.weight * self.first.pdf(x),
            (T::one() - self.weight) * self.second.pdf(x),
        )
    }

    /// Pre-weighted component CDFs `(λ·F₁(x), (1 - λ)·F₂(x))`.
    pub fn component_cdfs(&self, x: T) -> (T, T) {
        (
            self.weight * self.first.cdf(x),
            (T::one() - self.weight) * self.second.cdf(x),
        )
    }

    pub fn minimum(&self) -> T {
        T::neg_infinity()
    }

    pub fn maximum(&self) -> T {
        T::infinity()
    }

    /// The support is the whole real line, so every `x` is in it.
    pub fn in_support(&self, _x: T) -> bool {
        true
    }

    /// The mean of the primary component.
    ///
    /// This is a simplification: the mixture density may have one or two
    /// local maxima and neither is searched for.
    pub fn mode(&self) -> T {
        self.first.loc()
    }

    /// Candidate mode locations `[μ₁, μ₂]`, not verified to be local maxima.
    pub fn modes(&self) -> [T; 2] {
        [self.first.loc(), self.second.loc()]
    }

    pub fn skewness(&self) -> T {
        let (l, m1, s1, m2, s2) = self.params();
        let three: T = cast(3.0);
        let mu = self.mean();
        let var = self.variance();

        let raw3 = l * m1 * (m1 * m1 + three * s1 * s1)
            + (T::one() - l) * m2 * (m2 * m2 + three * s2 * s2);
        (raw3 - mu * (three * var + mu * mu)) / var.powf(cast(1.5))
    }

    /// Kurtosis E[(X - μ)⁴] / σ⁴ (not the excess kurtosis).
    pub fn kurtosis(&self) -> T {
        let (l, m1, s1, m2, s2) = self.params();
        let one = T::one();
        let (two, three, four, six): (T, T, T, T) = (cast(2.0), cast(3.0), cast(4.0), cast(6.0));
        let mu = self.mean();
        let var = self.variance();

        let raw4 = l * (m1.powi(4) + three * s1.powi(4) + six * m1 * m1 * s1 * s1)
            + (one - l) * (m2.powi(4) + three * s2.powi(4) + six * m2 * m2 * s2 * s2);
        let raw3 = l * m1 * (m1 * m1 + three * s1 * s1)
            + (one - l) * m2 * (m2 * m2 + three * s2 * s2);
        let central4 = raw4 + three * mu * mu * (mu * mu + two * var) - four * mu * raw3;
        central4 / (var * var)
    }

    pub fn excess_kurtosis(&self) -> T {
        self.kurtosis() - cast(3.0)
    }

    /// Inverse CDF with default solver options.
    pub fn quantile(&self, q: T) -> Result<T> {
        self.quantile_with(q, &SolverOptions::default())
    }

    /// Solves `cdf(x) = q` by Newton's method started at the mean.
    ///
    /// The equation is solved on a log scale, `ln cdf(x) = ln q` for
    /// `q <= 1/2` and `ln sf(x) = ln(1 - q)` above, so the residual tolerance
    /// is relative to the tail probability. The derivative is obtained by
    /// numeric differentiation. A bracket is grown around the mean first so
    /// that every Newton step can fall back to bisection.
    pub fn quantile_with(&self, q: T, opts: &SolverOptions) -> Result<T> {
        let p = to_f64(q);
        if !(p > 0.0 && p < 1.0) {
            return Err(Error::InvalidProbability(p));
        }
        opts.validate()?;

        // clamped so the target stays finite where the tail underflows
        let ln_tail = |v: f64| v.max(f64::MIN_POSITIVE).ln();
        let lower = p <= 0.5;
        let ln_target = if lower { p.ln() } else { (1.0 - p).ln() };
        let target = |x: f64| {
            if lower {
                ln_tail(self.cdf_f64(x)) - ln_target
            } else {
                ln_target - ln_tail(self.sf_f64(x))
            }
        };
        let center = to_f64(self.mean());
        let width = to_f64(self.std());

        let solve = || -> Result<f64> {
            let (lo, hi) = expand_bracket(target, center, width, opts)?;
            newton_bracketed(target, |x| derivative(target, x), center, lo, hi, opts)
        };
        solve()
            .map(cast)
            .map_err(|e| self.solve_error("quantile", p, e))
    }

    /// Central `1 - alpha` interval `(quantile(alpha/2), quantile(1 - alpha/2))`.
    pub fn interval(&self, alpha: T) -> Result<(T, T)> {
        let a = to_f64(alpha);
        if !(a > 0.0 && a < 1.0) {
            return Err(Error::InvalidProbability(a));
        }
        let half: T = cast(0.5);
        let lower = self.quantile(alpha * half)?;
        let upper = self.quantile(T::one() - alpha * half)?;
        Ok((lower, upper))
    }

    /// Median with default solver options.
    pub fn median(&self) -> Result<T> {
        self.median_with(&SolverOptions::default())
    }

    /// Root of `λ·erf((x - μ₁)/(σ₁√2)) + (1 - λ)·erf((x - μ₂)/(σ₂√2))`.
    ///
    /// Uses the value-only secant solver from the mean, without a bracket.
    /// Widely separated components can make it fail to converge, which is
    /// reported rather than corrected.
    pub fn median_with(&self, opts: &SolverOptions) -> Result<T> {
        opts.validate()?;
        let (l, m1, s1, m2, s2) = self.params();
        let (w, m1, s1, m2, s2) = (to_f64(l), to_f64(m1), to_f64(s1), to_f64(m2), to_f64(s2));

        let balance = |x: f64| {
            w * erf((x - m1) / (s1 * SQRT_2)) + (1.0 - w) * erf((x - m2) / (s2 * SQRT_2))
        };
        let x0 = to_f64(self.mean());
        let x1 = x0 + 0.1 * to_f64(self.std());

        secant(balance, x0, x1, opts)
            .map(cast)
            .map_err(|e| self.solve_error("median", x0, e))
    }

    /// Differential entropy with default solver options.
    pub fn entropy(&self) -> Result<Quadrature<T>> {
        self.entropy_with(&SolverOptions::default())
    }

    /// Differential entropy `-∫ f(x) ln f(x) dx` by adaptive quadrature.
    ///
    /// The returned [`Quadrature`] carries the residual. Exhausting the
    /// subdivision budget is logged and the estimate is still returned. A
    /// failed integration is reported as [`Error::Solve`] with the quadrature
    /// tolerance as its input.
    pub fn entropy_with(&self, opts: &SolverOptions) -> Result<Quadrature<T>> {
        opts.validate()?;
        let integrand = |x: f64| {
            let p = self.pdf_f64(x);
            if p > 0.0 && p.is_finite() {
                -p * p.ln()
            } else {
                0.0
            }
        };
        self.integrate_density_functional(integrand, "entropy", opts)
    }

    /// Integrates `f` over the real line, split at both component means.
    fn integrate_density_functional<F>(
        &self,
        f: F,
        operation: &'static str,
        opts: &SolverOptions,
    ) -> Result<Quadrature<T>>
    where
        F: Fn(f64) -> f64,
    {
        let breaks = [to_f64(self.first.loc()), to_f64(self.second.loc())];
        let q = integrate_real_line_with_breaks(
            f,
            to_f64(self.mean()),
            to_f64(self.std()),
            &breaks,
            opts,
        )
        .map_err(|e| {
            log::warn!("{} quadrature failed for {}", operation, self);
            self.solve_error(operation, opts.quad_tolerance, e)
        })?;
        Ok(Quadrature {
            value: cast(q.value),
            abs_error: cast(q.abs_error),
            subdivisions: q.subdivisions,
        })
    }

    /// Draws `λ·x₁ + (1 - λ)·x₂` with `x₁ ~ N₁`, `x₂ ~ N₂` independent.
    ///
    /// See the type-level documentation: this is not mixture sampling.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let x1 = self.first.sample(rng);
        let x2 = self.second.sample(rng);
        self.weight * x1 + (T::one() - self.weight) * x2
    }

    pub fn sample_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Array1<T> {
        Array1::from_iter((0..n).map(|_| self.sample(rng)))
    }

    /// Draws from the mixture density: component 1 with probability `λ`.
    pub fn sample_mixture<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let u: f64 = rng.random();
        if u < to_f64(self.weight) {
            self.first.sample(rng)
        } else {
            self.second.sample(rng)
        }
    }

    pub fn sample_mixture_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Array1<T> {
        Array1::from_iter((0..n).map(|_| self.sample_mixture(rng)))
    }

    pub(crate) fn pdf_f64(&self, x: f64) -> f64 {
        let w = to_f64(self.weight);
        w * self.first.pdf_f64(x) + (1.0 - w) * self.second.pdf_f64(x)
    }

    pub(crate) fn cdf_f64(&self, x: f64) -> f64 {
        let w = to_f64(self.weight);
        w * self.first.cdf_f64(x) + (1.0 - w) * self.second.cdf_f64(x)
    }

    pub(crate) fn sf_f64(&self, x: f64) -> f64 {
        let w = to_f64(self.weight);
        w * self.first.sf_f64(x) + (1.0 - w) * self.second.sf_f64(x)
    }

    fn solve_error(&self, operation: &'static str, input: f64, source: Error) -> Error {
        Error::Solve {
            operation,
            input,
            distribution: self.to_string(),
            source: Box::new(source),
        }
    }
}

impl<T: Real> DistributionMethods<T> for BiNormal<T> {
    fn mean(&self) -> T {
        let l = self.weight;
        l * self.first.loc() + (T::one() - l) * self.second.loc()
    }

    fn variance(&self) -> T {
        let l = self.weight;
        let one = T::one();
        let spread = self.first.loc() - self.second.loc();
        l * self.first.variance()
            + (one - l) * self.second.variance()
            + l * (one - l) * spread * spread
    }

    fn pdf(&self, x: T) -> T {
        let (a, b) = self.component_pdfs(x);
        a + b
    }

    /// Log density, evaluated as a log-sum-exp of the weighted components.
    fn logpdf(&self, x: T) -> T {
        let w = to_f64(self.weight);
        let xf = to_f64(x);
        let a = w.ln() + self.first.ln_pdf_f64(xf);
        let b = (1.0 - w).ln() + self.second.ln_pdf_f64(xf);
        let m = a.max(b);
        if m == f64::NEG_INFINITY {
            return T::neg_infinity();
        }
        cast(m + ((a - m).exp() + (b - m).exp()).ln())
    }

    fn cdf(&self, x: T) -> T {
        let (a, b) = self.component_cdfs(x);
        a + b
    }

    /// Survival function from the component tails, accurate where `cdf` is
    /// close to one.
    fn sf(&self, x: T) -> T {
        cast(self.sf_f64(to_f64(x)))
    }

    fn mgf(&self, t: T) -> T {
        let l = self.weight;
        l * self.first.mgf(t) + (T::one() - l) * self.second.mgf(t)
    }

    fn cf(&self, t: T) -> Complex<T> {
        let l = self.weight;
        self.first.cf(t) * l + self.second.cf(t) * (T::one() - l)
    }

    fn moment(&self, k: u32) -> Result<T> {
        let l = self.weight;
        Ok(l * self.first.moment(k)? + (T::one() - l) * self.second.moment(k)?)
    }
}

impl<T: Real> fmt::Display for BiNormal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (l, m1, s1, m2, s2) = self.params();
        write!(f, "BiNormal(λ={}, μ₁={}, σ₁={}, μ₂={}, σ₂={})", l, m1, s1, m2, s2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_integration_carries_distribution() {
        let d = BiNormal::new(0.7, 0.0, 1.0, 3.0, 0.5).unwrap();
        let opts = SolverOptions::default();
        match d.integrate_density_functional(|_| f64::NAN, "entropy", &opts) {
            Err(Error::Solve {
                operation,
                input,
                distribution,
                source,
            }) => {
                assert_eq!(operation, "entropy");
                assert_eq!(input, opts.quad_tolerance);
                assert_eq!(distribution, d.to_string());
                assert!(matches!(*source, Error::Convergence { .. }));
            }
            other => panic!("expected a solve error, got {:?}", other),
        }
    }

    #[test]
    fn test_sf_keeps_precision_in_upper_tail() {
        let d = BiNormal::new(0.7, 0.0, 1.0, 3.0, 0.5).unwrap();
        // cdf rounds to one here, the tail probability does not
        assert_eq!(d.cdf(12.0), 1.0);
        let sf = d.sf(12.0);
        assert!(sf > 0.0 && sf < 1e-20);
    }
}
