use crate::dist::DistributionMethods;
use crate::error::{Error, Result};
use crate::num::{cast, to_f64, Real};
use num_complex::Complex;
use rand::Rng;
use rand_distr::{Distribution, Normal as NormalSampler};
use statrs::distribution::{Continuous, ContinuousCDF, Normal as NormalDist};
use std::fmt;

/// The Normal (Gaussian) distribution used as a mixture component.
///
/// Density and CDF evaluation are delegated to `statrs`; random variates
/// come from `rand_distr`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal<T: Real = f64> {
    /// The mean of the distribution (loc).
    loc: T,
    /// The standard deviation of the distribution (scale).
    scale: T,
    dist: NormalDist,
    sampler: NormalSampler<f64>,
}

impl<T: Real> Normal<T> {
    /// Creates a Normal with mean `loc` and standard deviation `scale`.
    ///
    /// Fails with [`Error::InvalidComponent`] unless `loc` is finite and
    /// `scale` is finite and strictly positive.
    pub fn new(loc: T, scale: T) -> Result<Self> {
        let (mean, std) = (to_f64(loc), to_f64(scale));
        let invalid = || Error::InvalidComponent { mean, std };
        if !mean.is_finite() || !std.is_finite() || std <= 0.0 {
            return Err(invalid());
        }
        let dist = NormalDist::new(mean, std).map_err(|_| invalid())?;
        let sampler = NormalSampler::new(mean, std).map_err(|_| invalid())?;
        Ok(Normal {
            loc,
            scale,
            dist,
            sampler,
        })
    }

    pub fn loc(&self) -> T {
        self.loc
    }

    pub fn scale(&self) -> T {
        self.scale
    }

    /// Draws one variate using the caller's random source.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        cast(self.sampler.sample(rng))
    }

    pub(crate) fn pdf_f64(&self, x: f64) -> f64 {
        self.dist.pdf(x)
    }

    pub(crate) fn ln_pdf_f64(&self, x: f64) -> f64 {
        self.dist.ln_pdf(x)
    }

    pub(crate) fn cdf_f64(&self, x: f64) -> f64 {
        self.dist.cdf(x)
    }

    pub(crate) fn sf_f64(&self, x: f64) -> f64 {
        self.dist.sf(x)
    }
}

impl<T: Real> DistributionMethods<T> for Normal<T> {
    fn mean(&self) -> T {
        self.loc
    }

    fn variance(&self) -> T {
        self.scale * self.scale
    }

    fn std(&self) -> T {
        self.scale
    }

    fn pdf(&self, x: T) -> T {
        cast(self.pdf_f64(to_f64(x)))
    }

    fn logpdf(&self, x: T) -> T {
        cast(self.ln_pdf_f64(to_f64(x)))
    }

    fn cdf(&self, x: T) -> T {
        cast(self.cdf_f64(to_f64(x)))
    }

    fn sf(&self, x: T) -> T {
        cast(self.sf_f64(to_f64(x)))
    }

    fn mgf(&self, t: T) -> T {
        let half: T = cast(0.5);
        (self.loc * t + half * self.scale * self.scale * t * t).exp()
    }

    fn cf(&self, t: T) -> Complex<T> {
        let half: T = cast(0.5);
        let modulus = (-half * self.scale * self.scale * t * t).exp();
        Complex::from_polar(modulus, self.loc * t)
    }

    fn moment(&self, k: u32) -> Result<T> {
        let m = self.loc;
        let v = self.scale * self.scale;
        let c = |x: f64| -> T { cast(x) };
        let raw = match k {
            1 => m,
            2 => m * m + v,
            3 => m.powi(3) + c(3.0) * m * v,
            4 => m.powi(4) + c(6.0) * m * m * v + c(3.0) * v * v,
            5 => m.powi(5) + c(10.0) * m.powi(3) * v + c(15.0) * m * v * v,
            6 => {
                m.powi(6) + c(15.0) * m.powi(4) * v + c(45.0) * m * m * v * v
                    + c(15.0) * v.powi(3)
            }
            7 => {
                m.powi(7)
                    + c(21.0) * m.powi(5) * v
                    + c(105.0) * m.powi(3) * v * v
                    + c(105.0) * m * v.powi(3)
            }
            8 => {
                m.powi(8)
                    + c(28.0) * m.powi(6) * v
                    + c(210.0) * m.powi(4) * v * v
                    + c(420.0) * m * m * v.powi(3)
                    + c(105.0) * v.powi(4)
            }
            _ => return Err(Error::UnsupportedMomentOrder(k)),
        };
        Ok(raw)
    }
}

impl<T: Real> fmt::Display for Normal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Normal(μ={}, σ={})", self.loc, self.scale)
    }
}
