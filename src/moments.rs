//! Sample moments.
//!
//! `moments` returns the raw moments ⟨xᵏ⟩ and `central_moments` the central
//! moments ⟨(x - x̄)ᵏ⟩ for `k = 1..=n`. The first central moment is always
//! exactly zero.

use crate::error::{Error, Result};
use crate::num::Real;
use ndarray::Array1;

fn sample_mean<T: Real>(sample: &Array1<T>) -> Result<T> {
    sample.mean().ok_or(Error::EmptySample)
}

/// Raw sample moments `[⟨x⟩, ⟨x²⟩, ..., ⟨xⁿ⟩]`.
pub fn moments<T: Real>(sample: &Array1<T>, n: usize) -> Result<Array1<T>> {
    if sample.is_empty() {
        return Err(Error::EmptySample);
    }
    (1..=n)
        .map(|k| sample_mean(&sample.mapv(|x| x.powi(k as i32))))
        .collect::<Result<Vec<T>>>()
        .map(Array1::from_vec)
}

/// Central sample moments `[0, ⟨(x - x̄)²⟩, ..., ⟨(x - x̄)ⁿ⟩]`.
pub fn central_moments<T: Real>(sample: &Array1<T>, n: usize) -> Result<Array1<T>> {
    let mean = sample_mean(sample)?;
    let centered = sample.mapv(|x| x - mean);
    let mut out = Array1::zeros(n);
    for k in 2..=n {
        out[k - 1] = sample_mean(&centered.mapv(|x| x.powi(k as i32)))?;
    }
    Ok(out)
}
