//! Numeric type bound shared by every distribution in the crate.

use ndarray::ScalarOperand;
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Real scalar type usable as the parameter type of a distribution.
///
/// Implemented for `f32` and `f64`. Evaluation of the Gaussian primitive
/// happens in `f64` and is converted back to `T`.
pub trait Real: Float + FromPrimitive + ScalarOperand + Debug + Display + Send + Sync + 'static {}

impl<T> Real for T where
    T: Float + FromPrimitive + ScalarOperand + Debug + Display + Send + Sync + 'static
{
}

/// Converts an `f64` constant into `T`, mapping unrepresentable values to NaN.
#[inline]
pub(crate) fn cast<T: Real>(x: f64) -> T {
    T::from_f64(x).unwrap_or_else(T::nan)
}

#[inline]
pub(crate) fn to_f64<T: Real>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}
