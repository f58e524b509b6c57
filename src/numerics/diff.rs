//! Numeric differentiation.

/// Derivative of `f` at `x` by central differences.
///
/// The step is `cbrt(eps) * max(|x|, 1)`, which balances truncation against
/// rounding error for smooth `f`.
pub fn derivative<F>(f: F, x: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let h = f64::EPSILON.cbrt() * x.abs().max(1.0);
    let (forward, backward) = (x + h, x - h);
    (f(forward) - f(backward)) / (forward - backward)
}
