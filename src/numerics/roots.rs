//! Scalar root finders.
//!
//! Two modes are provided: `newton_bracketed` uses the value and the
//! derivative and falls back to bisection whenever a Newton step leaves the
//! current bracket; `secant` uses values only and needs no bracket. Both are
//! bounded by `SolverOptions::max_iterations` and report non-convergence as
//! `Error::Convergence`.

use crate::config::SolverOptions;
use crate::error::{Error, Result};

fn convergence(method: &'static str, iterations: usize, last: f64, residual: f64) -> Error {
    log::debug!(
        "{} failed after {} iterations at x = {} (residual {})",
        method,
        iterations,
        last,
        residual
    );
    Error::Convergence {
        method,
        iterations,
        last,
        residual,
    }
}

/// Grows `[center - width, center + width]` until `f` changes sign across it.
///
/// Intended for monotone `f`: each step doubles the width and pushes out the
/// end whose value is closest to zero.
pub fn expand_bracket<F>(f: F, center: f64, width: f64, opts: &SolverOptions) -> Result<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let mut width = if width > 0.0 && width.is_finite() { width } else { 1.0 };
    let mut lo = center - width;
    let mut hi = center + width;

    for iter in 0..opts.max_iterations {
        let (f_lo, f_hi) = (f(lo), f(hi));
        if !f_lo.is_finite() || !f_hi.is_finite() {
            return Err(convergence("bracket", iter, lo, f_lo));
        }
        if f_lo == 0.0 || f_hi == 0.0 || f_lo.signum() != f_hi.signum() {
            return Ok((lo, hi));
        }
        width *= 2.0;
        if f_lo.abs() < f_hi.abs() {
            lo -= width;
        } else {
            hi += width;
        }
        log::trace!("bracket grown to [{}, {}]", lo, hi);
    }

    Err(convergence("bracket", opts.max_iterations, center, f(center)))
}

/// Newton-Raphson with bisection fallback inside `[lo, hi]`.
///
/// `f(lo)` and `f(hi)` must bracket a root.
pub fn newton_bracketed<F, D>(
    f: F,
    df: D,
    x0: f64,
    mut lo: f64,
    mut hi: f64,
    opts: &SolverOptions,
) -> Result<f64>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let f_lo = f(lo);
    if f_lo == 0.0 {
        return Ok(lo);
    }
    let rising = f_lo < 0.0;

    let mut x = x0.clamp(lo, hi);
    let mut fx = f(x);

    for iter in 0..opts.max_iterations {
        if !fx.is_finite() {
            return Err(convergence("newton", iter, x, fx));
        }
        if fx.abs() <= opts.tolerance {
            log::debug!("newton converged to {} in {} iterations", x, iter);
            return Ok(x);
        }

        if (fx < 0.0) == rising {
            lo = x;
        } else {
            hi = x;
        }

        let slope = df(x);
        let candidate = x - fx / slope;
        let next = if slope.is_finite() && slope != 0.0 && candidate > lo && candidate < hi {
            candidate
        } else {
            0.5 * (lo + hi)
        };

        let step = (next - x).abs();
        x = next;
        fx = f(x);
        if step <= opts.tolerance * (1.0 + x.abs()) {
            log::debug!("newton step converged to {} in {} iterations", x, iter + 1);
            return Ok(x);
        }
    }

    Err(convergence("newton", opts.max_iterations, x, fx))
}

/// Secant iteration from the two starting points `x0` and `x1`.
pub fn secant<F>(f: F, x0: f64, x1: f64, opts: &SolverOptions) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut f_a) = (x0, f(x0));
    if f_a.abs() <= opts.tolerance {
        return Ok(a);
    }
    let (mut b, mut f_b) = (x1, f(x1));

    for iter in 0..opts.max_iterations {
        if !f_b.is_finite() {
            return Err(convergence("secant", iter, b, f_b));
        }
        if f_b.abs() <= opts.tolerance {
            log::debug!("secant converged to {} in {} iterations", b, iter);
            return Ok(b);
        }

        let denom = f_b - f_a;
        if denom == 0.0 {
            // flat secant, no further progress possible
            return Err(convergence("secant", iter, b, f_b));
        }
        let c = b - f_b * (b - a) / denom;
        if !c.is_finite() {
            return Err(convergence("secant", iter, b, f_b));
        }

        a = b;
        f_a = f_b;
        b = c;
        f_b = f(b);

        if (b - a).abs() <= opts.tolerance * (1.0 + b.abs()) && f_b.is_finite() {
            log::debug!("secant step converged to {} in {} iterations", b, iter + 1);
            return Ok(b);
        }
    }

    Err(convergence("secant", opts.max_iterations, b, f_b))
}
