//! Adaptive Gauss-Kronrod quadrature.
//!
//! Each subinterval is integrated with the 15-point Kronrod rule; the
//! embedded 7-point Gauss rule gives the local error estimate. The interval
//! with the largest error is bisected until the total error meets
//! `SolverOptions::quad_tolerance` or `max_subdivisions` is reached.

use crate::config::SolverOptions;
use crate::error::{Error, Result};

/// Kronrod abscissae on [-1, 1], non-negative half; odd indices are Gauss nodes.
const XGK: [f64; 8] = [
    0.991455371120812639206854697526329,
    0.949107912342758524526189684047851,
    0.864864423359769072789712788640926,
    0.741531185599394439863864773280788,
    0.586087235467691130294144845693013,
    0.405845151377397166906606412076961,
    0.207784955007898467600689403773245,
    0.000000000000000000000000000000000,
];

const WGK: [f64; 8] = [
    0.022935322010529224963732008058970,
    0.063092092629978553290700663189204,
    0.104790010322250183839876322541518,
    0.140653259715525918745189590510238,
    0.169004726639267902826583426598550,
    0.190350578064785409913256402421014,
    0.204432940075298892414161999234649,
    0.209482141084727828012999174891714,
];

const WG: [f64; 4] = [
    0.129484966168869693270611432679082,
    0.279705391489276667901467771423780,
    0.381830050505118944950369775488975,
    0.417959183673469387755102040816327,
];

/// Result of a numerical integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature<T> {
    /// Integral estimate.
    pub value: T,
    /// Estimated absolute error of `value`.
    pub abs_error: T,
    /// Number of subintervals used.
    pub subdivisions: usize,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

fn gauss_kronrod<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> Segment {
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let f_center = f(center);
    let mut kronrod = WGK[7] * f_center;
    let mut gauss = WG[3] * f_center;
    for j in 0..7 {
        let dx = half * XGK[j];
        let pair = f(center - dx) + f(center + dx);
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    Segment {
        a,
        b,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
    }
}

/// Integrates `f` over the finite interval `[a, b]`.
///
/// Stopping at `max_subdivisions` with the error still above tolerance is
/// not an error: the estimate is returned with its residual and a warning is
/// logged. A non-finite estimate is reported as `Error::Convergence`.
pub fn integrate<F>(f: F, a: f64, b: f64, opts: &SolverOptions) -> Result<Quadrature<f64>>
where
    F: Fn(f64) -> f64,
{
    integrate_between(&f, &[a, b], opts)
}

/// Adaptive integration over consecutive `points`, which start out as the
/// initial subintervals.
fn integrate_between<F>(f: &F, points: &[f64], opts: &SolverOptions) -> Result<Quadrature<f64>>
where
    F: Fn(f64) -> f64,
{
    let mut segments: Vec<Segment> = points
        .windows(2)
        .filter(|w| w[1] > w[0])
        .map(|w| gauss_kronrod(f, w[0], w[1]))
        .collect();

    loop {
        let value: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();

        if !value.is_finite() || !error.is_finite() {
            return Err(Error::Convergence {
                method: "gauss-kronrod",
                iterations: segments.len(),
                last: value,
                residual: error,
            });
        }

        let target = opts.quad_tolerance.max(50.0 * f64::EPSILON * value.abs());
        if error <= target || segments.is_empty() {
            return Ok(Quadrature {
                value,
                abs_error: error,
                subdivisions: segments.len(),
            });
        }

        if segments.len() >= opts.max_subdivisions {
            log::warn!(
                "quadrature stopped at {} subdivisions with residual {} above tolerance {}",
                segments.len(),
                error,
                target
            );
            return Ok(Quadrature {
                value,
                abs_error: error,
                subdivisions: segments.len(),
            });
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, x), (_, y)| x.error.total_cmp(&y.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let seg = segments.swap_remove(worst);
        let mid = 0.5 * (seg.a + seg.b);
        segments.push(gauss_kronrod(f, seg.a, mid));
        segments.push(gauss_kronrod(f, mid, seg.b));
    }
}

/// Integrates `f` over the whole real line.
///
/// Uses the substitution `x = center + scale * t / (1 - t^2)` on `(-1, 1)`,
/// so `center` and `scale` should describe where the mass of `f` lies.
pub fn integrate_real_line<F>(
    f: F,
    center: f64,
    scale: f64,
    opts: &SolverOptions,
) -> Result<Quadrature<f64>>
where
    F: Fn(f64) -> f64,
{
    integrate_real_line_with_breaks(f, center, scale, &[], opts)
}

/// Like [`integrate_real_line`], with the initial subintervals split at
/// `breaks`. Placing breaks at narrow features of `f` keeps them from
/// falling between quadrature nodes.
pub fn integrate_real_line_with_breaks<F>(
    f: F,
    center: f64,
    scale: f64,
    breaks: &[f64],
    opts: &SolverOptions,
) -> Result<Quadrature<f64>>
where
    F: Fn(f64) -> f64,
{
    let scale = if scale > 0.0 && scale.is_finite() { scale } else { 1.0 };
    let transformed = |t: f64| {
        let u = 1.0 - t * t;
        if u <= 0.0 {
            return 0.0;
        }
        let x = center + scale * t / u;
        if !x.is_finite() {
            return 0.0;
        }
        let fx = f(x);
        if fx == 0.0 {
            return 0.0;
        }
        fx * scale * (1.0 + t * t) / (u * u)
    };

    let mut points = vec![-1.0, 1.0];
    points.extend(
        breaks
            .iter()
            .filter(|b| b.is_finite())
            .map(|&b| {
                // inverse of the substitution, in its cancellation-free form
                let y = (b - center) / scale;
                2.0 * y / (1.0 + (1.0 + 4.0 * y * y).sqrt())
            })
            .filter(|t| t.abs() < 1.0),
    );
    points.sort_by(f64::total_cmp);
    points.dedup();

    integrate_between(&transformed, &points, opts)
}
