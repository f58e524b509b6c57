//! Kernel density estimation and peak detection, used to seed fits.

use crate::config::SolverOptions;
use crate::dist::BiNormal;
use crate::error::{Error, Result};
use crate::num::{cast, Real};
use ndarray::Array1;
use std::cmp::Ordering;

/// Beyond this many bandwidths the Gaussian kernel is treated as zero.
const GAUSSIAN_CUTOFF: f64 = 6.0;

/// Grid padding on each side of the sample range, in bandwidths.
const GRID_PADDING: f64 = 4.0;

/// A Gaussian kernel density estimate evaluated on an even grid.
#[derive(Debug, Clone)]
pub struct Kde<T: Real> {
    pub grid: Array1<T>,
    pub density: Array1<T>,
    pub bandwidth: T,
}

/// Local maxima of a signal as parallel sequences, sorted by descending
/// prominence.
#[derive(Debug, Clone, PartialEq)]
pub struct Peaks<T: Real> {
    pub indices: Vec<usize>,
    pub heights: Array1<T>,
    pub prominences: Array1<T>,
}

impl<T: Real> Peaks<T> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Peaks of a kernel density estimate.
#[derive(Debug, Clone)]
pub struct KdePeaks<T: Real> {
    pub kde: Kde<T>,
    pub peaks: Peaks<T>,
}

impl<T: Real> KdePeaks<T> {
    /// Peak positions in sample space, in prominence order.
    pub fn locations(&self) -> Array1<T> {
        self.peaks
            .indices
            .iter()
            .map(|&i| self.kde.grid[i])
            .collect()
    }
}

fn positive_std<T: Real>(sample: &Array1<T>) -> Option<T> {
    if sample.len() < 2 {
        return None;
    }
    let s = sample.std(T::one());
    (s > T::zero() && s.is_finite()).then_some(s)
}

/// Sample standard deviation, or 1 when it cannot be computed.
fn sample_std<T: Real>(sample: &Array1<T>) -> T {
    positive_std(sample).unwrap_or_else(T::one)
}

/// Silverman's rule of thumb: `h = 1.06 * σ * n^(-1/5)`.
pub fn silverman_bandwidth<T: Real>(sample: &Array1<T>) -> Result<T> {
    if sample.is_empty() {
        return Err(Error::EmptySample);
    }
    let n: T = cast(sample.len() as f64);
    Ok(cast::<T>(1.06) * sample_std(sample) * n.powf(cast(-0.2)))
}

/// Gaussian KDE over `[min - 4h, max + 4h]` on `opts.kde_points` points.
pub fn kde<T: Real>(sample: &Array1<T>, opts: &SolverOptions) -> Result<Kde<T>> {
    opts.validate()?;
    let h = silverman_bandwidth(sample)?;
    let lo = sample.iter().fold(T::infinity(), |a, &b| a.min(b));
    let hi = sample.iter().fold(T::neg_infinity(), |a, &b| a.max(b));
    let pad = h * cast(GRID_PADDING);
    let grid = Array1::linspace(lo - pad, hi + pad, opts.kde_points);

    let half: T = cast(0.5);
    let cutoff: T = cast(GAUSSIAN_CUTOFF);
    let n: T = cast(sample.len() as f64);
    let norm = T::one() / (n * h * cast(std::f64::consts::TAU.sqrt()));

    let density = grid.mapv(|g| {
        sample.iter().fold(T::zero(), |acc, &x| {
            let u = (g - x) / h;
            if u.abs() > cutoff {
                acc
            } else {
                acc + (-half * u * u).exp()
            }
        }) * norm
    });

    Ok(Kde {
        grid,
        density,
        bandwidth: h,
    })
}

/// Height of `signal[peak]` above the higher of the two lowest points that
/// separate it from a taller point (or the signal edge) on either side.
fn prominence<T: Real>(signal: &Array1<T>, peak: usize) -> T {
    let height = signal[peak];
    let left = lowest_before_taller(height, signal.iter().take(peak + 1).rev());
    let right = lowest_before_taller(height, signal.iter().skip(peak));
    height - left.max(right)
}

fn lowest_before_taller<'a, T: Real>(height: T, values: impl Iterator<Item = &'a T>) -> T {
    let mut low = height;
    for &v in values {
        if v > height {
            break;
        }
        low = low.min(v);
    }
    low
}

/// Finds the interior local maxima of `signal` and ranks them by
/// prominence, keeping at most `n` (all when `None`).
///
/// Flat peaks are reported at the middle of the plateau. Ties keep the
/// order of discovery.
pub fn maxes<T: Real>(signal: &Array1<T>, n: Option<usize>) -> Peaks<T> {
    let len = signal.len();
    let mut found: Vec<(usize, T, T)> = Vec::new();

    let mut i = 1;
    while i + 1 < len {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < len - 1 && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                let peak = (i + ahead - 1) / 2;
                found.push((peak, signal[peak], prominence(signal, peak)));
                i = ahead;
            }
        }
        i += 1;
    }

    found.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));
    if let Some(n) = n {
        found.truncate(n);
    }

    Peaks {
        indices: found.iter().map(|p| p.0).collect(),
        heights: found.iter().map(|p| p.1).collect(),
        prominences: found.iter().map(|p| p.2).collect(),
    }
}

/// `maxes` applied to the KDE of `sample`.
pub fn kde_maxes<T: Real>(
    sample: &Array1<T>,
    n: Option<usize>,
    opts: &SolverOptions,
) -> Result<KdePeaks<T>> {
    let kde = kde(sample, opts)?;
    let peaks = maxes(&kde.density, n);
    log::debug!("kde found {} peaks (bandwidth {})", peaks.len(), kde.bandwidth);
    Ok(KdePeaks { kde, peaks })
}

/// Starting point for a likelihood fit.
///
/// The two most prominent KDE peaks give `μ₁` and `μ₂` (a unimodal KDE
/// pairs its peak with the sample mean). Each point is assigned to the
/// nearest center; the share and spread of each group give `λ` and the
/// standard deviations. Components are ordered so that `λ ≥ 1/2`.
pub fn initial_guess<T: Real>(sample: &Array1<T>, opts: &SolverOptions) -> Result<BiNormal<T>> {
    let found = kde_maxes(sample, Some(2), opts)?;
    let mean = sample.mean().ok_or(Error::EmptySample)?;
    let locations = found.locations();
    let (c1, c2) = match locations.len() {
        0 => (mean, mean),
        1 => (locations[0], mean),
        _ => (locations[0], locations[1]),
    };

    let (near1, near2): (Vec<T>, Vec<T>) = sample
        .iter()
        .copied()
        .partition(|&x| (x - c1).abs() <= (x - c2).abs());
    let overall = sample_std(sample);
    let spread = |group: Vec<T>| positive_std(&Array1::from_vec(group)).unwrap_or(overall);

    let n: T = cast(sample.len() as f64);
    let share: T = cast::<T>(near1.len() as f64) / n;
    let (s1, s2) = (spread(near1), spread(near2));

    if share >= cast(0.5) {
        BiNormal::new(share, c1, s1, c2, s2)
    } else {
        BiNormal::new(T::one() - share, c2, s2, c1, s1)
    }
}
