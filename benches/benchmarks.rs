//! Benchmarks for the numerically solved BiNormal functionals and the
//! fitting helpers.
//!
//! Run with: cargo bench
//! Or for specific benchmarks: cargo bench -- quantile

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ndarray::Array1;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::SeedableRng;
use rand::rngs::StdRng;

use binormal::fitting::{gradient_log_likelihood, kde_maxes};
use binormal::{BiNormal, DistributionMethods, SolverOptions};

// ============================================================================
// Data Generation Utilities
// ============================================================================

fn bimodal() -> BiNormal {
    BiNormal::new(0.7, 0.0, 1.0, 3.0, 0.5).unwrap()
}

fn generate_sample(n: usize) -> Array1<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    bimodal().sample_mixture_n(n, &mut rng)
}

/// Uniform probabilities away from the extreme tails.
fn generate_probabilities(n: usize) -> Array1<f64> {
    Array1::random(n, Uniform::new(0.001, 0.999).unwrap())
}

// ============================================================================
// Closed-form vs solved functionals
// ============================================================================

fn bench_density(c: &mut Criterion) {
    let d = bimodal();
    let xs = Array1::linspace(-5.0, 8.0, 1000);

    let mut group = c.benchmark_group("density");
    group.throughput(Throughput::Elements(xs.len() as u64));
    group.bench_function("pdf", |b| {
        b.iter(|| xs.iter().map(|&x| d.pdf(black_box(x))).sum::<f64>())
    });
    group.bench_function("logpdf", |b| {
        b.iter(|| xs.iter().map(|&x| d.logpdf(black_box(x))).sum::<f64>())
    });
    group.bench_function("cdf", |b| {
        b.iter(|| xs.iter().map(|&x| d.cdf(black_box(x))).sum::<f64>())
    });
    group.finish();
}

fn bench_quantile(c: &mut Criterion) {
    let d = bimodal();
    let qs = generate_probabilities(100);

    let mut group = c.benchmark_group("quantile");
    group.throughput(Throughput::Elements(qs.len() as u64));
    group.bench_function("newton", |b| {
        b.iter(|| {
            qs.iter()
                .map(|&q| d.quantile(black_box(q)).unwrap_or(f64::NAN))
                .sum::<f64>()
        })
    });
    group.finish();

    c.bench_function("median", |b| b.iter(|| black_box(&d).median()));
}

fn bench_entropy(c: &mut Criterion) {
    let mut group = c.benchmark_group("entropy");
    for tol in [1e-6, 1e-10] {
        let opts = SolverOptions::default().with_quad_tolerance(tol);
        group.bench_with_input(BenchmarkId::new("quad_tolerance", tol), &opts, |b, opts| {
            b.iter(|| bimodal().entropy_with(black_box(opts)))
        });
    }
    group.finish();
}

// ============================================================================
// Fitting
// ============================================================================

fn bench_gradient(c: &mut Criterion) {
    let d = bimodal();
    let mut group = c.benchmark_group("gradient_log_likelihood");
    for n in [100, 1_000, 10_000] {
        let sample = generate_sample(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &sample, |b, sample| {
            b.iter(|| gradient_log_likelihood(black_box(&d), sample))
        });
    }
    group.finish();
}

fn bench_kde_maxes(c: &mut Criterion) {
    let opts = SolverOptions::default();
    let mut group = c.benchmark_group("kde_maxes");
    group.sample_size(20);
    for n in [500, 5_000] {
        let sample = generate_sample(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &sample, |b, sample| {
            b.iter(|| kde_maxes(black_box(sample), Some(2), &opts))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_density,
    bench_quantile,
    bench_entropy,
    bench_gradient,
    bench_kde_maxes
);
criterion_main!(benches);
