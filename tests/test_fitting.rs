//! Tests for log-likelihood evaluation, its gradient and KDE seeding.

use approx::assert_relative_eq;
use binormal::fitting::{initial_guess, kde_maxes, LogLikelihood};
use binormal::{
    gradient_log_likelihood, log_likelihood, BiNormal, DistributionMethods, Error, SolverOptions,
};
use ndarray::{array, Array1};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn mixture_sample(d: &BiNormal, n: usize, seed: u64) -> Array1<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    d.sample_mixture_n(n, &mut rng)
}

// ============================================================================
// Log-likelihood
// ============================================================================

#[test]
fn test_log_likelihood_single_point_is_logpdf() {
    let d = BiNormal::new(0.7, 0.0, 1.0, 3.0, 0.5).unwrap();
    let sample = array![1.3];
    assert_eq!(log_likelihood(&d, &sample), d.logpdf(1.3));
}

#[test]
fn test_log_likelihood_of_empty_sample_is_zero() {
    let d = BiNormal::new(0.7, 0.0, 1.0, 3.0, 0.5).unwrap();
    let sample = Array1::<f64>::zeros(0);
    assert_eq!(log_likelihood(&d, &sample), 0.0);
    let grad = gradient_log_likelihood(&d, &sample).unwrap();
    assert_eq!(grad, Array1::<f64>::zeros(5));
}

#[test]
fn test_log_likelihood_is_additive() {
    let d = BiNormal::new(0.6, -1.0, 0.8, 2.0, 1.5).unwrap();
    let sample: Array1<f64> = array![-2.0, -0.5, 0.3, 1.9, 4.0];
    let expected: f64 = sample.iter().map(|&x| d.pdf(x).ln()).sum();
    assert_relative_eq!(log_likelihood(&d, &sample), expected, epsilon = 1e-12);
}

// ============================================================================
// Gradient
// ============================================================================

#[test]
fn test_gradient_matches_finite_differences() {
    let truth = BiNormal::new(0.7, 0.0, 1.0, 3.0, 0.5).unwrap();
    let sample = mixture_sample(&truth, 50, 7);
    let ll = LogLikelihood::new(&sample);

    // evaluate away from the generating parameters so the gradient is not ~0
    let params = array![0.65, 0.2, 1.1, 2.8, 0.6];
    let (value, grad) = ll.value_and_gradient(&params).unwrap();
    assert_relative_eq!(value, ll.value(&params).unwrap(), epsilon = 1e-12);
    assert_eq!(grad, ll.gradient(&params).unwrap());

    let h = 1e-6;
    for i in 0..5 {
        let mut up = params.clone();
        let mut down = params.clone();
        up[i] += h;
        down[i] -= h;
        let numeric = (ll.value(&up).unwrap() - ll.value(&down).unwrap()) / (2.0 * h);
        assert_relative_eq!(grad[i], numeric, epsilon = 1e-4, max_relative = 1e-5);
    }
}

#[test]
fn test_gradient_with_unit_weight_ignores_second_component() {
    let d = BiNormal::new(1.0, 0.5, 2.0, 10.0, 1.0).unwrap();
    let sample = array![0.0, 1.0, 2.5];
    let grad = gradient_log_likelihood(&d, &sample).unwrap();

    let z: Vec<f64> = sample.iter().map(|&x| (x - 0.5) / 2.0).collect();
    let d_mu: f64 = z.iter().map(|z| z / 2.0).sum();
    let d_sigma: f64 = z.iter().map(|z| (z * z - 1.0) / 2.0).sum();
    assert_relative_eq!(grad[1], d_mu, epsilon = 1e-12);
    assert_relative_eq!(grad[2], d_sigma, epsilon = 1e-12);
    assert_eq!(grad[3], 0.0);
    assert_eq!(grad[4], 0.0);
}

#[test]
fn test_gradient_reports_vanishing_density() {
    let d = BiNormal::new(0.7, 0.0, 0.01, 0.0, 0.01).unwrap();
    let sample = array![0.0, 100.0];
    match gradient_log_likelihood(&d, &sample) {
        Err(Error::NumericalInstability { index, x, density }) => {
            assert_eq!(index, 1);
            assert_eq!(x, 100.0);
            assert_eq!(density, 0.0);
        }
        other => panic!("expected NumericalInstability, got {:?}", other),
    }
}

#[test]
fn test_parameter_vector_is_validated() {
    let sample = array![0.0, 1.0];
    let ll = LogLikelihood::new(&sample);
    assert_eq!(
        ll.value(&array![0.7, 0.0, 1.0, 1.0]).unwrap_err(),
        Error::InvalidParameterVector {
            expected: 5,
            got: 4
        }
    );
    assert_eq!(
        ll.gradient(&array![0.2, 0.0, 1.0, 1.0, 1.0]).unwrap_err(),
        Error::InvalidWeight(0.2)
    );
    assert!(matches!(
        ll.value_and_gradient(&array![0.7, 0.0, -1.0, 1.0, 1.0]),
        Err(Error::InvalidComponent { .. })
    ));
}

#[test]
fn test_invalid_options_are_rejected() {
    let d = BiNormal::new(0.7, 0.0, 1.0, 3.0, 0.5).unwrap();
    let sample = array![0.0];
    let ll = LogLikelihood::new(&sample)
        .with_options(SolverOptions::default().with_min_density(-1.0));
    assert!(matches!(
        ll.gradient(&array![0.7, 0.0, 1.0, 3.0, 0.5]),
        Err(Error::InvalidOptions(_))
    ));
    assert!(binormal::fitting::gradient_log_likelihood_with(
        &d,
        &sample,
        &SolverOptions::default()
    )
    .is_ok());
}

// ============================================================================
// KDE peaks and initial guess
// ============================================================================

#[test]
fn test_kde_maxes_finds_both_components() {
    let truth = BiNormal::new(0.6, -4.0, 1.0, 4.0, 1.0).unwrap();
    let sample = mixture_sample(&truth, 2000, 11);
    let found = kde_maxes(&sample, Some(2), &SolverOptions::default()).unwrap();

    let locations = found.locations();
    assert_eq!(locations.len(), 2);
    // the heavier component is the more prominent peak
    assert!((locations[0] + 4.0).abs() < 0.4, "first peak at {}", locations[0]);
    assert!((locations[1] - 4.0).abs() < 0.4, "second peak at {}", locations[1]);
    assert!(found.peaks.prominences[0] >= found.peaks.prominences[1]);
    assert!(found.kde.bandwidth > 0.0);
}

#[test]
fn test_initial_guess_recovers_separated_components() {
    let truth = BiNormal::new(0.6, -4.0, 1.0, 4.0, 1.0).unwrap();
    let sample = mixture_sample(&truth, 2000, 11);
    let guess = initial_guess(&sample, &SolverOptions::default()).unwrap();

    let (l, m1, s1, m2, s2) = guess.params();
    assert_relative_eq!(l, 0.6, epsilon = 0.05);
    assert_relative_eq!(m1, -4.0, epsilon = 0.4);
    assert_relative_eq!(m2, 4.0, epsilon = 0.4);
    assert_relative_eq!(s1, 1.0, epsilon = 0.1);
    assert_relative_eq!(s2, 1.0, epsilon = 0.1);
}

#[test]
fn test_initial_guess_orders_heavier_component_first() {
    // the narrow minority component has the taller peak
    let truth = BiNormal::new(0.7, 0.0, 3.0, 8.0, 0.3).unwrap();
    let sample = mixture_sample(&truth, 2000, 3);
    let guess = initial_guess(&sample, &SolverOptions::default()).unwrap();

    let (l, m1, s1, m2, s2) = guess.params();
    assert!(l >= 0.5);
    assert!(s1 > s2);
    assert!(m1.abs() < 0.8, "wide component at {}", m1);
    assert!((m2 - 8.0).abs() < 0.4, "narrow component at {}", m2);
}

#[test]
fn test_initial_guess_on_unimodal_sample() {
    let truth = BiNormal::new(1.0, 0.0, 1.0, 0.0, 1.0).unwrap();
    let sample = mixture_sample(&truth, 1000, 5);
    let guess = initial_guess(&sample, &SolverOptions::default()).unwrap();
    assert!(guess.weight() >= 0.5 && guess.weight() <= 1.0);
    assert!(guess.mean().abs() < 0.5);
}

#[test]
fn test_initial_guess_of_empty_sample_fails() {
    let sample = Array1::<f64>::zeros(0);
    assert_eq!(
        initial_guess(&sample, &SolverOptions::default()).unwrap_err(),
        Error::EmptySample
    );
}
