//! End-to-end properties of the annealing runner.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_portfolio::anneal::{AnnealConfig, AnnealRunner, DEFAULT_TARGET_RETURN};
use u_portfolio::objective::{portfolio_return, Evaluation, Objective, PortfolioModel};
use u_portfolio::Result;

const RETURNS: [f64; 10] = [
    21.22, 41.75, 27.13, 0.81, 5.33, 6.68, 34.69, 18.5, 41.9, 23.81,
];
const RISKS: [f64; 10] = [
    25.93, 25.47, 20.98, 19.98, 25.96, 24.02, 28.0, 31.38, 25.23, 27.03,
];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Panics if any evaluated weight vector leaves the simplex.
struct SimplexChecked(PortfolioModel);

impl Objective for SimplexChecked {
    fn num_assets(&self) -> usize {
        self.0.num_assets()
    }

    fn evaluate(&self, weights: &[f64]) -> Result<Evaluation> {
        let sum: f64 = weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "weights sum to {sum}");
        assert!(weights.iter().all(|&w| w >= 0.0), "negative weight in {weights:?}");
        self.0.evaluate(weights)
    }
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-12, "{a} != {b}");
}

#[test]
fn min_risk_two_assets_end_to_end() {
    init_tracing();
    let model = PortfolioModel::synthetic(vec![10.0, 20.0]).unwrap();
    let config = AnnealConfig::min_risk()
        .with_restarts(50)
        .with_iterations(50)
        .with_cooling_rate(0.01)
        .with_initial_temperature(100.0)
        .with_seed(2024);

    let result = AnnealRunner::run(&model, &config).unwrap();

    assert_eq!(result.weights.len(), 2);
    let sum: f64 = result.weights.iter().sum();
    assert!((sum - 1.0).abs() < 1e-9, "rounded weights sum to {sum}");
    assert!(result.best.risk <= result.initial.risk);
    assert_eq!(result.iterations, 2500);
    assert_eq!(result.restarts, 50);
    // the lower-return asset also has the lower synthetic variance
    assert!(result.exact_weights[0] > result.exact_weights[1]);
}

#[test]
fn single_asset_is_fully_invested_for_every_variant() {
    init_tracing();
    let synthetic = PortfolioModel::synthetic(vec![12.5]).unwrap();
    let independent = PortfolioModel::with_risks(vec![12.5], vec![30.0]).unwrap();

    for iterations in [0, 1, 200] {
        let max = AnnealRunner::run(
            &synthetic,
            &AnnealConfig::max_return().with_iterations(iterations).with_seed(1),
        )
        .unwrap();
        assert_eq!(max.weights, vec![1.0]);
        assert_close(max.best.portfolio_return, 12.5);
        assert_close(max.best.risk, 0.125);

        let min = AnnealRunner::run(
            &synthetic,
            &AnnealConfig::min_risk()
                .with_restarts(3)
                .with_iterations(iterations)
                .with_seed(1),
        )
        .unwrap();
        assert_eq!(min.weights, vec![1.0]);
        assert_close(min.best.risk, 0.125);

        let floor = AnnealRunner::run(
            &independent,
            &AnnealConfig::min_risk_with_floor(DEFAULT_TARGET_RETURN)
                .with_iterations(iterations)
                .with_seed(1),
        )
        .unwrap();
        assert_eq!(floor.weights, vec![1.0]);
        assert_close(floor.best.portfolio_return, 12.5);
        assert_close(floor.best.risk, 30.0);
        assert!(!floor.feasible);
    }
}

#[test]
fn fixed_seed_is_reproducible() {
    let model = PortfolioModel::with_risks(RETURNS.to_vec(), RISKS.to_vec()).unwrap();
    let config = AnnealConfig::min_risk_with_floor(15.0).with_seed(99);
    let a = AnnealRunner::run(&model, &config).unwrap();
    let b = AnnealRunner::run(&model, &config).unwrap();
    assert_eq!(a, b);

    let mut r1 = StdRng::seed_from_u64(5);
    let mut r2 = StdRng::seed_from_u64(5);
    let config = AnnealConfig::max_return();
    let a = AnnealRunner::run_with_rng(&model, &config, &mut r1).unwrap();
    let b = AnnealRunner::run_with_rng(&model, &config, &mut r2).unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_seeds_explore_differently() {
    let model = PortfolioModel::synthetic(RETURNS.to_vec()).unwrap();
    let a = AnnealRunner::run(&model, &AnnealConfig::max_return().with_seed(1)).unwrap();
    let b = AnnealRunner::run(&model, &AnnealConfig::max_return().with_seed(2)).unwrap();
    assert_ne!(a.exact_weights, b.exact_weights);
}

#[test]
fn supplied_covariance_is_used() {
    use u_portfolio::objective::CovarianceMatrix;

    let cov = CovarianceMatrix::new(vec![vec![0.04, 0.0], vec![0.0, 0.01]]).unwrap();
    let model = PortfolioModel::with_covariance(vec![10.0, 20.0], cov).unwrap();
    let config = AnnealConfig::min_risk()
        .with_restarts(20)
        .with_iterations(100)
        .with_seed(8);
    let result = AnnealRunner::run(&model, &config).unwrap();
    // minimum-variance mix of independent assets weights 0.2 / 0.8
    assert!(result.exact_weights[1] > result.exact_weights[0]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_every_evaluated_state_is_on_simplex(seed in any::<u64>(), variant in 0usize..3) {
        let config = match variant {
            0 => AnnealConfig::max_return().with_iterations(200),
            1 => AnnealConfig::min_risk().with_restarts(5).with_iterations(40),
            _ => AnnealConfig::min_risk_with_floor(15.0).with_iterations(200),
        }
        .with_history_interval(1)
        .with_seed(seed);
        let model = if variant == 2 {
            PortfolioModel::with_risks(RETURNS.to_vec(), RISKS.to_vec()).unwrap()
        } else {
            PortfolioModel::synthetic(RETURNS.to_vec()).unwrap()
        };

        let result = AnnealRunner::run(&SimplexChecked(model), &config).unwrap();

        let history = &result.cost_history;
        for w in history.windows(2) {
            if variant == 0 {
                prop_assert!(w[1] >= w[0]);
            } else {
                prop_assert!(w[1] <= w[0]);
            }
        }
        if variant == 2 && result.accepted_moves > 0 {
            prop_assert!(result.feasible);
            prop_assert!(result.best.portfolio_return >= 15.0);
        }
    }

    #[test]
    fn prop_return_is_linear(
        raw1 in prop::collection::vec(0.01f64..1.0, 10),
        raw2 in prop::collection::vec(0.01f64..1.0, 10),
        a in 0.0f64..=1.0,
    ) {
        let normalize = |v: Vec<f64>| {
            let s: f64 = v.iter().sum();
            v.into_iter().map(|x| x / s).collect::<Vec<f64>>()
        };
        let w1 = normalize(raw1);
        let w2 = normalize(raw2);
        let b = 1.0 - a;
        let mix: Vec<f64> = w1.iter().zip(&w2).map(|(x, y)| a * x + b * y).collect();

        let lhs = portfolio_return(&mix, &RETURNS).unwrap();
        let rhs = a * portfolio_return(&w1, &RETURNS).unwrap()
            + b * portfolio_return(&w2, &RETURNS).unwrap();
        prop_assert!((lhs - rhs).abs() < 1e-9);
    }
}
