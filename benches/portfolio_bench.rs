//! Criterion benchmarks for the portfolio annealing presets.
//!
//! Uses synthetic return/risk vectors so timings reflect loop overhead and
//! objective evaluation cost only.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_portfolio::anneal::{AnnealConfig, AnnealRunner, SimplexProjection};
use u_portfolio::objective::PortfolioModel;

fn synthetic_returns(n: usize) -> Vec<f64> {
    (0..n).map(|i| 5.0 + (i as f64 * 7.3) % 40.0).collect()
}

fn synthetic_risks(n: usize) -> Vec<f64> {
    (0..n).map(|i| 18.0 + (i as f64 * 3.1) % 15.0).collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_max_return(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_return");
    group.sample_size(10);

    for &n in &[10, 50, 100] {
        let model = PortfolioModel::synthetic(synthetic_returns(n)).unwrap();
        let config = AnnealConfig::max_return().with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(model, config), |b, (m, c)| {
            b.iter(|| {
                let result = AnnealRunner::run(black_box(m), black_box(c));
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_min_risk(c: &mut Criterion) {
    let mut group = c.benchmark_group("min_risk");
    group.sample_size(10);

    for (n, restarts, steps) in [(10usize, 100usize, 100usize), (10, 1000, 1000), (50, 100, 100)] {
        let model = PortfolioModel::synthetic(synthetic_returns(n)).unwrap();
        let config = AnnealConfig::min_risk()
            .with_restarts(restarts)
            .with_iterations(steps)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_r{}_s{}", n, restarts, steps), n),
            &(model, config),
            |b, (m, c)| {
                b.iter(|| {
                    let result = AnnealRunner::run(black_box(m), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_return_floor(c: &mut Criterion) {
    let mut group = c.benchmark_group("return_floor");
    group.sample_size(10);

    for projection in [SimplexProjection::ClampRescale, SimplexProjection::Euclidean] {
        let model = PortfolioModel::with_risks(synthetic_returns(50), synthetic_risks(50)).unwrap();
        let config = AnnealConfig::min_risk_with_floor(15.0)
            .with_projection(projection)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{projection:?}")),
            &(model, config),
            |b, (m, c)| {
                b.iter(|| {
                    let result = AnnealRunner::run(black_box(m), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_max_return, bench_min_risk, bench_return_floor);
criterion_main!(benches);
