//! Criterion benchmarks for the local search solver.
//!
//! Measures solve time across problem sizes (25, 50, 100 customers) to track
//! performance and detect regressions.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package fleetroute-solver
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fleetroute_core::{EvaluationContext, ObjectiveModel, RouteAssignment, Solver};
use fleetroute_solver::LocalSearchSolver;


use bench_support::{BENCHMARK_SEED, generate_distance_matrix, generate_instance};

/// Problem sizes to benchmark.
const PROBLEM_SIZES: &[usize] = &[25, 50, 100];

/// Benchmark solve times for various problem sizes.
///
/// Inputs are generated outside the measured loop; each iteration runs
/// construction and local search from an empty assignment.
fn bench_solve_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_time");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(10));

    for &size in PROBLEM_SIZES {
        let instance = generate_instance(size, BENCHMARK_SEED);
        let matrix = generate_distance_matrix(&instance);
        let model = ObjectiveModel::new(EvaluationContext::new(&instance, &matrix));
        let solver = LocalSearchSolver::new();

        group.throughput(Throughput::Elements(u64::try_from(size).unwrap_or(u64::MAX)));
        group.bench_with_input(BenchmarkId::new("customers", size), &size, |b, _| {
            b.iter(|| {
                #[expect(
                    clippy::let_underscore_must_use,
                    reason = "Benchmarking solve performance, result is intentionally discarded"
                )]
                let _ = solver.solve(&model, RouteAssignment::empty(instance.vehicles()));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solve_times);
criterion_main!(benches);
