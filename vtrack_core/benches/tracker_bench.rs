use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use vtrack_core::{
    cost_matrix::CostMatrix, hungarian::HungarianSolver, FeatureVec, VectorTracker,
    VectorTrackerConfig,
};

/// `n` points on a ring of radius 10000, jittered by up to `jitter`.
fn make_frame(n: usize, jitter: f64, rng: &mut ChaCha8Rng) -> Vec<FeatureVec> {
    (0..n)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / n as f64;
            let r = 10000.0_f64;
            FeatureVec::from_vec(vec![
                r * angle.cos() + rng.gen_range(-jitter..=jitter),
                r * angle.sin() + rng.gen_range(-jitter..=jitter),
            ])
        })
        .collect()
}

fn bench_tracker(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracker");

    for n in [10, 100, 500] {
        for try_opt in [true, false] {
            let label = if try_opt { "fast_path" } else { "solver" };
            group.bench_function(format!("{n}_targets_{label}"), |b| {
                let mut rng = ChaCha8Rng::seed_from_u64(42);
                let warmup = make_frame(n, 1.0, &mut rng);
                let frame = make_frame(n, 1.0, &mut rng);
                b.iter(|| {
                    let mut tracker = VectorTracker::new(VectorTrackerConfig {
                        try_opt,
                        distance_threshold: 10.0,
                        ..VectorTrackerConfig::new(2, 1.0e9)
                    })
                    .unwrap();
                    // Warm up with one frame to create targets
                    tracker.push_data(&warmup).unwrap();
                    black_box(tracker.push_data(&frame).unwrap());
                });
            });
        }
    }

    group.finish();
}

fn bench_hungarian(c: &mut Criterion) {
    let mut group = c.benchmark_group("hungarian");
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for n in [16, 64, 256] {
        let values: Vec<f64> = (0..n * n).map(|_| rng.gen_range(0.0..1000.0)).collect();
        let cost = CostMatrix::from_row_slice(n, &values);
        let mut solver = HungarianSolver::new();
        group.bench_function(format!("{n}x{n}"), |b| {
            b.iter(|| black_box(solver.solve(&cost).len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tracker, bench_hungarian);
criterion_main!(benches);
