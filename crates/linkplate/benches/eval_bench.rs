//! Criterion benchmarks for pose evaluation and cycle sampling.
//! Focus sizes: hinge chains of depth {1, 4, 16}; samples in {50, 100, 400}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p linkplate

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use linkplate::linkage::{Edit, Linkage};
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Unit crank at the origin followed by `depth` hinges hung from a ground pivot.
fn hinge_chain(depth: usize) -> Linkage {
    let mut l = Linkage::starter();
    let mut prev = "p1".to_string();
    for k in 0..depth {
        let apex = Vector2::new(1.5 + 0.5 * k as f64, 1.2);
        let pivot = Vector2::new(3.0 + k as f64, 0.0);
        if let Ok(Edit::Applied) = l.add_hinge_to_ground(0.0, &prev, pivot, apex) {
            prev = format!("p{}", l.n - 1);
        }
    }
    l
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for &depth in &[1usize, 4, 16] {
        let mech = hinge_chain(depth).mechanism().unwrap();
        group.bench_with_input(BenchmarkId::new("random_theta", depth), &mech, |b, mech| {
            let mut rng = StdRng::seed_from_u64(41);
            b.iter(|| {
                let theta = rng.gen_range(0.0..std::f64::consts::TAU);
                let _pose = mech.evaluate(theta);
            })
        });
    }
    group.finish();
}

fn bench_traces(c: &mut Criterion) {
    let mut group = c.benchmark_group("traces");
    let mech = hinge_chain(4).mechanism().unwrap();
    for &n in &[50usize, 100, 400] {
        group.bench_with_input(BenchmarkId::new("hinge_chain_4", n), &n, |b, &n| {
            b.iter(|| {
                let _traces = mech.traces(n);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_traces);
criterion_main!(benches);
