//! Criterion benchmarks for the plane layering search.
//! Focus sizes: plate rings of n in {4, 6, 8} with seeded random collisions.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use linkplate::layering::{layer_plates, LayerCfg};
use linkplate::plates::{PlateGraph, PlateId};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_ring(n: usize, seed: u64) -> PlateGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = PlateGraph::empty(n);
    for i in 0..n {
        g.connect(PlateId(i), PlateId((i + 1) % n));
    }
    for i in 0..n {
        for j in (i + 2)..n {
            if !g.connected(PlateId(i), PlateId(j)) && rng.gen_bool(0.3) {
                g.intersect(PlateId(i), PlateId(j));
            }
        }
        if rng.gen_bool(0.2) {
            let k = rng.gen_range(0..n);
            if k != i && (k + 1) % n != i {
                g.pass_thru(PlateId(i), [PlateId(k), PlateId((k + 1) % n)]);
            }
        }
    }
    g
}

fn bench_layering(c: &mut Criterion) {
    let mut group = c.benchmark_group("layering");
    for &n in &[4usize, 6, 8] {
        group.bench_with_input(BenchmarkId::new("ring", n), &n, |b, &n| {
            b.iter_batched(
                || random_ring(n, 43),
                |g| {
                    let _res = layer_plates(&g, &LayerCfg::default());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("ring_all_optima", n), &n, |b, &n| {
            let cfg = LayerCfg {
                enumerate_ties: true,
                ..LayerCfg::default()
            };
            b.iter_batched(
                || random_ring(n, 44),
                |g| {
                    let _res = layer_plates(&g, &cfg);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layering);
criterion_main!(benches);
