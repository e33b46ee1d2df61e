// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_neighbors::{GridConfig, NeighborGrid};

use rstar::RTree;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_jittered_lattice(n: usize, cell: f64) -> Vec<Point> {
    let mut out = Vec::with_capacity(n * n);
    let mut rng = Rng::new(0x9E37_79B9_7F4A_7C15);
    for y in 0..n {
        for x in 0..n {
            let jitter = (rng.next_f64() - 0.5) * cell * 0.5;
            out.push(Point::new(
                x as f64 * cell + cell * 0.5 + jitter,
                y as f64 * cell + cell * 0.5 - jitter,
            ));
        }
    }
    out
}

fn to_rstar_points(v: &[Point]) -> Vec<[f64; 2]> {
    v.iter().map(|p| [p.x, p.y]).collect()
}

fn bench_rtree_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors_external_compare");
    for &n in &[64usize, 128] {
        let points = gen_jittered_lattice(n, 10.0);
        let extent = n as f64 * 10.0;
        let radius = 15.0;
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("understory_build_query_n{}", n), |b| {
            b.iter_batched(
                || NeighborGrid::new(GridConfig::new(extent, extent, radius)).unwrap(),
                |mut grid| {
                    grid.update(&points);
                    let mut total = 0;
                    for i in 0..points.len() {
                        total += grid.neighbor_count(&points, i, radius);
                    }
                    black_box(total);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_points(&points),
                |pts| {
                    let queries = pts.clone();
                    let tree = RTree::bulk_load(pts);
                    let mut total = 0;
                    for q in &queries {
                        // rstar includes the query point itself.
                        total += tree.locate_within_distance(*q, radius * radius).count() - 1;
                    }
                    black_box(total);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare);
criterion_main!(benches);
