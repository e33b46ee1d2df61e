// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_neighbors::{GridConfig, NeighborGrid, PositionStore};

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

fn gen_uniform_points(count: usize, w: f64, h: f64) -> Vec<Point> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| Point::new(rng.next_f64() * w, rng.next_f64() * h))
        .collect()
}

fn gen_clustered_points(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Point> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 1000.0, rng.next_f64() * 1000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Point::new(
                (cx + dx).clamp(0.0, 999.9),
                (cy + dy).clamp(0.0, 999.9),
            ));
        }
    }
    out
}

fn brute_force_count(points: &[Point], i: usize, r: f64) -> usize {
    let r2 = r * r;
    let p = points[i];
    points
        .iter()
        .enumerate()
        .filter(|&(j, q)| j != i && (*q - p).hypot2() <= r2)
        .count()
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");
    for &n in &[1_000usize, 10_000, 100_000] {
        let points = gen_uniform_points(n, 1000.0, 1000.0);
        let mut grid = NeighborGrid::new(GridConfig::new(1000.0, 1000.0, 10.0)).unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("update_n{}", n), |b| {
            b.iter(|| {
                grid.update(black_box(&points));
                black_box(grid.cell_start()[0]);
            })
        });
    }
    group.finish();
}

fn bench_query_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_all");
    for &n in &[1_000usize, 10_000] {
        let points = gen_uniform_points(n, 1000.0, 1000.0);
        group.throughput(Throughput::Elements(n as u64));
        for wrap in [false, true] {
            let cfg = GridConfig::new(1000.0, 1000.0, 10.0).with_wrap(wrap);
            let mut grid = NeighborGrid::from_positions(cfg, &points).unwrap();
            group.bench_function(format!("grid_wrap{}_n{}", wrap, n), |b| {
                b.iter(|| {
                    let mut total = 0;
                    for i in 0..points.len() {
                        total += grid.neighbor_count(&points, i, 10.0);
                    }
                    black_box(total);
                })
            });
        }
        if n <= 1_000 {
            group.bench_function(format!("brute_force_n{}", n), |b| {
                b.iter(|| {
                    let mut total = 0;
                    for i in 0..points.len() {
                        total += brute_force_count(&points, i, 10.0);
                    }
                    black_box(total);
                })
            });
        }
    }
    group.finish();
}

fn bench_spacing_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("spacing_sweep");
    let points = gen_uniform_points(10_000, 1000.0, 1000.0);
    for &spacing in &[2.5f64, 5.0, 10.0, 20.0, 40.0] {
        let cfg = GridConfig::new(1000.0, 1000.0, spacing);
        let mut grid = NeighborGrid::from_positions(cfg, &points).unwrap();
        group.bench_function(format!("radius10_spacing{}", spacing), |b| {
            b.iter(|| {
                let mut total = 0;
                for i in (0..points.len()).step_by(10) {
                    total += grid.neighbor_count(&points, i, 10.0);
                }
                black_box(total);
            })
        });
    }
    group.finish();
}

fn bench_frame_clustered(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_clustered");
    let points = gen_clustered_points(16, 512, 64.0);
    group.bench_function("update_then_query_all", |b| {
        b.iter_batched(
            || {
                let store: PositionStore = points.iter().copied().collect();
                let grid = NeighborGrid::new(GridConfig::new(1000.0, 1000.0, 8.0)).unwrap();
                (store, grid)
            },
            |(store, mut grid)| {
                grid.update(&store);
                let mut total = 0;
                for i in 0..store.len() {
                    total += grid.neighbor_count(&store, i, 8.0);
                }
                black_box(total);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_rebuild,
    bench_query_all,
    bench_spacing_sweep,
    bench_frame_clustered,
);
criterion_main!(benches);
