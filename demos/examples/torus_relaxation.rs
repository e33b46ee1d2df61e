// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Relax a random point set on a torus by short-range repulsion.
//!
//! Each frame rebuilds the grid, pushes every point away from its neighbors,
//! and blends toward the pushed position. The minimum pairwise distance grows
//! as the points spread into an even, seamless distribution.
//!
//! Run:
//! - `cargo run -p understory_demos --example torus_relaxation`

use kurbo::{Point, Vec2};
use understory_neighbors::{GridConfig, NeighborGrid, PositionStore};

const SIZE: f64 = 256.0;
const COUNT: usize = 2000;
const FRAMES: usize = 40;

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

fn main() {
    let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
    let mut store: PositionStore = (0..COUNT)
        .map(|_| Point::new(rng.next_f64() * SIZE, rng.next_f64() * SIZE))
        .collect();

    // Radius of a disc holding one point on average, doubled.
    let radius = 2.0 * (SIZE * SIZE / (COUNT as f64 * std::f64::consts::PI)).sqrt();
    let config = GridConfig::new(SIZE, SIZE, radius).with_wrap(true);
    let mut grid = NeighborGrid::new(config).expect("valid grid config");

    let mut targets = Vec::with_capacity(COUNT);
    for frame in 0..FRAMES {
        grid.update(&store);

        targets.clear();
        let mut closest = f64::INFINITY;
        for i in 0..store.len() {
            let mut push = Vec2::ZERO;
            for n in grid.nearest_neighbors(&store, i, radius) {
                closest = closest.min(n.distance_squared);
                let d = n.distance().max(1e-6);
                // Linear falloff: full push at contact, none at the radius.
                push -= n.direction / d * (radius - d);
            }
            let p = store.get(i).unwrap_or(Point::ZERO);
            targets.push(p + push * 0.25);
        }

        for (p, target) in store.points_mut().iter_mut().zip(&targets) {
            let next = p.lerp(*target, 0.5);
            *p = Point::new(next.x.rem_euclid(SIZE), next.y.rem_euclid(SIZE));
        }

        if frame % 10 == 0 || frame + 1 == FRAMES {
            println!("frame {frame:>3}: min neighbor distance {:.3}", closest.sqrt());
        }
    }

    let first = store.get(0).unwrap_or(Point::ZERO);
    println!("point 0 settled near {:?}", first.round());
}
