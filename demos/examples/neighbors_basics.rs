// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory Neighbors: build a grid, query, move a point, rebuild.
//!
//! Run:
//! - `cargo run -p understory_demos --example neighbors_basics`

use kurbo::Point;
use understory_neighbors::{GridConfig, NeighborGrid, PositionStore};

fn main() {
    let mut store = PositionStore::new();
    store.push(Point::new(5.0, 5.0));
    store.push(Point::new(15.0, 5.0));
    store.push(Point::new(95.0, 95.0));

    let config = GridConfig::new(100.0, 100.0, 10.0);
    let mut grid = match NeighborGrid::from_positions(config, &store) {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("bad grid config: {err}");
            return;
        }
    };
    println!("{grid:?}");

    for n in grid.nearest_neighbors(&store, 0, 12.0) {
        println!(
            "neighbor of 0: {} at {:?} (d = {:.2})",
            n.index,
            n.direction,
            n.distance()
        );
    }

    // Move point 2 next to point 0 and rebuild.
    store.set(2, Point::new(8.0, 9.0));
    println!("stale after move: {}", grid.is_stale(&store));
    grid.update(&store);

    let hits: Vec<_> = grid
        .nearest_neighbors(&store, 0, 12.0)
        .map(|n| n.index)
        .collect();
    println!("neighbors of 0 after rebuild: {hits:?}");

    // A zero spacing is rejected up front.
    if let Err(err) = NeighborGrid::new(GridConfig::new(100.0, 100.0, 0.0)) {
        println!("rejected: {err}");
    }
}
