// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Print per-cell occupancy with world-space cell origins, as a debugging view.
//!
//! Run:
//! - `cargo run -p understory_demos --example cell_occupancy`

use kurbo::Point;
use understory_neighbors::{GridConfig, NeighborGrid};

fn main() {
    // A ring of points around the domain center.
    let points: Vec<Point> = (0..64)
        .map(|i| {
            let t = i as f64 / 64.0 * std::f64::consts::TAU;
            Point::new(40.0 + 30.0 * t.cos(), 40.0 + 30.0 * t.sin())
        })
        .collect();

    let grid = NeighborGrid::from_positions(GridConfig::new(80.0, 80.0, 10.0), &points)
        .expect("valid grid config");

    for row in 0..grid.column_length() {
        let line: String = (0..grid.row_length())
            .map(|col| {
                let n = grid.cell_members(col + row * grid.row_length()).len();
                match n {
                    0 => '.',
                    1..=9 => char::from(b'0' + n as u8),
                    _ => '+',
                }
            })
            .collect();
        println!("{line}");
    }

    let busiest = (0..grid.cell_count())
        .max_by_key(|&c| grid.cell_members(c).len())
        .unwrap_or(0);
    println!(
        "busiest cell {busiest} at {:?} holds {:?}",
        grid.cell_coordinate_of(busiest),
        grid.cell_members(busiest)
    );
}
