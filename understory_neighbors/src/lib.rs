// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Neighbors: fixed-radius neighbor queries over a dense, moving 2D point set.
//!
//! Understory Neighbors is a uniform bucket grid meant to be rebuilt every frame.
//!
//! - Rebuild the whole grid from the current positions with [`NeighborGrid::update`] (a linear counting sort).
//! - Ask for every point within `radius` of point `i` with [`NeighborGrid::nearest_neighbors`].
//! - Optionally treat the domain as a torus, so points near one edge see points near the opposite one.
//!
//! The grid never owns point data. Positions live in caller storage implementing [`Positions`]:
//! a plain `[Point]`/`Vec<Point>`, or a [`PositionStore`] that stamps every mutation so a stale
//! grid is caught instead of silently returning wrong neighbors.
//!
//! Points are [`kurbo::Point`]s and neighbor offsets are [`kurbo::Vec2`]s, so results plug
//! straight into relaxation or force accumulation code.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_neighbors::{GridConfig, NeighborGrid};
//!
//! let points = vec![
//!     Point::new(5.0, 5.0),
//!     Point::new(15.0, 5.0),
//!     Point::new(95.0, 95.0),
//! ];
//!
//! let mut grid = NeighborGrid::new(GridConfig::new(100.0, 100.0, 10.0)).unwrap();
//! grid.update(&points);
//!
//! let hits: Vec<_> = grid.nearest_neighbors(&points, 0, 12.0).collect();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].index, 1);
//! assert_eq!(hits[0].distance_squared, 100.0);
//! ```
//!
//! On a torus the offset reported for a neighbor takes the short way around:
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_neighbors::{GridConfig, NeighborGrid, PositionStore};
//!
//! let mut store = PositionStore::new();
//! store.push(Point::new(1.0, 1.0));
//! store.push(Point::new(99.0, 99.0));
//!
//! let config = GridConfig::new(100.0, 100.0, 10.0).with_wrap(true);
//! let mut grid = NeighborGrid::from_positions(config, &store).unwrap();
//!
//! let n = grid.nearest_neighbors(&store, 0, 5.0).next().unwrap();
//! assert_eq!(n.index, 1);
//! assert_eq!(n.direction, Vec2::new(-2.0, -2.0));
//!
//! // Moving a point makes the grid stale until the next update.
//! store.set(1, Point::new(50.0, 50.0));
//! assert!(grid.is_stale(&store));
//! grid.update(&store);
//! assert_eq!(grid.nearest_neighbors(&store, 0, 5.0).count(), 0);
//! ```
//!
//! ## Choosing a spacing
//!
//! A query scans every cell overlapping the square of side `2 * radius` around the query point.
//! A spacing close to the usual query radius keeps that block at three or four cells per axis;
//! much smaller cells add scanning overhead, much larger ones add candidates that fail the
//! distance test.
//!
//! ## Lifecycle
//!
//! A grid starts unbuilt, becomes built on [`NeighborGrid::update`], and goes stale as soon as the
//! positions change. Querying an unbuilt or detectably stale grid panics. Each query reuses one
//! scratch buffer owned by the grid; the returned iterator borrows the grid mutably, so the
//! borrow checker keeps two queries from overlapping and keeps the positions from changing
//! while results are being read.
//!
//! ### Float semantics
//!
//! This crate assumes finite coordinates. Non-finite coordinates are bucketed into an edge cell
//! and never reported as neighbors.

#![no_std]

extern crate alloc;

pub mod config;
pub mod grid;
pub mod query;
pub mod store;
pub mod wrap;

pub use config::{ConfigError, GridConfig};
pub use grid::NeighborGrid;
pub use query::{CellRange, Neighbor, Neighbors};
pub use store::{PositionStore, Positions};
pub use wrap::{
    Quadrant, max_wrap_distance_squared, quadrant, wrap_correction, wrap_threshold_squared,
};
