// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-radius neighbor queries.
//!
//! A query collects every point in the block of cells covering the search
//! circle into the grid's scratch buffer, then filters that candidate list
//! by exact distance as the returned iterator is advanced. The iterator
//! borrows the grid mutably, so one query's results must be consumed (or
//! copied out) before the next query is issued.

use core::iter::FusedIterator;
use core::slice;

use kurbo::{Point, Vec2};

use crate::grid::{NeighborGrid, floor_to_i64};
use crate::store::Positions;
use crate::wrap::{corrected_direction, wrap_point, wrap_threshold_squared};

/// Inclusive block of integer cell coordinates.
///
/// On a torus the bounds may fall outside the grid; they are resolved
/// through [`NeighborGrid::cell_coordinate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// First column.
    pub x0: i64,
    /// Last column (inclusive).
    pub x1: i64,
    /// First row.
    pub y0: i64,
    /// Last row (inclusive).
    pub y1: i64,
}

impl CellRange {
    /// Number of cells in the block.
    pub fn len(&self) -> usize {
        let w = usize::try_from(self.x1 - self.x0 + 1).unwrap_or(0);
        let h = usize::try_from(self.y1 - self.y0 + 1).unwrap_or(0);
        w * h
    }

    /// Whether the block covers no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One result of [`NeighborGrid::nearest_neighbors`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    /// Index of the neighbor in the position store.
    pub index: usize,
    /// Offset from the query point to the neighbor, across the wrapped edge
    /// when that path is shorter.
    pub direction: Vec2,
    /// Squared length of `direction`.
    pub distance_squared: f64,
}

impl Neighbor {
    /// Euclidean distance to the neighbor.
    pub fn distance(&self) -> f64 {
        self.direction.hypot()
    }
}

#[derive(Copy, Clone, Debug)]
struct Torus {
    width: f64,
    height: f64,
    max_naive_squared: f64,
}

/// Lazy sequence of neighbors within the query radius.
///
/// Candidates were gathered when the query was issued; each call to `next`
/// measures candidates until one passes the distance test.
#[derive(Clone, Debug)]
pub struct Neighbors<'a> {
    candidates: slice::Iter<'a, usize>,
    points: &'a [Point],
    query: usize,
    origin: Point,
    radius_squared: f64,
    torus: Option<Torus>,
}

impl Neighbors<'_> {
    /// Candidates not yet examined.
    pub fn remaining_candidates(&self) -> usize {
        self.candidates.len()
    }
}

impl Iterator for Neighbors<'_> {
    type Item = Neighbor;

    fn next(&mut self) -> Option<Neighbor> {
        for &index in self.candidates.by_ref() {
            assert_ne!(
                index, self.query,
                "query point surfaced among its own candidates"
            );
            let candidate = match self.torus {
                Some(t) => wrap_point(t.width, t.height, self.points[index]),
                None => self.points[index],
            };
            let mut direction = candidate - self.origin;
            if let Some(t) = self.torus
                && direction.hypot2() > t.max_naive_squared
            {
                direction = corrected_direction(t.width, t.height, self.origin, candidate, direction);
            }
            let distance_squared = direction.hypot2();
            if distance_squared <= self.radius_squared {
                return Some(Neighbor {
                    index,
                    direction,
                    distance_squared,
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.candidates.len()))
    }
}

impl FusedIterator for Neighbors<'_> {}

impl NeighborGrid {
    /// Block of cells that may hold points within `radius` of `position`.
    ///
    /// Without wrapping the block is clamped to the grid. With wrapping it is
    /// left unclamped so it reaches across the edges, except that an axis
    /// spanning the whole grid is collapsed to a single pass over it.
    pub fn candidate_cells(&self, position: Point, radius: f64) -> CellRange {
        let p = self.domain_point(position);
        let s = self.config.spacing;
        let cols = i64::try_from(self.row_length).unwrap_or(i64::MAX);
        let rows = i64::try_from(self.column_length).unwrap_or(i64::MAX);
        if self.config.wrap {
            let (x0, x1) = wrapped_span(p.x - radius, p.x + radius, self.config.width, s, cols);
            let (y0, y1) = wrapped_span(p.y - radius, p.y + radius, self.config.height, s, rows);
            CellRange { x0, x1, y0, y1 }
        } else {
            CellRange {
                x0: floor_to_i64((p.x - radius) / s).clamp(0, cols - 1),
                x1: floor_to_i64((p.x + radius) / s).clamp(0, cols - 1),
                y0: floor_to_i64((p.y - radius) / s).clamp(0, rows - 1),
                y1: floor_to_i64((p.y + radius) / s).clamp(0, rows - 1),
            }
        }
    }

    /// Every point in the candidate block of point `index`, except `index`
    /// itself.
    ///
    /// This is a superset of the true neighbors. The slice lives in the
    /// grid's scratch buffer and is overwritten by the next query.
    ///
    /// # Panics
    ///
    /// Panics if the grid is stale for `positions` or `index` is out of range.
    pub fn raw_candidates<P: Positions + ?Sized>(
        &mut self,
        positions: &P,
        index: usize,
        radius: f64,
    ) -> &[usize] {
        self.assert_current(positions);
        self.collect_candidates(positions.points()[index], index, radius);
        &self.scratch
    }

    /// Points within `radius` of point `index`, excluding `index` itself.
    ///
    /// On a torus, offsets are measured along the shortest path across the
    /// edges. Candidates whose naive distance exceeds
    /// [`wrap_threshold_squared`](crate::wrap::wrap_threshold_squared) are
    /// checked for a wrapped edge, which keeps results exact for any radius,
    /// including ones comparable to the domain.
    ///
    /// # Panics
    ///
    /// Panics if the grid was never built, is stale for `positions`, or
    /// `index` is out of range.
    pub fn nearest_neighbors<'a, P: Positions + ?Sized>(
        &'a mut self,
        positions: &'a P,
        index: usize,
        radius: f64,
    ) -> Neighbors<'a> {
        debug_assert!(
            radius.is_finite() && radius >= 0.0,
            "radius must be finite and non-negative"
        );
        self.assert_current(positions);
        let points = positions.points();
        let origin = self.domain_point(points[index]);
        self.collect_candidates(origin, index, radius);
        let torus = self.config.wrap.then(|| Torus {
            width: self.config.width,
            height: self.config.height,
            max_naive_squared: wrap_threshold_squared(
                self.config.width,
                self.config.height,
                radius,
                self.config.spacing,
            ),
        });
        Neighbors {
            candidates: self.scratch.iter(),
            points,
            query: index,
            origin,
            radius_squared: radius * radius,
            torus,
        }
    }

    /// Call `f` for every neighbor of point `index` within `radius`.
    pub fn for_each_neighbor<P, F>(&mut self, positions: &P, index: usize, radius: f64, f: F)
    where
        P: Positions + ?Sized,
        F: FnMut(Neighbor),
    {
        self.nearest_neighbors(positions, index, radius).for_each(f);
    }

    /// Number of points within `radius` of point `index`.
    pub fn neighbor_count<P: Positions + ?Sized>(
        &mut self,
        positions: &P,
        index: usize,
        radius: f64,
    ) -> usize {
        self.nearest_neighbors(positions, index, radius).count()
    }

    fn collect_candidates(&mut self, position: Point, index: usize, radius: f64) {
        let range = self.candidate_cells(position, radius);
        self.scratch.clear();
        for y in range.y0..=range.y1 {
            for x in range.x0..=range.x1 {
                let cell = self.cell_coordinate(x, y);
                let members = &self.cell_entries[self.cell_start[cell]..self.cell_start[cell + 1]];
                self.scratch
                    .extend(members.iter().copied().filter(|&j| j != index));
            }
        }
    }
}

/// Cell span along one torus axis covering `[lo, hi]`.
///
/// Parts of the interval past either edge are bucketed after folding them
/// back into `[0, extent)`, then expressed as cell indices below `0` or at
/// and above `cells`. The last cell may be partial, so `-1` is the last cell
/// rather than the cell one `spacing` below zero.
fn wrapped_span(lo: f64, hi: f64, extent: f64, spacing: f64, cells: i64) -> (i64, i64) {
    let last = cells - 1;
    let start = if lo < 0.0 {
        floor_to_i64((lo + extent) / spacing).clamp(0, last) - cells
    } else {
        floor_to_i64(lo / spacing).min(last)
    };
    let end = if hi >= extent {
        cells + floor_to_i64((hi - extent) / spacing).clamp(0, last)
    } else {
        floor_to_i64(hi / spacing).min(last)
    };
    if end.saturating_sub(start) >= last {
        (0, last)
    } else {
        (start, end)
    }
}
