// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caller-owned point storage read by the grid during rebuild and query.

use alloc::vec::Vec;

use kurbo::Point;

/// Index-addressable point data the grid can read.
///
/// The grid never copies or owns points. It records [`Positions::generation`]
/// at [`update`](crate::NeighborGrid::update) and compares it at query time
/// to detect a stale index.
pub trait Positions {
    /// All points, addressed by their index.
    fn points(&self) -> &[Point];

    /// Mutation stamp, or `None` if the storage does not track changes.
    ///
    /// Untracked storage is only checked for a changed point count.
    fn generation(&self) -> Option<u64> {
        None
    }
}

impl Positions for [Point] {
    fn points(&self) -> &[Point] {
        self
    }
}

impl Positions for Vec<Point> {
    fn points(&self) -> &[Point] {
        self
    }
}

impl<const N: usize> Positions for [Point; N] {
    fn points(&self) -> &[Point] {
        self
    }
}

/// Point storage that stamps every mutation with a new generation.
///
/// Reads are free; any access that could change a point bumps the
/// generation, so a grid built from an older generation is reported stale.
#[derive(Clone, Debug, Default)]
pub struct PositionStore {
    points: Vec<Point>,
    generation: u64,
}

impl PositionStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            points: Vec::new(),
            generation: 0,
        }
    }

    /// Create an empty store with room for `n` points.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            points: Vec::with_capacity(n),
            generation: 0,
        }
    }

    /// Current mutation stamp.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the store holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `index`, if any.
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// All points as a slice.
    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    /// Iterate over the points in index order.
    pub fn iter(&self) -> core::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Append a point and return its index.
    pub fn push(&mut self, p: Point) -> usize {
        self.touch();
        self.points.push(p);
        self.points.len() - 1
    }

    /// Overwrite the point at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, p: Point) {
        self.touch();
        self.points[index] = p;
    }

    /// Mutable access to every point. Always counts as a mutation.
    pub fn points_mut(&mut self) -> &mut [Point] {
        self.touch();
        &mut self.points
    }

    /// Remove all points.
    pub fn clear(&mut self) {
        self.touch();
        self.points.clear();
    }

    /// Keep only the first `len` points.
    pub fn truncate(&mut self, len: usize) {
        self.touch();
        self.points.truncate(len);
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Positions for PositionStore {
    fn points(&self) -> &[Point] {
        &self.points
    }

    fn generation(&self) -> Option<u64> {
        Some(self.generation)
    }
}

impl From<Vec<Point>> for PositionStore {
    fn from(points: Vec<Point>) -> Self {
        Self {
            points,
            generation: 0,
        }
    }
}

impl FromIterator<Point> for PositionStore {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl Extend<Point> for PositionStore {
    fn extend<I: IntoIterator<Item = Point>>(&mut self, iter: I) {
        self.touch();
        self.points.extend(iter);
    }
}

impl<'a> IntoIterator for &'a PositionStore {
    type Item = &'a Point;
    type IntoIter = core::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
