// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform bucket grid rebuilt from a point set with a counting sort.

use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Point;

use crate::config::{ConfigError, GridConfig};
use crate::store::Positions;
use crate::wrap::wrap_point;

/// Point count and mutation stamp the grid was last built from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Snapshot {
    len: usize,
    generation: Option<u64>,
}

/// Fixed-cell-size spatial hash over caller-owned points.
///
/// The grid stores only point indices. Cell `c` owns the range
/// `cell_start[c]..cell_start[c + 1]` of `cell_entries`; both arrays are
/// rebuilt in one linear pass by [`update`](Self::update). Queries live in
/// [`query`](crate::query).
pub struct NeighborGrid {
    pub(crate) config: GridConfig,
    pub(crate) row_length: usize,
    pub(crate) column_length: usize,
    pub(crate) cell_start: Vec<usize>,
    pub(crate) cell_entries: Vec<usize>,
    pub(crate) scratch: Vec<usize>,
    built: Option<Snapshot>,
}

impl NeighborGrid {
    /// Create an unbuilt grid for `config`.
    ///
    /// Fails if any extent or the spacing is not finite and positive.
    pub fn new(config: GridConfig) -> Result<Self, ConfigError> {
        let (row_length, column_length) = config.resolution()?;
        let cells = row_length * column_length;
        log::debug!(
            "neighbor grid {}x{} cells (spacing {}, wrap {})",
            row_length,
            column_length,
            config.spacing,
            config.wrap
        );
        Ok(Self {
            config,
            row_length,
            column_length,
            cell_start: alloc::vec![0; cells + 1],
            cell_entries: Vec::new(),
            scratch: Vec::new(),
            built: None,
        })
    }

    /// Create a grid and build it from `positions` in one step.
    pub fn from_positions<P: Positions + ?Sized>(
        config: GridConfig,
        positions: &P,
    ) -> Result<Self, ConfigError> {
        let mut grid = Self::new(config)?;
        grid.update(positions);
        Ok(grid)
    }

    /// Rebuild the cell buckets from the current `positions`.
    ///
    /// Two passes over the points: count per cell, turn the counts into end
    /// offsets, then walk the points backwards placing each one just before
    /// its cell's running end. Entries within a cell stay in index order.
    /// Buffers only reallocate when the point count grows.
    pub fn update<P: Positions + ?Sized>(&mut self, positions: &P) {
        let points = positions.points();
        let n = points.len();
        let cells = self.cell_count();

        self.cell_start.clear();
        self.cell_start.resize(cells + 1, 0);
        for &p in points {
            let c = self.cell_index_of(p);
            self.cell_start[c] += 1;
        }

        let mut running = 0;
        for start in &mut self.cell_start[..cells] {
            running += *start;
            *start = running;
        }
        self.cell_start[cells] = n;

        self.cell_entries.clear();
        self.cell_entries.resize(n, 0);
        for (i, &p) in points.iter().enumerate().rev() {
            let c = self.cell_index_of(p);
            self.cell_start[c] -= 1;
            self.cell_entries[self.cell_start[c]] = i;
        }

        if self.scratch.capacity() < n {
            self.scratch.reserve(n - self.scratch.len());
            log::debug!("neighbor grid scratch grew to {} slots", self.scratch.capacity());
        }
        self.built = Some(Snapshot {
            len: n,
            generation: positions.generation(),
        });
        log::trace!("rebuilt neighbor grid: {n} points in {cells} cells");
    }

    /// Flat cell index of the cell containing `p`.
    ///
    /// With wrapping, coordinates are first reduced into the domain. Without
    /// it, points outside the domain land in the nearest edge cell.
    pub fn cell_index_of(&self, p: Point) -> usize {
        let p = self.domain_point(p);
        let s = self.config.spacing;
        let i = clamp_cell(floor_to_i64(p.x / s), self.row_length);
        let j = clamp_cell(floor_to_i64(p.y / s), self.column_length);
        i + j * self.row_length
    }

    /// Flat cell index for integer cell coordinates `(i, j)`.
    ///
    /// Out-of-range coordinates wrap around (torus) or clamp to the edge,
    /// following the grid's topology.
    pub fn cell_coordinate(&self, i: i64, j: i64) -> usize {
        let (i, j) = if self.config.wrap {
            (
                wrap_cell(i, self.row_length),
                wrap_cell(j, self.column_length),
            )
        } else {
            (
                clamp_cell(i, self.row_length),
                clamp_cell(j, self.column_length),
            )
        };
        i + j * self.row_length
    }

    /// World-space top-left corner of `cell`.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is not below [`cell_count`](Self::cell_count).
    pub fn cell_coordinate_of(&self, cell: usize) -> Point {
        assert!(
            cell < self.cell_count(),
            "cell {cell} out of range for {} cells",
            self.cell_count()
        );
        let s = self.config.spacing;
        #[allow(
            clippy::cast_precision_loss,
            reason = "Cell coordinates are bounded by MAX_CELLS and fit an f64 exactly."
        )]
        let (i, j) = (
            (cell % self.row_length) as f64,
            (cell / self.row_length) as f64,
        );
        Point::new(i * s, j * s)
    }

    /// Indices of the points in `cell`, in ascending order.
    ///
    /// Empty for an unbuilt grid.
    ///
    /// # Panics
    ///
    /// Panics on a built grid if `cell` is not below
    /// [`cell_count`](Self::cell_count).
    pub fn cell_members(&self, cell: usize) -> &[usize] {
        if self.built.is_none() {
            return &[];
        }
        &self.cell_entries[self.cell_start[cell]..self.cell_start[cell + 1]]
    }

    /// Start offsets into [`cell_entries`](Self::cell_entries), one per cell
    /// plus a trailing end sentinel.
    pub fn cell_start(&self) -> &[usize] {
        &self.cell_start
    }

    /// Point indices grouped by cell.
    pub fn cell_entries(&self) -> &[usize] {
        &self.cell_entries
    }

    /// Cells along x.
    pub const fn row_length(&self) -> usize {
        self.row_length
    }

    /// Cells along y.
    pub const fn column_length(&self) -> usize {
        self.column_length
    }

    /// Total number of cells.
    pub const fn cell_count(&self) -> usize {
        self.row_length * self.column_length
    }

    /// Configuration the grid was created with.
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of points indexed by the last [`update`](Self::update).
    pub fn len(&self) -> usize {
        self.cell_entries.len()
    }

    /// Whether the last build indexed no points.
    pub fn is_empty(&self) -> bool {
        self.cell_entries.is_empty()
    }

    /// Whether [`update`](Self::update) has run at least once.
    pub const fn is_built(&self) -> bool {
        self.built.is_some()
    }

    /// Whether the grid no longer reflects `positions`.
    ///
    /// True before the first build, after the point count changed, or after
    /// a tracked store (such as [`PositionStore`](crate::PositionStore))
    /// was mutated. Generations are only compared when both the build and
    /// `positions` carry one, so a grid built from a store may be queried
    /// through [`PositionStore::as_slice`](crate::PositionStore::as_slice)
    /// and the other way around. Edits through an untracked slice that keep
    /// its length cannot be detected.
    pub fn is_stale<P: Positions + ?Sized>(&self, positions: &P) -> bool {
        match self.built {
            None => true,
            Some(s) => {
                s.len != positions.points().len()
                    || matches!(
                        (s.generation, positions.generation()),
                        (Some(built), Some(now)) if built != now
                    )
            }
        }
    }

    pub(crate) fn assert_current<P: Positions + ?Sized>(&self, positions: &P) {
        assert!(self.built.is_some(), "neighbor grid queried before update()");
        assert!(
            !self.is_stale(positions),
            "neighbor grid is stale; call update() after mutating positions"
        );
    }

    /// `p` as the grid measures it: reduced into the domain on a torus,
    /// untouched otherwise.
    #[inline]
    pub(crate) fn domain_point(&self, p: Point) -> Point {
        if self.config.wrap {
            wrap_point(self.config.width, self.config.height, p)
        } else {
            p
        }
    }
}

impl Debug for NeighborGrid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let occupied = self
            .cell_start
            .windows(2)
            .filter(|w| w[0] != w[1])
            .count();
        f.debug_struct("NeighborGrid")
            .field("config", &self.config)
            .field("row_length", &self.row_length)
            .field("column_length", &self.column_length)
            .field("points", &self.cell_entries.len())
            .field("occupied_cells", &occupied)
            .field("built", &self.built.is_some())
            .finish_non_exhaustive()
    }
}

#[inline]
pub(crate) fn floor_to_i64(v: f64) -> i64 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Saturating float-to-int casts; out-of-range cells are clamped or wrapped by callers."
    )]
    let i = v as i64;
    #[allow(
        clippy::cast_precision_loss,
        reason = "Only used to detect whether truncation rounded toward zero."
    )]
    let back = i as f64;
    if back > v { i - 1 } else { i }
}

#[inline]
fn clamp_cell(i: i64, len: usize) -> usize {
    let max = i64::try_from(len - 1).unwrap_or(i64::MAX);
    usize::try_from(i.clamp(0, max)).unwrap_or(0)
}

#[inline]
fn wrap_cell(i: i64, len: usize) -> usize {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    usize::try_from(i.rem_euclid(len)).unwrap_or(0)
}
