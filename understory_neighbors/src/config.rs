// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration: domain extent, cell spacing, and topology.

use thiserror::Error;

/// Upper bound on the number of cells a grid may allocate.
///
/// `cell_start` holds one `usize` per cell, so this keeps a mistyped spacing
/// from requesting gigabytes of offsets.
pub const MAX_CELLS: usize = 1 << 26;

/// Construction-time configuration of a [`NeighborGrid`](crate::NeighborGrid).
///
/// The domain spans `[0, width) × [0, height)`. Cells are squares of edge
/// `spacing`; the last row and column may extend past the domain when the
/// extents are not multiples of the spacing.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// Domain extent along x.
    pub width: f64,
    /// Domain extent along y.
    pub height: f64,
    /// Cell edge length.
    ///
    /// Smaller cells mean fewer candidates per query but more cells to scan;
    /// a spacing close to the typical query radius is a good start.
    pub spacing: f64,
    /// Treat the domain as a torus: coordinates wrap at the edges.
    #[cfg_attr(feature = "serde", serde(default))]
    pub wrap: bool,
}

impl GridConfig {
    /// Create a clamped (non-wrapping) configuration.
    pub const fn new(width: f64, height: f64, spacing: f64) -> Self {
        Self {
            width,
            height,
            spacing,
            wrap: false,
        }
    }

    /// Set the topology flag.
    #[must_use]
    pub const fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Check that every extent is finite and strictly positive and that the
    /// resulting grid has a sane number of cells.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolution().map(|_| ())
    }

    /// Number of cells along x and y: `ceil(extent / spacing)`, at least one.
    pub fn resolution(&self) -> Result<(usize, usize), ConfigError> {
        if !is_positive(self.width) {
            return Err(ConfigError::NonPositiveWidth(self.width));
        }
        if !is_positive(self.height) {
            return Err(ConfigError::NonPositiveHeight(self.height));
        }
        if !is_positive(self.spacing) {
            return Err(ConfigError::NonPositiveSpacing(self.spacing));
        }
        let row_length = cells_along(self.width, self.spacing);
        let column_length = cells_along(self.height, self.spacing);
        match row_length.checked_mul(column_length) {
            Some(n) if n <= MAX_CELLS => Ok((row_length, column_length)),
            _ => Err(ConfigError::TooManyCells {
                row_length,
                column_length,
            }),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// Rejected grid configuration.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// `width` was zero, negative, or not finite.
    #[error("grid width must be finite and positive, got {0}")]
    NonPositiveWidth(f64),
    /// `height` was zero, negative, or not finite.
    #[error("grid height must be finite and positive, got {0}")]
    NonPositiveHeight(f64),
    /// `spacing` was zero, negative, or not finite.
    #[error("grid spacing must be finite and positive, got {0}")]
    NonPositiveSpacing(f64),
    /// The resolution would exceed [`MAX_CELLS`].
    #[error("grid of {row_length}x{column_length} cells exceeds the cell limit")]
    TooManyCells {
        /// Requested cells along x.
        row_length: usize,
        /// Requested cells along y.
        column_length: usize,
    },
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn cells_along(extent: f64, spacing: f64) -> usize {
    let ratio = extent / spacing;
    let n = crate::grid::floor_to_i64(ratio);
    #[allow(
        clippy::cast_precision_loss,
        reason = "Comparison only decides whether a partial cell remains."
    )]
    let n = if (n as f64) < ratio { n.saturating_add(1) } else { n };
    usize::try_from(n.max(1)).unwrap_or(usize::MAX)
}
