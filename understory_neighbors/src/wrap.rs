// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Torus geometry: domain reduction, quadrant classification, and the
//! translation that measures distance across a wrapped edge.
//!
//! A query only scans the cells within `radius` of the query point, so a
//! candidate reached without wrapping is never more than `radius + spacing`
//! away on either axis. A candidate whose naive offset spans more than half
//! the domain on some axis came from a cell on the opposite edge, and its true
//! offset is found by shifting it one domain extent toward the query point.
//! Which way to shift is read from the quadrants of the two points.

use core::f64::consts::SQRT_2;

use kurbo::{Point, Vec2};

/// Multiplier on `radius + spacing` beyond which a candidate must have been
/// reached across a wrapped edge.
///
/// Unwrapped candidates sit within `radius + spacing` per axis, so at most
/// `√2 · (radius + spacing)` away; the extra factor of two keeps float noise
/// at cell borders far from the decision.
pub const WRAP_DIAGONAL: f64 = 2.0 * SQRT_2;

/// Squared distance above which a candidate's naive offset is treated as a
/// wrapped one, ignoring the domain size.
///
/// Only sound on domains wider than `(1 + 2√2) · (radius + spacing)`; queries
/// use [`wrap_threshold_squared`], which also accounts for the extents.
#[inline]
pub fn max_wrap_distance_squared(radius: f64, spacing: f64) -> f64 {
    let d = (radius + spacing) * WRAP_DIAGONAL;
    d * d
}

/// Squared naive distance above which a query checks a candidate for a
/// wrapped edge.
///
/// This is [`max_wrap_distance_squared`] capped at half the smaller extent.
/// An offset spanning more than half the domain on either axis is always
/// longer than the cap, so no wrapped candidate slips under it regardless of
/// how `radius + spacing` compares to the domain.
#[inline]
pub fn wrap_threshold_squared(width: f64, height: f64, radius: f64, spacing: f64) -> f64 {
    let half = 0.5 * if width < height { width } else { height };
    let cap = half * half;
    let diagonal = max_wrap_distance_squared(radius, spacing);
    if diagonal < cap { diagonal } else { cap }
}

/// One quarter of the domain. `x` grows to the right and `y` grows down.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Quadrant {
    /// `x <= width/2`, `y <= height/2`.
    TopLeft = 0,
    /// `x > width/2`, `y <= height/2`.
    TopRight = 1,
    /// `x <= width/2`, `y > height/2`.
    BottomLeft = 2,
    /// `x > width/2`, `y > height/2`.
    BottomRight = 3,
}

impl Quadrant {
    /// Numeric code: `+1` for the right half, `+2` for the bottom half.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Classify `p` into a quadrant of the `width × height` domain.
#[inline]
pub fn quadrant(width: f64, height: f64, p: Point) -> Quadrant {
    match (p.x > width * 0.5, p.y > height * 0.5) {
        (false, false) => Quadrant::TopLeft,
        (true, false) => Quadrant::TopRight,
        (false, true) => Quadrant::BottomLeft,
        (true, true) => Quadrant::BottomRight,
    }
}

/// Translation to apply to a candidate in quadrant `to` so that subtracting
/// a query point in quadrant `from` gives the path across the shared edges.
///
/// # Panics
///
/// Panics if `from == to`: two points in one quadrant are never separated by
/// a wrapped edge, so reaching this means candidate generation is broken.
pub fn wrap_correction(width: f64, height: f64, from: Quadrant, to: Quadrant) -> Vec2 {
    use Quadrant::*;
    let (x, y) = match (from, to) {
        (TopLeft, TopRight) => (-width, 0.0),
        (TopLeft, BottomLeft) => (0.0, -height),
        (TopLeft, BottomRight) => (-width, -height),
        (TopRight, TopLeft) => (width, 0.0),
        (TopRight, BottomLeft) => (width, -height),
        (TopRight, BottomRight) => (0.0, -height),
        (BottomLeft, TopLeft) => (0.0, height),
        (BottomLeft, TopRight) => (-width, height),
        (BottomLeft, BottomRight) => (-width, 0.0),
        (BottomRight, TopLeft) => (width, height),
        (BottomRight, TopRight) => (0.0, height),
        (BottomRight, BottomLeft) => (width, 0.0),
        (TopLeft, TopLeft)
        | (TopRight, TopRight)
        | (BottomLeft, BottomLeft)
        | (BottomRight, BottomRight) => {
            panic!("wrap correction requested within a single quadrant ({from:?})")
        }
    };
    Vec2::new(x, y)
}

/// Offset from `query` to the nearest image of `candidate` on the torus.
///
/// `query` and `candidate` must lie in the domain and `naive` is
/// `candidate - query`. The quadrant table picks the shift; an axis is only
/// shifted when its naive offset spans more than half the domain, so a
/// candidate that merely sits across the midline on the other axis keeps its
/// direct offset there. An offset that spans at most half the domain on both
/// axes is already the shortest one and is returned unchanged.
pub fn corrected_direction(
    width: f64,
    height: f64,
    query: Point,
    candidate: Point,
    naive: Vec2,
) -> Vec2 {
    let wrap_x = abs(naive.x) > width * 0.5;
    let wrap_y = abs(naive.y) > height * 0.5;
    if !wrap_x && !wrap_y {
        return naive;
    }
    // Spanning more than half an axis puts the points in opposite halves of
    // it, so the quadrants differ.
    let from = quadrant(width, height, query);
    let to = quadrant(width, height, candidate);
    let shift = wrap_correction(width, height, from, to);
    Vec2::new(
        if wrap_x { naive.x + shift.x } else { naive.x },
        if wrap_y { naive.y + shift.y } else { naive.y },
    )
}

#[inline]
fn abs(v: f64) -> f64 {
    if v < 0.0 { -v } else { v }
}

/// Reduce `v` into `[0, extent)`.
#[inline]
pub fn wrap_into(v: f64, extent: f64) -> f64 {
    let r = v % extent;
    let r = if r < 0.0 { r + extent } else { r };
    // `-tiny + extent` rounds to `extent`.
    if r >= extent { 0.0 } else { r }
}

/// Reduce both coordinates of `p` into the domain.
#[inline]
pub fn wrap_point(width: f64, height: f64, p: Point) -> Point {
    Point::new(wrap_into(p.x, width), wrap_into(p.y, height))
}
