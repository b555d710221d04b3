//! Planar geometry kernel (pure, stateless).
//!
//! Purpose
//! - Provide the handful of predicates the zone search needs: point-in-polygon,
//!   segment contact, rectangle union/overlap, polygon validation and clipping.
//! - Every function takes its operands explicitly; there is no shared state, so
//!   callers may evaluate in parallel freely.
//!
//! Conventions
//! - Polygons are closed sets. Boundary points count as inside (see
//!   `point_in_polygon`).
//! - One tolerance `GeomCfg::eps` (default 1e-9, in working units) for all
//!   comparisons.

mod clip;
mod predicates;
mod types;

pub use clip::{area_inside_rect, clip_halfplane, clip_to_rect, rect_polygon};
pub use predicates::{
    orient, point_in_polygon, point_on_segment, segments_intersect, validate_polygon,
    PolygonDefect,
};
pub use types::{GeomCfg, Hs2, Polygon, Rect};

/// Minimal enclosing rectangle of two rectangles.
#[inline]
pub fn rectangle_union(a: &Rect, b: &Rect) -> Rect {
    a.union(b)
}

#[cfg(test)]
mod tests;
