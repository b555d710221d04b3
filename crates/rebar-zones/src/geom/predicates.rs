//! Point/segment predicates and polygon validation.
//!
//! All comparisons go through one tolerance `eps` supplied by the caller
//! (usually `GeomCfg::eps`). Nothing here knows about zones or the optimizer.

use nalgebra::Vector2;
use thiserror::Error;

use super::types::Polygon;

/// Twice the signed area of triangle (a, b, c).
#[inline]
pub fn orient(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// `p` lies on the closed segment `[a, b]` (within `eps`).
pub fn point_on_segment(p: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>, eps: f64) -> bool {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= eps * eps {
        return (p - a).norm() <= eps;
    }
    // distance to the supporting line, scaled by |ab|
    if orient(a, b, p).abs() > eps * len2.sqrt() {
        return false;
    }
    let t = (p - a).dot(&ab);
    t >= -eps * len2.sqrt() && t <= len2 + eps * len2.sqrt()
}

/// Ray casting along +X with a half-open Y test per edge.
///
/// Points within `eps` of any edge (vertices included) are reported inside:
/// polygons are treated as closed sets. The half-open test
/// `(a.y > p.y) != (b.y > p.y)` counts a vertex grazed by the ray exactly once,
/// so the result never depends on which edge of a shared vertex is visited first.
pub fn point_in_polygon(polygon: &Polygon, p: Vector2<f64>, eps: f64) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    for (a, b) in polygon.edges() {
        if point_on_segment(p, a, b, eps) {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if x_cross > p.x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Any contact between the closed segments `[a0, a1]` and `[b0, b1]`:
/// proper crossings, endpoint touches and collinear overlaps all count.
pub fn segments_intersect(
    a0: Vector2<f64>,
    a1: Vector2<f64>,
    b0: Vector2<f64>,
    b1: Vector2<f64>,
    eps: f64,
) -> bool {
    let o1 = orient(a0, a1, b0);
    let o2 = orient(a0, a1, b1);
    let o3 = orient(b0, b1, a0);
    let o4 = orient(b0, b1, a1);

    if point_on_segment(b0, a0, a1, eps)
        || point_on_segment(b1, a0, a1, eps)
        || point_on_segment(a0, b0, b1, eps)
        || point_on_segment(a1, b0, b1, eps)
    {
        return true;
    }

    let straddle_a = (o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0);
    let straddle_b = (o3 > 0.0 && o4 < 0.0) || (o3 < 0.0 && o4 > 0.0);
    straddle_a && straddle_b
}

/// Why a vertex loop is not a usable simple polygon.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PolygonDefect {
    #[error("needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),
    #[error("vertex {0} is not finite")]
    NonFinite(usize),
    #[error("edge {0} has zero length")]
    DegenerateEdge(usize),
    #[error("edges {0} and {1} intersect")]
    SelfIntersecting(usize, usize),
    #[error("enclosed area is zero")]
    ZeroArea,
}

/// Validate a vertex loop and return it with an explicit closing vertex removed.
///
/// Checks: ≥3 vertices, finite coordinates, no zero-length edge, no two
/// non-adjacent edges touching, non-zero area.
pub fn validate_polygon(polygon: &Polygon, eps: f64) -> Result<Polygon, PolygonDefect> {
    let mut v = polygon.vertices.clone();
    if let Some(k) = v.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(PolygonDefect::NonFinite(k));
    }
    if v.len() >= 2 && (v[0] - v[v.len() - 1]).norm() <= eps {
        v.pop();
    }
    if v.len() < 3 {
        return Err(PolygonDefect::TooFewVertices(v.len()));
    }
    let out = Polygon::new(v);
    let n = out.len();
    for (k, (a, b)) in out.edges().enumerate() {
        if (b - a).norm() <= eps {
            return Err(PolygonDefect::DegenerateEdge(k));
        }
    }
    for i in 0..n {
        let (a0, a1) = (out.vertices[i], out.vertices[(i + 1) % n]);
        for j in (i + 1)..n {
            let j_next = (j + 1) % n;
            if j == (i + 1) % n || j_next == i {
                continue;
            }
            let (b0, b1) = (out.vertices[j], out.vertices[j_next]);
            if segments_intersect(a0, a1, b0, b1, eps) {
                return Err(PolygonDefect::SelfIntersecting(i, j));
            }
        }
    }
    if out.area() <= eps {
        return Err(PolygonDefect::ZeroArea);
    }
    Ok(out)
}
