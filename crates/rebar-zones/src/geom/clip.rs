//! Polygon clipping against convex regions given as half-planes.
//!
//! Sutherland–Hodgman: the subject polygon is cut by one half-plane at a time.
//! Exact for convex clip regions (our rectangles); the subject may be concave.

use nalgebra::Vector2;

use super::types::{Hs2, Polygon, Rect};

/// Keep the part of `poly` satisfying `h`.
pub fn clip_halfplane(poly: &Polygon, h: &Hs2) -> Polygon {
    let n = poly.len();
    let mut out = Vec::with_capacity(n + 2);
    for k in 0..n {
        let cur = poly.vertices[k];
        let next = poly.vertices[(k + 1) % n];
        let (s_cur, s_next) = (h.slack(cur), h.slack(next));
        if s_cur >= 0.0 {
            out.push(cur);
        }
        if (s_cur >= 0.0) != (s_next >= 0.0) {
            let t = s_cur / (s_cur - s_next);
            out.push(cur + (next - cur) * t);
        }
    }
    Polygon::new(out)
}

/// Intersection of `poly` with the rectangle `rect`.
pub fn clip_to_rect(poly: &Polygon, rect: &Rect) -> Polygon {
    let mut cur = poly.clone();
    for h in rect.halfplanes() {
        if cur.len() < 3 {
            return Polygon::default();
        }
        cur = clip_halfplane(&cur, &h);
    }
    cur
}

/// Area of `poly` lying inside `rect`.
pub fn area_inside_rect(poly: &Polygon, rect: &Rect) -> f64 {
    let clipped = clip_to_rect(poly, rect);
    if clipped.len() < 3 {
        0.0
    } else {
        clipped.area()
    }
}

/// Convenience for tests and callers that hold raw points.
pub fn rect_polygon(rect: &Rect) -> Polygon {
    Polygon::new(rect.corners().iter().copied().collect::<Vec<Vector2<f64>>>())
}
