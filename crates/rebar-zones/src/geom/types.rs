//! Planar value types used by the kernel.
//!
//! - `GeomCfg`: centralizes the tolerance used by every predicate.
//! - `Rect`: closed axis-aligned rectangle `[min, max]`.
//! - `Polygon`: ordered vertex loop; the closing edge is implicit.
//! - `Hs2`: closed half-plane `n·x <= c`, used to clip against rectangles.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeomCfg {
    pub eps: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self { eps: 1e-9 }
    }
}

/// Closed axis-aligned rectangle.
///
/// Invariant: `min.x <= max.x` and `min.y <= max.y` for every constructor below.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl Rect {
    #[inline]
    pub fn new(min: Vector2<f64>, max: Vector2<f64>) -> Self {
        Self {
            min: Vector2::new(min.x.min(max.x), min.y.min(max.y)),
            max: Vector2::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    /// Square of side `side` centred on `center`.
    #[inline]
    pub fn square_around(center: Vector2<f64>, side: f64) -> Self {
        let h = Vector2::new(side * 0.5, side * 0.5);
        Self::new(center - h, center + h)
    }

    /// Minimal rectangle enclosing all `points`; `None` for an empty slice.
    pub fn enclosing(points: impl IntoIterator<Item = Vector2<f64>>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (mut lo, mut hi) = (first, first);
        for p in it {
            lo = Vector2::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Vector2::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        Some(Self { min: lo, max: hi })
    }

    /// Minimal rectangle enclosing both operands.
    #[inline]
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Vector2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vector2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Closed-interval overlap on both axes; touching rectangles overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect, eps: f64) -> bool {
        self.min.x <= other.max.x + eps
            && other.min.x <= self.max.x + eps
            && self.min.y <= other.max.y + eps
            && other.min.y <= self.max.y + eps
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[inline]
    pub fn center(&self) -> Vector2<f64> {
        (self.min + self.max) * 0.5
    }

    /// Corners in counterclockwise order starting at `min`.
    pub fn corners(&self) -> [Vector2<f64>; 4] {
        [
            self.min,
            Vector2::new(self.max.x, self.min.y),
            self.max,
            Vector2::new(self.min.x, self.max.y),
        ]
    }

    /// Boundary edges following `corners()`.
    pub fn edges(&self) -> [(Vector2<f64>, Vector2<f64>); 4] {
        let c = self.corners();
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }

    /// The four half-planes whose intersection is this rectangle.
    pub fn halfplanes(&self) -> [Hs2; 4] {
        [
            Hs2::new(Vector2::new(1.0, 0.0), self.max.x),
            Hs2::new(Vector2::new(-1.0, 0.0), -self.min.x),
            Hs2::new(Vector2::new(0.0, 1.0), self.max.y),
            Hs2::new(Vector2::new(0.0, -1.0), -self.min.y),
        ]
    }

    /// Widen any axis thinner than `eps` to `side`, keeping the centre.
    pub fn padded_to(&self, side: f64, eps: f64) -> Rect {
        let c = self.center();
        let (mut lo, mut hi) = (self.min, self.max);
        if self.width() <= eps {
            lo.x = c.x - side * 0.5;
            hi.x = c.x + side * 0.5;
        }
        if self.height() <= eps {
            lo.y = c.y - side * 0.5;
            hi.y = c.y + side * 0.5;
        }
        Rect { min: lo, max: hi }
    }
}

/// Simple polygon given by its vertex loop (either orientation).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Vector2<f64>>,
}

impl Polygon {
    #[inline]
    pub fn new(vertices: Vec<Vector2<f64>>) -> Self {
        Self { vertices }
    }

    pub fn from_xy(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().map(|&(x, y)| Vector2::new(x, y)).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges `(v[k], v[k+1])` including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Vector2<f64>, Vector2<f64>)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |k| (self.vertices[k], self.vertices[(k + 1) % n]))
    }

    /// Shoelace signed area; positive for counterclockwise loops.
    pub fn signed_area(&self) -> f64 {
        0.5 * self
            .edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::enclosing(self.vertices.iter().copied())
    }
}

/// Closed half-plane `n · x <= c`.
#[derive(Clone, Copy, Debug)]
pub struct Hs2 {
    pub n: Vector2<f64>,
    pub c: f64,
}

impl Hs2 {
    #[inline]
    pub fn new(n: Vector2<f64>, c: f64) -> Self {
        Self { n, c }
    }

    #[inline]
    pub fn slack(&self, p: Vector2<f64>) -> f64 {
        self.c - self.n.dot(&p)
    }
}
