//! Region boundary: the outer slab contour and its openings.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{BoundaryPart, Error, Result};
use crate::geom::{point_in_polygon, segments_intersect, validate_polygon, Polygon, Rect};

/// Outer polygon plus hole polygons, all in the load points' coordinate system.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionBoundary {
    pub outer: Polygon,
    #[serde(default)]
    pub holes: Vec<Polygon>,
}

impl RegionBoundary {
    pub fn new(outer: Polygon, holes: Vec<Polygon>) -> Self {
        Self { outer, holes }
    }

    /// Axis-aligned rectangle without holes; handy for tests and demos.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(
            Polygon::from_xy(&[(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)]),
            Vec::new(),
        )
    }

    pub fn with_hole(mut self, hole: Polygon) -> Self {
        self.holes.push(hole);
        self
    }

    /// Validate every loop and normalize away explicit closing vertices.
    ///
    /// Fails on unclosable, self-intersecting or zero-area loops and on holes
    /// with a vertex outside the outer contour.
    pub fn validated(&self, eps: f64) -> Result<RegionBoundary> {
        let outer = validate_polygon(&self.outer, eps).map_err(|defect| Error::InvalidBoundary {
            which: BoundaryPart::Outer,
            defect,
        })?;
        let mut holes = Vec::with_capacity(self.holes.len());
        for (k, h) in self.holes.iter().enumerate() {
            let hole = validate_polygon(h, eps).map_err(|defect| Error::InvalidBoundary {
                which: BoundaryPart::Hole(k),
                defect,
            })?;
            if !hole.vertices.iter().all(|&v| point_in_polygon(&outer, v, eps)) {
                return Err(Error::HoleOutsideBoundary(k));
            }
            holes.push(hole);
        }
        Ok(RegionBoundary { outer, holes })
    }

    #[inline]
    fn loops(&self) -> impl Iterator<Item = &Polygon> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// `p` is on the slab: inside the outer loop and not inside any hole.
    pub fn covers_point(&self, p: Vector2<f64>, eps: f64) -> bool {
        point_in_polygon(&self.outer, p, eps) && !self.holes.iter().any(|h| point_in_polygon(h, p, eps))
    }

    /// A zone rectangle may be placed here: all corners lie on the slab and no
    /// rectangle edge touches any boundary or hole edge.
    ///
    /// Edge contact is treated as a violation, including mere touching. A hole
    /// lying wholly inside the rectangle touches neither test, so it is admitted;
    /// its area is accounted for by the zone's `OpeningDeduction`.
    pub fn admits_rect(&self, rect: &Rect, eps: f64) -> bool {
        if !rect.corners().iter().all(|&c| self.covers_point(c, eps)) {
            return false;
        }
        let sides = rect.edges();
        for lp in self.loops() {
            for (b0, b1) in lp.edges() {
                if sides
                    .iter()
                    .any(|&(a0, a1)| segments_intersect(a0, a1, b0, b1, eps))
                {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    const EPS: f64 = 1e-9;

    fn slab_with_opening() -> RegionBoundary {
        RegionBoundary::rectangle(10.0, 10.0)
            .with_hole(Polygon::from_xy(&[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]))
    }

    #[test]
    fn rect_inside_plain_slab_is_admitted() {
        let b = RegionBoundary::rectangle(10.0, 10.0);
        assert!(b.admits_rect(&Rect::new(vector![1.0, 1.0], vector![3.0, 2.0]), EPS));
        // crossing the outer contour
        assert!(!b.admits_rect(&Rect::new(vector![8.0, 1.0], vector![11.0, 2.0]), EPS));
        // touching the outer contour counts as a violation
        assert!(!b.admits_rect(&Rect::new(vector![8.0, 1.0], vector![10.0, 2.0]), EPS));
    }

    #[test]
    fn rect_enclosing_opening_is_admitted_but_crossing_one_is_not() {
        let b = slab_with_opening();
        // the hole sits strictly inside: free corners, no edge contact
        let around = Rect::new(vector![3.0, 3.0], vector![7.0, 7.0]);
        assert!(around.corners().iter().all(|&c| b.covers_point(c, EPS)));
        assert!(b.admits_rect(&around, EPS));
        // one side runs along the hole edge
        assert!(!b.admits_rect(&Rect::new(vector![3.0, 3.0], vector![7.0, 6.0]), EPS));
        // a strip crossing the hole with corners outside it
        assert!(!b.admits_rect(&Rect::new(vector![1.0, 4.5], vector![9.0, 5.5]), EPS));
        // clear of the hole
        assert!(b.admits_rect(&Rect::new(vector![1.0, 1.0], vector![3.0, 3.0]), EPS));
    }

    #[test]
    fn concave_outline_rejects_rect_over_notch() {
        let l_shape = RegionBoundary::new(
            Polygon::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 4.0), (4.0, 4.0), (4.0, 10.0), (0.0, 10.0)]),
            vec![],
        );
        let b = l_shape.validated(EPS).unwrap();
        assert!(b.admits_rect(&Rect::new(vector![1.0, 1.0], vector![3.0, 8.0]), EPS));
        assert!(!b.admits_rect(&Rect::new(vector![1.0, 1.0], vector![8.0, 8.0]), EPS));
    }

    #[test]
    fn validation_reports_which_loop_failed() {
        let bowtie = Polygon::from_xy(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
        let bad_outer = RegionBoundary::new(bowtie.clone(), vec![]);
        assert!(matches!(
            bad_outer.validated(EPS),
            Err(Error::InvalidBoundary {
                which: BoundaryPart::Outer,
                ..
            })
        ));
        let bad_hole = RegionBoundary::rectangle(10.0, 10.0).with_hole(bowtie);
        assert!(matches!(
            bad_hole.validated(EPS),
            Err(Error::InvalidBoundary {
                which: BoundaryPart::Hole(0),
                ..
            })
        ));
        let stray_hole = RegionBoundary::rectangle(10.0, 10.0)
            .with_hole(Polygon::from_xy(&[(9.0, 9.0), (12.0, 9.0), (12.0, 12.0)]));
        assert_eq!(stray_hole.validated(EPS), Err(Error::HoleOutsideBoundary(0)));
    }
}
