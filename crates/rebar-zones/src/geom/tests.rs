use super::*;
use nalgebra::{vector, Vector2};

const EPS: f64 = 1e-9;

fn square10() -> Polygon {
    Polygon::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
}

#[test]
fn point_in_square_inside_outside_and_boundary() {
    let sq = square10();
    assert!(point_in_polygon(&sq, vector![5.0, 5.0], EPS));
    assert!(!point_in_polygon(&sq, vector![15.0, 5.0], EPS));
    // boundary points are inside (closed polygon), on every side
    assert!(point_in_polygon(&sq, vector![10.0, 5.0], EPS));
    assert!(point_in_polygon(&sq, vector![0.0, 5.0], EPS));
    assert!(point_in_polygon(&sq, vector![5.0, 0.0], EPS));
    assert!(point_in_polygon(&sq, vector![10.0, 10.0], EPS));
}

#[test]
fn point_in_polygon_ray_through_vertex() {
    // Rays along y = 0 pass exactly through the vertices (2, 0) and (-2, 0).
    let diamond = Polygon::from_xy(&[(0.0, -2.0), (2.0, 0.0), (0.0, 2.0), (-2.0, 0.0)]);
    assert!(point_in_polygon(&diamond, vector![-1.0, 0.0], EPS));
    assert!(point_in_polygon(&diamond, vector![0.0, 0.0], EPS));
    assert!(!point_in_polygon(&diamond, vector![-3.0, 0.0], EPS));
    assert!(!point_in_polygon(&diamond, vector![3.0, 0.0], EPS));
}

#[test]
fn point_in_concave_polygon() {
    // U shape opening upwards
    let u = Polygon::from_xy(&[
        (0.0, 0.0),
        (6.0, 0.0),
        (6.0, 6.0),
        (4.0, 6.0),
        (4.0, 2.0),
        (2.0, 2.0),
        (2.0, 6.0),
        (0.0, 6.0),
    ]);
    assert!(point_in_polygon(&u, vector![1.0, 4.0], EPS));
    assert!(point_in_polygon(&u, vector![5.0, 4.0], EPS));
    assert!(!point_in_polygon(&u, vector![3.0, 4.0], EPS));
    assert!(point_in_polygon(&u, vector![3.0, 1.0], EPS));
}

#[test]
fn segments_cross_touch_overlap_and_miss() {
    let o = Vector2::zeros();
    // proper crossing
    assert!(segments_intersect(o, vector![2.0, 2.0], vector![0.0, 2.0], vector![2.0, 0.0], EPS));
    // endpoint touch
    assert!(segments_intersect(o, vector![1.0, 0.0], vector![1.0, 0.0], vector![1.0, 5.0], EPS));
    // collinear overlap
    assert!(segments_intersect(o, vector![3.0, 0.0], vector![2.0, 0.0], vector![5.0, 0.0], EPS));
    // collinear disjoint
    assert!(!segments_intersect(o, vector![1.0, 0.0], vector![2.0, 0.0], vector![3.0, 0.0], EPS));
    // parallel disjoint
    assert!(!segments_intersect(o, vector![1.0, 0.0], vector![0.0, 1.0], vector![1.0, 1.0], EPS));
    // skew disjoint
    assert!(!segments_intersect(o, vector![1.0, 1.0], vector![2.0, 0.0], vector![3.0, -5.0], EPS));
}

#[test]
fn rectangle_union_and_overlap() {
    let a = Rect::new(vector![0.0, 0.0], vector![1.0, 1.0]);
    let b = Rect::new(vector![3.0, -1.0], vector![4.0, 0.5]);
    let u = rectangle_union(&a, &b);
    assert_eq!(u.min, vector![0.0, -1.0]);
    assert_eq!(u.max, vector![4.0, 1.0]);
    assert!(!a.overlaps(&b, EPS));
    let touching = Rect::new(vector![1.0, 0.5], vector![2.0, 2.0]);
    assert!(a.overlaps(&touching, EPS));
    assert!(touching.overlaps(&a, EPS));
}

#[test]
fn rect_new_normalizes_corners_and_pads_degenerate_axes() {
    let r = Rect::new(vector![2.0, 3.0], vector![1.0, 0.0]);
    assert_eq!(r.min, vector![1.0, 0.0]);
    assert_eq!(r.max, vector![2.0, 3.0]);

    let line = Rect::enclosing([vector![0.0, 1.0], vector![4.0, 1.0]]).unwrap();
    assert!(line.height().abs() < EPS);
    let padded = line.padded_to(0.5, EPS);
    assert!((padded.height() - 0.5).abs() < 1e-12);
    assert!((padded.width() - 4.0).abs() < 1e-12);
    assert!((padded.center().y - 1.0).abs() < 1e-12);
}

#[test]
fn validate_rejects_bad_loops() {
    assert_eq!(
        validate_polygon(&Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0)]), EPS),
        Err(PolygonDefect::TooFewVertices(2))
    );
    let bowtie = Polygon::from_xy(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
    assert!(matches!(
        validate_polygon(&bowtie, EPS),
        Err(PolygonDefect::SelfIntersecting(_, _))
    ));
    let flat = Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    assert!(validate_polygon(&flat, EPS).is_err());
    let nan = Polygon::from_xy(&[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)]);
    assert_eq!(validate_polygon(&nan, EPS), Err(PolygonDefect::NonFinite(1)));
}

#[test]
fn validate_strips_explicit_closing_vertex() {
    let closed = Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
    let ok = validate_polygon(&closed, EPS).unwrap();
    assert_eq!(ok.len(), 3);
    assert!((ok.area() - 0.5).abs() < 1e-12);
}

#[test]
fn clip_square_against_rect() {
    let hole = Polygon::from_xy(&[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)]);
    let zone = Rect::new(vector![2.0, 0.0], vector![5.0, 5.0]);
    assert!((area_inside_rect(&hole, &zone) - 2.0).abs() < 1e-12);
    let far = Rect::new(vector![10.0, 10.0], vector![11.0, 11.0]);
    assert_eq!(area_inside_rect(&hole, &far), 0.0);
    let covering = Rect::new(vector![0.0, 0.0], vector![4.0, 4.0]);
    assert!((area_inside_rect(&hole, &covering) - 4.0).abs() < 1e-12);
}

#[test]
fn clip_triangle_keeps_area_fraction() {
    let tri = Polygon::from_xy(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
    let left = Rect::new(vector![0.0, 0.0], vector![2.0, 4.0]);
    // area of triangle with x <= 2: 8 - 2 = 6
    assert!((area_inside_rect(&tri, &left) - 6.0).abs() < 1e-12);
    let as_poly = rect_polygon(&left);
    assert!((as_poly.area() - left.area()).abs() < 1e-12);
}
