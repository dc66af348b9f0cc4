#[cfg(test)]
mod tests {
    use crate::geometry::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use qtty::Radians;

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    fn circle(x: f64, y: f64, r: f64) -> Circle {
        Circle::new(Point::new(x, y), r, Radians::new(0.0)).unwrap()
    }

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    fn contains_point(points: &[Point], x: f64, y: f64) -> bool {
        points
            .iter()
            .any(|p| p.approx_eq(Point::new(x, y), Tolerance(1e-9)))
    }

    // ==================== Circle / segment ====================

    #[test]
    fn test_horizontal_chord_through_centre() {
        let c = circle(0.0, 0.0, 1.0);
        let hits = circle_segment_intersection(&c, &seg(-2.0, 0.0, 2.0, 0.0), tol()).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(contains_point(&hits, -1.0, 0.0));
        assert!(contains_point(&hits, 1.0, 0.0));
    }

    #[test]
    fn test_tangent_segment_yields_single_point() {
        let c = circle(0.0, 0.0, 1.0);
        let hits = circle_segment_intersection(&c, &seg(-2.0, 1.0, 2.0, 1.0), tol()).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(contains_point(&hits, 0.0, 1.0));
    }

    #[test]
    fn test_segment_missing_circle() {
        let c = circle(0.0, 0.0, 1.0);
        let hits = circle_segment_intersection(&c, &seg(-2.0, 3.0, 2.0, 3.0), tol()).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_segment_ending_on_boundary_is_accepted() {
        let c = circle(0.0, 0.0, 1.0);
        let hits = circle_segment_intersection(&c, &seg(-3.0, 0.0, -1.0, 0.0), tol()).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(contains_point(&hits, -1.0, 0.0));
    }

    #[test]
    fn test_segment_inside_circle_has_no_boundary_points() {
        let c = circle(0.0, 0.0, 5.0);
        let hits = circle_segment_intersection(&c, &seg(-1.0, 0.0, 1.0, 0.0), tol()).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_degenerate_segment_is_an_error() {
        let c = circle(0.0, 0.0, 1.0);
        let err = circle_segment_intersection(&c, &seg(0.5, 0.5, 0.5, 0.5), tol()).unwrap_err();
        assert_eq!(err, GeometryError::DegenerateSegment);
    }

    // ==================== Circle / rectangle ====================

    #[test]
    fn test_inscribed_circle_touches_each_side_once() {
        let rect = Rectangle::new(Point::ORIGIN, 2.0, 2.0, Radians::new(0.0)).unwrap();
        let hits = circle_rectangle_intersection(&circle(0.0, 0.0, 1.0), &rect, tol()).unwrap();
        assert_eq!(hits.len(), 4);
        for (x, y) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
            assert!(contains_point(&hits, x, y), "missing ({}, {})", x, y);
        }
    }

    #[test]
    fn test_circle_well_inside_rectangle() {
        let rect = Rectangle::new(Point::ORIGIN, 4.0, 4.0, Radians::new(0.0)).unwrap();
        let c = circle(0.0, 0.0, 1.0);
        let hits = circle_rectangle_intersection(&c, &rect, tol()).unwrap();
        assert!(hits.is_empty());
        assert!(circle_overlaps_rectangle(&c, &rect, tol()));
    }

    #[test]
    fn test_rectangle_sides_agree_with_direct_intersection() {
        let rect = Rectangle::new(Point::new(0.3, -0.2), 3.0, 1.5, Radians::new(0.7)).unwrap();
        let c = circle(0.5, 0.1, 1.2);
        let direct = circle_rectangle_intersection(&c, &rect, tol()).unwrap();

        let mut via_sides: Vec<Point> = Vec::new();
        for side in rect.sides() {
            for p in circle_segment_intersection(&c, &side, tol()).unwrap() {
                if !via_sides.iter().any(|q| q.approx_eq(p, tol())) {
                    via_sides.push(p);
                }
            }
        }
        assert_eq!(direct.len(), via_sides.len());
        for p in &via_sides {
            assert!(direct.iter().any(|q| q.approx_eq(*p, Tolerance(1e-9))));
        }
    }

    #[test]
    fn test_rectangle_corners_are_cyclic() {
        let rect = Rectangle::new(Point::new(10.0, 0.0), 4.0, 2.0, Radians::new(0.0)).unwrap();
        let c = rect.corners();
        assert!(c[0].approx_eq(Point::new(8.0, -1.0), tol()));
        assert!(c[1].approx_eq(Point::new(12.0, -1.0), tol()));
        assert!(c[2].approx_eq(Point::new(12.0, 1.0), tol()));
        assert!(c[3].approx_eq(Point::new(8.0, 1.0), tol()));
    }

    #[test]
    fn test_zero_area_rectangle_is_rejected() {
        let err = Rectangle::new(Point::ORIGIN, 0.0, 2.0, Radians::new(0.0)).unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateRectangle { .. }));
    }

    #[test]
    fn test_non_positive_radius_is_rejected() {
        assert!(Circle::new(Point::ORIGIN, 0.0, Radians::new(0.0)).is_err());
        assert!(Circle::new(Point::ORIGIN, f64::NAN, Radians::new(0.0)).is_err());
    }

    // ==================== Segment / segment ====================

    #[test]
    fn test_crossing_diagonals() {
        let p = segment_intersection(&seg(0.0, 0.0, 2.0, 2.0), &seg(0.0, 2.0, 2.0, 0.0), tol())
            .unwrap()
            .unwrap();
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_one_vertical_segment() {
        let p = segment_intersection(&seg(1.0, -1.0, 1.0, 1.0), &seg(0.0, 0.0, 2.0, 0.5), tol())
            .unwrap()
            .unwrap();
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_one_vertical_segment_out_of_range() {
        let (a, b) = (seg(1.0, 2.0, 1.0, 3.0), seg(0.0, 0.0, 2.0, 0.5));
        let hit = segment_intersection(&a, &b, tol()).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_vertical_non_collinear_segments_do_not_intersect() {
        let (a, b) = (seg(0.0, 0.0, 0.0, 1.0), seg(1.0, 0.0, 1.0, 1.0));
        let hit = segment_intersection(&a, &b, tol()).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_vertical_collinear_touching_end_to_end() {
        let p = segment_intersection(&seg(0.0, 0.0, 0.0, 1.0), &seg(0.0, 1.0, 0.0, 2.0), tol())
            .unwrap()
            .unwrap();
        assert!(p.approx_eq(Point::new(0.0, 1.0), tol()));
    }

    #[test]
    fn test_vertical_collinear_overlap_is_coincident() {
        let (a, b) = (seg(0.0, 0.0, 0.0, 2.0), seg(0.0, 1.0, 0.0, 3.0));
        let err = segment_intersection(&a, &b, tol()).unwrap_err();
        assert_eq!(err, GeometryError::CoincidentSegments);
    }

    #[test]
    fn test_parallel_offset_segments() {
        let (a, b) = (seg(0.0, 0.0, 2.0, 1.0), seg(0.0, 1.0, 2.0, 2.0));
        let hit = segment_intersection(&a, &b, tol()).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_parallel_collinear_overlap_is_coincident() {
        let (a, b) = (seg(0.0, 0.0, 2.0, 2.0), seg(1.0, 1.0, 3.0, 3.0));
        let err = segment_intersection(&a, &b, tol()).unwrap_err();
        assert_eq!(err, GeometryError::CoincidentSegments);
    }

    #[test]
    fn test_segments_sharing_an_endpoint() {
        let p = segment_intersection(&seg(0.0, 0.0, 1.0, 1.0), &seg(1.0, 1.0, 2.0, 0.0), tol())
            .unwrap()
            .unwrap();
        assert!(p.approx_eq(Point::new(1.0, 1.0), Tolerance(1e-12)));
    }

    // ==================== Overlap predicates ====================

    #[test]
    fn test_rectangle_inside_rectangle_overlaps() {
        let outer = Rectangle::new(Point::ORIGIN, 10.0, 10.0, Radians::new(0.0)).unwrap();
        let inner = Rectangle::new(Point::new(1.0, 1.0), 1.0, 1.0, Radians::new(0.3)).unwrap();
        assert!(rectangles_overlap(&outer, &inner, tol()));
        assert!(rectangles_overlap(&inner, &outer, tol()));
    }

    #[test]
    fn test_separated_rectangles_do_not_overlap() {
        let a = Rectangle::new(Point::ORIGIN, 2.0, 2.0, Radians::new(0.0)).unwrap();
        let b = Rectangle::new(Point::new(5.0, 0.0), 2.0, 2.0, Radians::new(0.785)).unwrap();
        assert!(!rectangles_overlap(&a, &b, tol()));
    }

    #[test]
    fn test_rectangles_sharing_an_edge_overlap() {
        let a = Rectangle::new(Point::ORIGIN, 2.0, 2.0, Radians::new(0.0)).unwrap();
        let b = Rectangle::new(Point::new(2.0, 0.0), 2.0, 2.0, Radians::new(0.0)).unwrap();
        assert!(rectangles_overlap(&a, &b, tol()));
    }

    #[test]
    fn test_rectangle_inside_circle_overlaps() {
        let rect = Rectangle::new(Point::new(0.5, 0.0), 0.2, 0.2, Radians::new(0.0)).unwrap();
        assert!(circle_overlaps_rectangle(&circle(0.0, 0.0, 3.0), &rect, tol()));
    }

    #[test]
    fn test_circles_touching_overlap() {
        assert!(circles_overlap(&circle(0.0, 0.0, 1.0), &circle(2.0, 0.0, 1.0), tol()));
        assert!(!circles_overlap(&circle(0.0, 0.0, 1.0), &circle(2.1, 0.0, 1.0), tol()));
    }

    #[test]
    fn test_view_reflection() {
        let c = circle(3.0, 4.0, 1.0);
        assert_eq!(c.view_center(), Point::new(-4.0, 3.0));
    }

    // ==================== Properties ====================

    fn any_segment() -> impl Strategy<Value = Segment> {
        (-100.0..100.0f64, -100.0..100.0f64, -100.0..100.0f64, -100.0..100.0f64)
            .prop_filter("segment needs length", |(x0, y0, x1, y1)| {
                (x1 - x0).hypot(y1 - y0) > 1e-3
            })
            .prop_map(|(x0, y0, x1, y1)| seg(x0, y0, x1, y1))
    }

    proptest! {
        #[test]
        fn prop_circle_hits_lie_on_circle_and_segment(
            cx in -50.0..50.0f64,
            cy in -50.0..50.0f64,
            r in 0.1..30.0f64,
            s in any_segment(),
        ) {
            let c = circle(cx, cy, r);
            let hits = circle_segment_intersection(&c, &s, tol()).unwrap();
            prop_assert!(hits.len() <= 2);
            for p in hits {
                prop_assert!((p.distance(c.center) - r).abs() <= 1e-6);
                prop_assert!(tol().within(p.x, s.start.x, s.end.x));
                prop_assert!(tol().within(p.y, s.start.y, s.end.y));
            }
        }

        #[test]
        fn prop_segment_intersection_is_symmetric(a in any_segment(), b in any_segment()) {
            prop_assert_eq!(
                segment_intersection(&a, &b, tol()),
                segment_intersection(&b, &a, tol())
            );
        }

        #[test]
        fn prop_reversed_segment_gives_same_point(a in any_segment(), b in any_segment()) {
            let reversed = Segment::new(a.end, a.start);
            prop_assert_eq!(
                segment_intersection(&a, &b, tol()),
                segment_intersection(&reversed, &b, tol())
            );
        }
    }
}
