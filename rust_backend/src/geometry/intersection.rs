//! Intersection primitives and overlap predicates.
//!
//! Every function takes an explicit [`Tolerance`]; comparisons are inclusive,
//! so touching shapes intersect. Nothing in here logs: outcomes are returned
//! as values or [`GeometryError`]s.

use super::shapes::{Circle, GeometryError, Point, Rectangle, Segment, Tolerance};

/// Inclusive bounding-box test of `p` against `segment`.
///
/// The caller guarantees `p` lies on the segment's infinite line; debug
/// builds check that guarantee.
pub fn point_on_segment(p: Point, segment: &Segment, tol: Tolerance) -> bool {
    debug_assert!(
        {
            let d = segment.direction();
            let len = d.norm();
            len == 0.0 || (d.cross(p - segment.start) / len).abs() <= 1e-6_f64.max(tol.eps())
        },
        "point {:?} is not on the line through {:?}",
        p,
        segment
    );
    tol.within(p.x, segment.start.x, segment.end.x)
        && tol.within(p.y, segment.start.y, segment.end.y)
}

/// Points where `circle`'s boundary meets `segment`.
///
/// Solves `|s + t·v - c|² = r²` for `t`. A tangent line yields a single
/// point; roots outside the segment are dropped.
///
/// # Errors
///
/// [`GeometryError::DegenerateSegment`] when the segment has no length.
pub fn circle_segment_intersection(
    circle: &Circle,
    segment: &Segment,
    tol: Tolerance,
) -> Result<Vec<Point>, GeometryError> {
    let v = segment.direction();
    if tol.is_zero(v.norm()) {
        return Err(GeometryError::DegenerateSegment);
    }

    let w = segment.start - circle.center;
    let a = v.dot(v);
    let b = 2.0 * v.dot(w);
    let c = w.dot(w) - circle.radius * circle.radius;
    let discriminant = b * b - 4.0 * a * c;

    // Closest approach of the infinite line decides tangency, which keeps the
    // discriminant's mm^4 scale out of the tolerance.
    let t_closest = -b / (2.0 * a);
    let closest = segment.start + v * t_closest;
    let roots: Vec<f64> = if tol.eq(closest.distance(circle.center), circle.radius) {
        vec![t_closest]
    } else if discriminant < 0.0 {
        return Ok(Vec::new());
    } else {
        let sqrt_d = discriminant.sqrt();
        vec![(-b - sqrt_d) / (2.0 * a), (-b + sqrt_d) / (2.0 * a)]
    };

    let mut points: Vec<Point> = Vec::with_capacity(2);
    for t in roots {
        let p = segment.start + v * t;
        if point_on_segment(p, segment, tol) {
            push_unique(&mut points, p, tol);
        }
    }
    Ok(points)
}

/// Union of the circle/segment intersections over the rectangle's four sides,
/// in side order, with duplicates (corner hits) removed.
pub fn circle_rectangle_intersection(
    circle: &Circle,
    rectangle: &Rectangle,
    tol: Tolerance,
) -> Result<Vec<Point>, GeometryError> {
    let mut points = Vec::new();
    for side in rectangle.sides() {
        for p in circle_segment_intersection(circle, &side, tol)? {
            push_unique(&mut points, p, tol);
        }
    }
    Ok(points)
}

/// Intersection point of two segments.
///
/// * both vertical: a point only when they are collinear and touch at one end
/// * one vertical: its x substituted into the other's line
/// * differing slopes: the crossing of the two lines
/// * parallel: a point only when collinear and touching at one end
///
/// Operands are put in a canonical order first, so the result does not
/// depend on argument order.
///
/// # Errors
///
/// * [`GeometryError::DegenerateSegment`] for a zero-length segment
/// * [`GeometryError::CoincidentSegments`] when the segments share a stretch
pub fn segment_intersection(
    first: &Segment,
    second: &Segment,
    tol: Tolerance,
) -> Result<Option<Point>, GeometryError> {
    if tol.is_zero(first.length()) || tol.is_zero(second.length()) {
        return Err(GeometryError::DegenerateSegment);
    }

    let (s1, s2) = canonical_pair(first, second);

    match (s1.line(tol), s2.line(tol)) {
        (None, None) => {
            if !tol.eq(s1.start.x, s2.start.x) {
                return Ok(None);
            }
            collinear_overlap(s1.start.y, s1.end.y, s2.start.y, s2.end.y, tol)
                .map(|hit| hit.map(|y| Point::new(s1.start.x, y)))
        }
        (None, Some(line)) | (Some(line), None) => {
            let (vertical, other) = if s1.is_vertical(tol) {
                (&s1, &s2)
            } else {
                (&s2, &s1)
            };
            let x = vertical.start.x;
            let p = Point::new(x, line.y_at(x));
            let hit = tol.within(p.y, vertical.start.y, vertical.end.y)
                && point_on_segment(p, other, tol);
            Ok(hit.then_some(p))
        }
        (Some(l1), Some(l2)) => {
            let d1 = s1.direction();
            let d2 = s2.direction();
            let denom = d1.cross(d2);
            if denom.abs() <= tol.eps() * d1.norm() * d2.norm() {
                // Parallel: collinear only when the intercepts agree.
                if !tol.eq(l1.intercept, l2.intercept) {
                    return Ok(None);
                }
                return collinear_overlap(s1.start.x, s1.end.x, s2.start.x, s2.end.x, tol)
                    .map(|hit| hit.map(|x| Point::new(x, l1.y_at(x))));
            }
            let offset = s2.start - s1.start;
            let t = offset.cross(d2) / denom;
            let u = offset.cross(d1) / denom;
            let slack_t = tol.eps() / d1.norm();
            let slack_u = tol.eps() / d2.norm();
            if t < -slack_t || t > 1.0 + slack_t || u < -slack_u || u > 1.0 + slack_u {
                return Ok(None);
            }
            let p = s1.start + d1 * t;
            Ok((point_on_segment(p, &s1, tol) && point_on_segment(p, &s2, tol)).then_some(p))
        }
    }
}

// ============================================================================
// Overlap predicates
// ============================================================================

pub fn circles_overlap(a: &Circle, b: &Circle, tol: Tolerance) -> bool {
    tol.le(a.center.distance(b.center), a.radius + b.radius)
}

/// True when the circle and rectangle share any area, including one lying
/// entirely inside the other.
pub fn circle_overlaps_rectangle(circle: &Circle, rectangle: &Rectangle, tol: Tolerance) -> bool {
    let boundary_hit = circle_rectangle_intersection(circle, rectangle, tol)
        .map(|points| !points.is_empty())
        .unwrap_or(false);
    boundary_hit
        || rectangle.contains(circle.center, tol)
        || rectangle
            .corners()
            .iter()
            .any(|&corner| circle.contains(corner, tol))
}

/// True when two rectangles share any area, including containment.
pub fn rectangles_overlap(a: &Rectangle, b: &Rectangle, tol: Tolerance) -> bool {
    let sides_a = a.sides();
    let sides_b = b.sides();
    let edges_cross = sides_a.iter().any(|sa| {
        sides_b.iter().any(|sb| {
            matches!(
                segment_intersection(sa, sb, tol),
                Ok(Some(_)) | Err(GeometryError::CoincidentSegments)
            )
        })
    });
    edges_cross
        || a.corners().iter().any(|&p| b.contains(p, tol))
        || b.corners().iter().any(|&p| a.contains(p, tol))
}

// ============================================================================
// Helpers
// ============================================================================

fn push_unique(points: &mut Vec<Point>, p: Point, tol: Tolerance) {
    if !points.iter().any(|q| q.approx_eq(p, tol)) {
        points.push(p);
    }
}

fn canonical_pair(first: &Segment, second: &Segment) -> (Segment, Segment) {
    let a = first.canonical();
    let b = second.canonical();
    let order = a
        .start
        .lex_cmp(b.start)
        .then_with(|| a.end.lex_cmp(b.end));
    if order.is_gt() {
        (b, a)
    } else {
        (a, b)
    }
}

/// Overlap of two collinear 1-D ranges: a single shared coordinate, nothing,
/// or a stretch.
fn collinear_overlap(
    a0: f64,
    a1: f64,
    b0: f64,
    b1: f64,
    tol: Tolerance,
) -> Result<Option<f64>, GeometryError> {
    let lo = a0.min(a1).max(b0.min(b1));
    let hi = a0.max(a1).min(b0.max(b1));
    if tol.lt(hi, lo) {
        Ok(None)
    } else if tol.eq(lo, hi) {
        Ok(Some(lo))
    } else {
        Err(GeometryError::CoincidentSegments)
    }
}
