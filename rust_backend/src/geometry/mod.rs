//! Geometry kernel for the plate.
//!
//! # Components
//!
//! - [`shapes`]: points, circles, segments, lines and oriented rectangles
//! - [`intersection`]: intersection primitives and area-overlap predicates
//!
//! # Example
//!
//! ```
//! use hector_obs::geometry::{circle_segment_intersection, Circle, Point, Segment, Tolerance};
//! use qtty::Radians;
//!
//! let circle = Circle::new(Point::ORIGIN, 1.0, Radians::new(0.0)).unwrap();
//! let segment = Segment::new(Point::new(-2.0, 0.0), Point::new(2.0, 0.0));
//! let hits = circle_segment_intersection(&circle, &segment, Tolerance::default()).unwrap();
//! assert_eq!(hits.len(), 2);
//! ```

pub mod intersection;
pub mod shapes;

pub use intersection::{
    circle_overlaps_rectangle, circle_rectangle_intersection, circle_segment_intersection,
    circles_overlap, point_on_segment, rectangles_overlap, segment_intersection,
};
pub use shapes::{
    Circle, GeometryError, Line, Point, Rectangle, Segment, Tolerance, DEFAULT_TOLERANCE,
};

#[cfg(test)]
mod intersection_tests;
