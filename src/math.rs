//! Mathematical structs and functions.

use cgmath::prelude::*;
use cgmath::{Point2, Vector2};

/// A 2D point, in cm.
pub type Point2d = Point2<f64>;

/// A 2D vector, in cm.
pub type Vector2d = Vector2<f64>;

/// Creates a point from integer map coordinates in cm.
pub fn point_cm(x: i32, y: i32) -> Point2d {
    Point2d::new(x as f64, y as f64)
}

/// The straight-line distance between two points in cm.
pub fn straight_line(a: Point2d, b: Point2d) -> f64 {
    a.distance(b)
}

/// Interpolates the point a fraction `t` of the way from `a` to `b`.
pub fn lerp(a: Point2d, b: Point2d, t: f64) -> Point2d {
    a + (b - a) * t
}
