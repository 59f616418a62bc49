//! Geometry kernel: distances, angles, intersections and projections.
//!
//! Every function here is pure. Degenerate input (parallel lines, zero-length
//! segments, zero vectors) yields `None` instead of an error; callers treat
//! absence as "condition not met".

use kurbo::{Line, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Tolerance used for determinant and length checks.
pub const EPSILON: f64 = 1e-9;

/// Dominant axis of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Euclidean distance between two points.
pub fn distance(p1: Point, p2: Point) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

/// Classify a segment as horizontal when |dx| > |dy|, vertical otherwise.
///
/// Ties (including zero-length segments) are vertical.
pub fn orientation(line: Line) -> Orientation {
    let dx = line.p1.x - line.p0.x;
    let dy = line.p1.y - line.p0.y;
    if dx.abs() > dy.abs() {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    }
}

/// Direction from `p1` to `p2` in degrees, normalized to [0, 360).
pub fn angle(p1: Point, p2: Point) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;

    if dx == 0.0 {
        return if dy > 0.0 {
            90.0
        } else if dy < 0.0 {
            270.0
        } else {
            0.0
        };
    }
    if dy == 0.0 {
        return if dx > 0.0 { 0.0 } else { 180.0 };
    }

    let degrees = dy.atan2(dx).to_degrees();
    if degrees < 0.0 { degrees + 360.0 } else { degrees }
}

fn within_unit(t: f64) -> bool {
    (-EPSILON..=1.0 + EPSILON).contains(&t)
}

/// Crossing point of two lines.
///
/// Returns `None` when the lines are parallel or either is degenerate. With
/// `restrict_to_segment`, both crossing parameters must fall inside [0, 1].
pub fn intersect(l1: Line, l2: Line, restrict_to_segment: bool) -> Option<Point> {
    let d1 = l1.p1 - l1.p0;
    let d2 = l2.p1 - l2.p0;

    let det = d1.cross(d2);
    if det.abs() < EPSILON {
        return None;
    }

    let offset = l2.p0 - l1.p0;
    let t = offset.cross(d2) / det;
    let u = offset.cross(d1) / det;

    if restrict_to_segment && !(within_unit(t) && within_unit(u)) {
        return None;
    }

    Some(l1.p0 + d1 * t)
}

/// Orthogonal projection of `point` onto `line`.
///
/// Returns `None` for a zero-length line, or with `restrict_to_segment` when
/// the foot of the perpendicular falls outside the segment.
pub fn project(point: Point, line: Line, restrict_to_segment: bool) -> Option<Point> {
    let d = line.p1 - line.p0;
    let len_sq = d.hypot2();
    if len_sq < EPSILON {
        return None;
    }

    let t = (point - line.p0).dot(d) / len_sq;
    if restrict_to_segment && !within_unit(t) {
        return None;
    }

    Some(line.p0 + d * t)
}

/// Distance from `point` to the closest point of the segment, when the
/// perpendicular foot lies on it.
pub fn distance_to_segment(point: Point, line: Line) -> Option<f64> {
    project(point, line, true).map(|foot| distance(point, foot))
}

/// Rotate a vector counter-clockwise by `degrees`.
pub fn rotate(v: Vec2, degrees: f64) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Unit vector in the direction of `v`; `None` for the zero vector.
pub fn normalize(v: Vec2) -> Option<Vec2> {
    let len = v.hypot();
    if len < EPSILON {
        None
    } else {
        Some(v / len)
    }
}

/// Point at `length` from `origin` in direction `degrees`.
pub fn polar_to_cartesian(origin: Point, length: f64, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(origin.x + length * cos, origin.y + length * sin)
}
