#![forbid(unsafe_code)]

use std::f64::consts::TAU;

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn size(width: f64, height: f64) -> Size {
    euclid::size2(width, height)
}

/// Rectangle of the given size centered on `center`.
pub fn centered_rect(center: Point, extent: Size) -> Rect {
    Rect::new(
        point(center.x - extent.width / 2.0, center.y - extent.height / 2.0),
        extent,
    )
}

pub fn half_diagonal(extent: Size) -> f64 {
    extent.width.hypot(extent.height) / 2.0
}

/// Normalizes an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // `rem_euclid` can round up to exactly TAU for tiny negative inputs.
    if a >= TAU { 0.0 } else { a }
}

/// Polar offset with an independent stretch per axis (1.0/1.0 is a plain circle).
pub fn polar(angle: f64, radius: f64, stretch_x: f64, stretch_y: f64) -> Vector {
    vector(
        angle.cos() * radius * stretch_x,
        angle.sin() * radius * stretch_y,
    )
}

/// Like `f64::clamp`, but never panics when `min > max` (degenerate bounds resolve to `min`).
pub fn clamp_f64(v: f64, min: f64, max: f64) -> f64 {
    v.min(max).max(min)
}

/// Clamps `p` into `bounds` (inclusive on every edge).
pub fn clamp_point(p: Point, bounds: &Rect) -> Point {
    point(
        clamp_f64(p.x, bounds.min_x(), bounds.max_x()),
        clamp_f64(p.y, bounds.min_y(), bounds.max_y()),
    )
}

/// Strict interior test: points on an edge are not inside.
pub fn strictly_inside(p: Point, r: &Rect) -> bool {
    p.x > r.min_x() && p.x < r.max_x() && p.y > r.min_y() && p.y < r.max_y()
}

/// Strict overlap test: rectangles that only touch do not intersect.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.min_x() < b.max_x() && a.max_x() > b.min_x() && a.min_y() < b.max_y() && a.max_y() > b.min_y()
}
