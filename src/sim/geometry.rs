//! Vector helpers for the play area
//!
//! Everything is guarded so zero-length vectors yield a neutral direction
//! instead of NaN.

use glam::Vec2;

/// Below this length a vector has no usable direction
pub const EPSILON: f32 = 1e-6;

/// Unit vector, or zero when `v` is (nearly) zero-length
#[inline]
pub fn safe_normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    if len < EPSILON || !len.is_finite() {
        Vec2::ZERO
    } else {
        v / len
    }
}

/// Unit vector pointing from `from` to `to`
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    safe_normalize(to - from)
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

#[inline]
pub fn distance_squared(a: Vec2, b: Vec2) -> f32 {
    (b - a).length_squared()
}

/// Counter-clockwise perpendicular
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Closest point to `p` on segment `a..b`
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Swept test: does the segment `a..b` pass within `radius` of `center`?
pub fn segment_circle_hit(center: Vec2, radius: f32, a: Vec2, b: Vec2) -> bool {
    let closest = closest_point_on_segment(center, a, b);
    distance_squared(center, closest) <= radius * radius
}

/// Circle-circle overlap (touching counts)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    distance_squared(a, b) <= r * r
}

/// Keep `pos` at least `pad` inside a `bounds`-sized rectangle anchored at the origin
pub fn clamp_to_bounds(pos: Vec2, bounds: Vec2, pad: f32) -> Vec2 {
    // A pad wider than the arena pins to the center rather than inverting the range
    let pad_x = pad.min(bounds.x / 2.0);
    let pad_y = pad.min(bounds.y / 2.0);
    Vec2::new(
        pos.x.clamp(pad_x, bounds.x - pad_x),
        pos.y.clamp(pad_y, bounds.y - pad_y),
    )
}
