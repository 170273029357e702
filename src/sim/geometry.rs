//! Collision primitives and small vector helpers
//!
//! Rectangles are centered: `center` plus full `size`, matching how bases
//! and the Nexus store their footprint.

use glam::Vec2;

/// Circle-circle overlap (touching counts as a hit)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

/// Closest point on a centered rectangle to `p`
#[inline]
pub fn closest_point_on_rect(p: Vec2, center: Vec2, size: Vec2) -> Vec2 {
    let half = size * 0.5;
    p.clamp(center - half, center + half)
}

/// Circle vs centered rectangle overlap
#[inline]
pub fn circle_rect_overlap(c: Vec2, radius: f32, center: Vec2, size: Vec2) -> bool {
    let closest = closest_point_on_rect(c, center, size);
    c.distance_squared(closest) <= radius * radius
}

/// Distance from a point to the edge of a centered rectangle (0 inside)
#[inline]
pub fn point_rect_distance(p: Vec2, center: Vec2, size: Vec2) -> f32 {
    let half = size * 0.5;
    let d = ((p - center).abs() - half).max(Vec2::ZERO);
    d.length()
}

/// Move `pos` toward `target` by at most `max_step`, never overshooting
#[inline]
pub fn step_toward(pos: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let delta = target - pos;
    let dist = delta.length();
    if dist <= max_step || dist <= f32::EPSILON {
        target
    } else {
        pos + delta / dist * max_step
    }
}
