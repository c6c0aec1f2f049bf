//! Geometry kernel for tree segments.
//!
//! Angles use the mathematical convention (0 along +x, growing
//! counter-clockwise) while points live in sink coordinates where y grows
//! downward. The y-terms below are therefore subtracted when moving along
//! a growth direction.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use rand::Rng;

/// Margin kept between the two child angles so they never coincide.
pub const MIN_CHILD_SPREAD: f32 = PI / 16.0;

/// The four corners of a segment's tapered body.
///
/// Corners are listed in drawing order: base-left, top-left, top-right,
/// base-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaperedQuad {
    pub base_left: Vec2,
    pub top_left: Vec2,
    pub top_right: Vec2,
    pub base_right: Vec2,
}

impl TaperedQuad {
    pub fn points(&self) -> [Vec2; 4] {
        [self.base_left, self.top_left, self.top_right, self.base_right]
    }

    pub fn base_mid(&self) -> Vec2 {
        (self.base_left + self.base_right) * 0.5
    }

    pub fn top_mid(&self) -> Vec2 {
        (self.top_left + self.top_right) * 0.5
    }
}

/// Draws a uniform sample from `[low, high)`.
///
/// A degenerate range (`low == high`) returns `low` while still consuming
/// one draw, so the random stream stays aligned whatever the parameters.
#[inline]
pub fn uniform_between(rng: &mut impl Rng, low: f32, high: f32) -> f32 {
    rng.random::<f32>() * (high - low) + low
}

/// Midpoint of a segment's tip edge.
///
/// `end = mid + length * (cos(angle), -sin(angle))`.
#[inline]
pub fn compute_end_anchor(mid_anchor: Vec2, length: f32, angle: f32) -> Vec2 {
    Vec2::new(
        mid_anchor.x + length * angle.cos(),
        mid_anchor.y - length * angle.sin(),
    )
}

/// The tip edge of a segment: perpendicular to the growth direction,
/// centered on `mid_end`, `width` across.
///
/// ### Returns
/// `(left, right)` as seen when facing along the growth direction from
/// below, i.e. the order the render sink expects for top-left/top-right.
#[inline]
pub fn compute_top_base(mid_end: Vec2, width: f32, angle: f32) -> (Vec2, Vec2) {
    let half = width / 2.0;
    let c = (FRAC_PI_2 - angle).cos();
    let s = (FRAC_PI_2 - angle).sin();
    let offset = Vec2::new(half * c, half * s);
    (mid_end - offset, mid_end + offset)
}

/// Picks the growth directions of the two children of a segment.
///
/// The outer bounds are `parent + delta_max` and `parent - delta_min`. A
/// random `diff` from `[0, bound_spread - π/16]` pulls both children
/// symmetrically inward from those bounds. When the bounds are closer than
/// `π/16` the draw collapses to zero and the children sit on the bounds.
///
/// ### Returns
/// `(angle1, angle2)`, with `angle1` the counter-clockwise child.
pub fn next_angles(
    rng: &mut impl Rng,
    parent_angle: f32,
    delta_min: f32,
    delta_max: f32,
) -> (f32, f32) {
    let angle_max = parent_angle + delta_max;
    let angle_min = parent_angle - delta_min;
    let room = (angle_max - angle_min - MIN_CHILD_SPREAD).max(0.0);
    let diff = uniform_between(rng, 0.0, room);
    (angle_max - diff / 2.0, angle_min + diff / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const EPS: f32 = 1e-4;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < EPS
    }

    #[test]
    fn end_anchor_moves_up_in_sink_coordinates_for_upward_angle() {
        let end = compute_end_anchor(Vec2::new(512.0, 1024.0), 100.0, FRAC_PI_2);
        assert!(close(end, Vec2::new(512.0, 924.0)), "end = {end:?}");

        let end = compute_end_anchor(Vec2::new(0.0, 0.0), 10.0, 0.0);
        assert!(close(end, Vec2::new(10.0, 0.0)), "end = {end:?}");

        let end = compute_end_anchor(Vec2::new(0.0, 0.0), 10.0, -FRAC_PI_2);
        assert!(close(end, Vec2::new(0.0, 10.0)), "end = {end:?}");
    }

    #[test]
    fn top_base_is_perpendicular_and_centered() {
        let mid = Vec2::new(3.0, -7.0);
        for angle in [0.0, 0.3, FRAC_PI_2, 2.0, PI, -1.2] {
            let (left, right) = compute_top_base(mid, 8.0, angle);

            assert!(close((left + right) * 0.5, mid));
            assert!(((right - left).length() - 8.0).abs() < EPS);

            let dir = Vec2::new(angle.cos(), -angle.sin());
            assert!((right - left).dot(dir).abs() < EPS, "angle {angle}");
        }
    }

    #[test]
    fn top_base_keeps_left_on_the_left_when_growing_up() {
        let (left, right) = compute_top_base(Vec2::new(512.0, 924.0), 25.0, FRAC_PI_2);
        assert!(close(left, Vec2::new(499.5, 924.0)), "left = {left:?}");
        assert!(close(right, Vec2::new(524.5, 924.0)), "right = {right:?}");
    }

    #[test]
    fn kernel_is_pure() {
        let mid = Vec2::new(12.5, 40.25);
        let a = compute_end_anchor(mid, 33.3, 1.1);
        let b = compute_end_anchor(mid, 33.3, 1.1);
        assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));

        let (l1, r1) = compute_top_base(a, 7.0, 1.1);
        let (l2, r2) = compute_top_base(b, 7.0, 1.1);
        assert_eq!(l1.to_array().map(f32::to_bits), l2.to_array().map(f32::to_bits));
        assert_eq!(r1.to_array().map(f32::to_bits), r2.to_array().map(f32::to_bits));
    }

    #[test]
    fn next_angles_stay_inside_bounds_and_apart() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let parent = FRAC_PI_2;
        let (dmin, dmax) = (PI / 4.0, PI / 6.0);

        for _ in 0..1000 {
            let (a1, a2) = next_angles(&mut rng, parent, dmin, dmax);
            assert!(a1 <= parent + dmax + EPS && a1 >= parent - dmin - EPS);
            assert!(a2 <= parent + dmax + EPS && a2 >= parent - dmin - EPS);
            assert!(a1 - a2 >= MIN_CHILD_SPREAD - EPS, "a1={a1} a2={a2}");
        }
    }

    #[test]
    fn next_angles_collapse_to_bounds_when_spread_is_too_small() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (a1, a2) = next_angles(&mut rng, 1.0, 0.01, 0.01);
        assert!((a1 - 1.01).abs() < EPS);
        assert!((a2 - 0.99).abs() < EPS);
    }

    #[test]
    fn uniform_between_respects_range_and_pins_degenerate_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..1000 {
            let v = uniform_between(&mut rng, 2.0, 5.0);
            assert!((2.0..=5.0).contains(&v));
        }
        assert_eq!(uniform_between(&mut rng, 0.7, 0.7), 0.7);
    }

    #[test]
    fn quad_midpoints() {
        let quad = TaperedQuad {
            base_left: Vec2::new(0.0, 10.0),
            top_left: Vec2::new(1.0, 0.0),
            top_right: Vec2::new(3.0, 0.0),
            base_right: Vec2::new(4.0, 10.0),
        };
        assert_eq!(quad.base_mid(), Vec2::new(2.0, 10.0));
        assert_eq!(quad.top_mid(), Vec2::new(2.0, 0.0));
        assert_eq!(quad.points()[2], Vec2::new(3.0, 0.0));
    }
}
