use glam::Vec2;

use crate::{
    color::Color,
    geometry::{TaperedQuad, compute_end_anchor, compute_top_base},
};

/// One unit of growth: a tapered body plus what its children need.
///
/// The base edge (`base_left`..`base_right`) is shared with the parent's
/// tip edge, so consecutive segments join without steps. `width` is the
/// width of this segment's tip edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub base_left: Vec2,
    pub base_right: Vec2,
    pub mid_anchor: Vec2,
    pub length: f32,
    pub width: f32,
    pub angle: f32,
    /// Color at the base of the segment.
    pub color: Color,
}

/// The rendered outline of a segment and the anchor its children start from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentShape {
    pub quad: TaperedQuad,
    pub mid_end: Vec2,
}

impl Segment {
    /// Creates the trunk: a flat base `width` across, centered on `start`.
    pub fn trunk(start: Vec2, length: f32, width: f32, angle: f32, color: Color) -> Self {
        let half = Vec2::new(width / 2.0, 0.0);
        Self {
            base_left: start - half,
            base_right: start + half,
            mid_anchor: start,
            length,
            width,
            angle,
            color,
        }
    }

    pub fn shape(&self) -> SegmentShape {
        let mid_end = compute_end_anchor(self.mid_anchor, self.length, self.angle);
        let (top_left, top_right) = compute_top_base(mid_end, self.width, self.angle);
        SegmentShape {
            quad: TaperedQuad {
                base_left: self.base_left,
                top_left,
                top_right,
                base_right: self.base_right,
            },
            mid_end,
        }
    }

    /// A child growing out of this segment's tip edge.
    pub fn child(
        shape: &SegmentShape,
        length: f32,
        width: f32,
        angle: f32,
        color: Color,
    ) -> Self {
        Self {
            base_left: shape.quad.top_left,
            base_right: shape.quad.top_right,
            mid_anchor: shape.mid_end,
            length,
            width,
            angle,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn trunk_base_is_centered_on_start() {
        let trunk = Segment::trunk(Vec2::new(512.0, 1024.0), 100.0, 25.0, FRAC_PI_2, Color::BLACK);
        assert_eq!(trunk.base_left, Vec2::new(499.5, 1024.0));
        assert_eq!(trunk.base_right, Vec2::new(524.5, 1024.0));
        assert_eq!(trunk.mid_anchor, Vec2::new(512.0, 1024.0));
    }

    #[test]
    fn child_starts_on_parent_tip_edge() {
        let trunk = Segment::trunk(Vec2::new(0.0, 0.0), 50.0, 10.0, 1.0, Color::WHITE);
        let shape = trunk.shape();
        let child = Segment::child(&shape, 30.0, 6.0, 0.5, Color::BLACK);

        assert_eq!(child.base_left, shape.quad.top_left);
        assert_eq!(child.base_right, shape.quad.top_right);
        assert_eq!(child.mid_anchor, shape.mid_end);
        assert_eq!(child.color, Color::BLACK);

        let span = (shape.quad.top_mid() - shape.quad.base_mid()).length();
        assert!((span - 50.0).abs() < 1e-3, "span = {span}");
    }
}
