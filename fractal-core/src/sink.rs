//! Drawing intents emitted by the growth engine.
//!
//! The engine never touches pixels. It drives a [`RenderSink`], which a
//! host maps onto its own surface (a 2D canvas, an egui painter, a test
//! recorder). `Vec<DrawIntent>` is the recording sink.

use glam::Vec2;

use crate::{color::Color, geometry::TaperedQuad};

/// One color stop of a [`LinearGradient`]; `offset` is in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// A gradient running from `from` to `to`, constant perpendicular to that
/// axis.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub from: Vec2,
    pub to: Vec2,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    pub fn two_stop(from: Vec2, to: Vec2, start: Color, end: Color) -> Self {
        Self {
            from,
            to,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: start,
                },
                GradientStop {
                    offset: 1.0,
                    color: end,
                },
            ],
        }
    }

    /// Color of the gradient at `p`, for sinks that shade per vertex.
    ///
    /// `p` is projected onto the gradient axis; positions before the first
    /// stop or after the last one take that stop's color.
    pub fn sample(&self, p: Vec2) -> Color {
        let axis = self.to - self.from;
        let len2 = axis.length_squared();
        let t = if len2 > 0.0 {
            ((p - self.from).dot(axis) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let Some(first) = self.stops.first() else {
            return Color::BLACK;
        };
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
                return a.color.lerp(b.color, local);
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FillStyle {
    Solid(Color),
    LinearGradient(LinearGradient),
}

/// Receives the drawing primitives for each processed segment.
pub trait RenderSink {
    fn set_line_width(&mut self, width: f32);
    fn set_stroke_color(&mut self, color: Color);
    /// Fills the quad in corner order base-left, top-left, top-right,
    /// base-right.
    fn fill_tapered_quad(&mut self, quad: &TaperedQuad, fill: FillStyle);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
}

/// A recorded [`RenderSink`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawIntent {
    SetLineWidth(f32),
    SetStrokeColor(Color),
    FillTaperedQuad { quad: TaperedQuad, fill: FillStyle },
    StrokeLine {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
}

impl DrawIntent {
    /// `true` for intents that put geometry on the surface.
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::FillTaperedQuad { .. } | Self::StrokeLine { .. })
    }
}

impl RenderSink for Vec<DrawIntent> {
    fn set_line_width(&mut self, width: f32) {
        self.push(DrawIntent::SetLineWidth(width));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.push(DrawIntent::SetStrokeColor(color));
    }

    fn fill_tapered_quad(&mut self, quad: &TaperedQuad, fill: FillStyle) {
        self.push(DrawIntent::FillTaperedQuad { quad: *quad, fill });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.push(DrawIntent::StrokeLine {
            from,
            to,
            width,
            color,
        });
    }
}
