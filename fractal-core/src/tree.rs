//! The tree growth engine.
//!
//! A [`Tree`] owns a [`SegmentQueue`] seeded with one trunk segment. Every
//! step pops one segment, draws it into a [`RenderSink`] and, unless the
//! children would be too short, queues two children on its tip edge. The
//! host decides when to step, so pausing is simply not calling
//! [`Tree::step`] or [`Tree::step_budgeted`].

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

use crate::{
    color::Color,
    config::GrowthParameters,
    error::GrowthError,
    geometry::{next_angles, uniform_between},
    queue::{InsertDiscipline, SegmentQueue},
    segment::{Segment, SegmentShape},
    sink::{FillStyle, LinearGradient, RenderSink},
};

type ChangeCallback = Box<dyn FnMut(&GrowthParameters)>;

pub struct Tree<R = ChaCha8Rng> {
    params: GrowthParameters,
    queue: SegmentQueue,
    rng: R,
    created: usize,
    halted: Option<GrowthError>,
    on_change: Option<ChangeCallback>,
}

impl Tree<ChaCha8Rng> {
    /// Creates a tree whose growth is fully determined by `seed`.
    ///
    /// ChaCha8's output is fixed across `rand` releases and platforms, so a
    /// seed names the same tree everywhere.
    pub fn seeded(
        start: Vec2,
        params: GrowthParameters,
        seed: u64,
    ) -> Result<Self, GrowthError> {
        Self::new(start, params, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Tree<R> {
    /// Creates a tree rooted at `start` with its trunk already queued.
    ///
    /// ### Parameters
    /// - `start` - Midpoint of the trunk's base edge, in sink coordinates.
    /// - `params` - Growth parameters; validated before anything is drawn.
    /// - `rng` - Source of every random decision the tree makes.
    ///
    /// ### Errors
    /// [`GrowthError::InvalidParameter`] if `params` fails
    /// [`GrowthParameters::validate`].
    pub fn new(start: Vec2, params: GrowthParameters, rng: R) -> Result<Self, GrowthError> {
        params.validate()?;
        let mut tree = Self {
            params,
            queue: SegmentQueue::new(),
            rng,
            created: 0,
            halted: None,
            on_change: None,
        };
        tree.reset(start);
        Ok(tree)
    }

    /// Registers a callback invoked after every accepted parameter change.
    pub fn with_change_callback(
        mut self,
        callback: impl FnMut(&GrowthParameters) + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Discards all pending work and seeds a fresh trunk at `start`.
    ///
    /// The random source is not rewound, so the new trunk continues the
    /// stream rather than repeating the previous tree.
    pub fn reset(&mut self, start: Vec2) {
        let length = uniform_between(
            &mut self.rng,
            self.params.trunk_length.start,
            self.params.trunk_length.end,
        );
        let width = uniform_between(
            &mut self.rng,
            self.params.trunk_width.start,
            self.params.trunk_width.end,
        );
        let color = self.root_color();

        self.queue.push_trunk(Segment::trunk(
            start,
            length,
            width,
            self.params.trunk_angle,
            color,
        ));
        self.created = 1;
        self.halted = None;

        debug!(x = start.x, y = start.y, length, width, "seeded tree");
    }

    pub fn params(&self) -> &GrowthParameters {
        &self.params
    }

    /// Replaces the parameter set; takes effect on the next step.
    ///
    /// ### Errors
    /// [`GrowthError::InvalidParameter`] if `params` is invalid. The current
    /// parameters are kept and the change callback is not invoked.
    pub fn set_params(&mut self, params: GrowthParameters) -> Result<(), GrowthError> {
        params.validate()?;
        debug!(?params, "growth parameters changed");
        self.params = params;
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.params);
        }
        Ok(())
    }

    /// Edits a copy of the current parameters and applies it through
    /// [`Tree::set_params`].
    pub fn update_params(
        &mut self,
        edit: impl FnOnce(&mut GrowthParameters),
    ) -> Result<(), GrowthError> {
        let mut params = self.params.clone();
        edit(&mut params);
        self.set_params(params)
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.queue.has_next()
    }

    /// Number of segments waiting to be drawn.
    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Segments created since the last reset, trunk included.
    #[inline]
    pub fn segments_created(&self) -> usize {
        self.created
    }

    /// The reason growth stopped early, if it did.
    pub fn halted(&self) -> Option<&GrowthError> {
        self.halted.as_ref()
    }

    /// Draws the next pending segment and queues its children.
    ///
    /// ### Returns
    /// `false` without drawing anything if no segment was pending.
    pub fn step(&mut self, sink: &mut impl RenderSink) -> bool {
        match self.queue.pop_next() {
            Some(segment) => {
                self.grow(segment, sink);
                true
            }
            None => false,
        }
    }

    /// Draws segments until their summed length reaches `budget` or the
    /// queue runs dry.
    ///
    /// Only the segment that crosses the budget can overshoot it; no
    /// segment is popped once the budget has been reached.
    ///
    /// ### Returns
    /// `true` while segments remain pending, `false` once the tree is fully
    /// grown (or halted) and the driver can stop requesting frames.
    pub fn step_budgeted(&mut self, budget: f32, sink: &mut impl RenderSink) -> bool {
        let mut drawn_length = 0.0;
        while drawn_length < budget {
            let Some(segment) = self.queue.pop_next() else {
                break;
            };
            drawn_length += segment.length;
            self.grow(segment, sink);
        }
        self.has_next()
    }

    fn root_color(&self) -> Color {
        match &self.params.gradient {
            Some(gradient) => gradient.root,
            None => self.params.color,
        }
    }

    fn grow(&mut self, segment: Segment, sink: &mut impl RenderSink) {
        let shape = segment.shape();
        let tip_color = match &self.params.gradient {
            Some(gradient) => gradient.branch_color(segment.length),
            None => self.params.color,
        };
        self.draw(&segment, &shape, tip_color, sink);

        let params = &self.params;
        let (angle1, angle2) = next_angles(
            &mut self.rng,
            segment.angle,
            params.delta_min,
            params.delta_max,
        );
        let width = uniform_between(
            &mut self.rng,
            segment.width * params.min_weight_reduction,
            segment.width * params.max_weight_reduction,
        );
        let length = uniform_between(
            &mut self.rng,
            segment.length * params.min_len_reduction,
            segment.length * params.max_len_reduction,
        );

        if length < params.final_length {
            trace!(length = segment.length, "terminal segment");
            self.log_if_done();
            return;
        }

        if self.created.saturating_add(2) > params.max_segments {
            let cap = params.max_segments;
            warn!(cap, created = self.created, "segment cap reached, halting growth");
            self.queue.clear();
            self.halted = Some(GrowthError::SegmentCapExceeded { cap });
            return;
        }

        let discipline = if self.rng.random::<f32>() < params.tail_append_probability {
            InsertDiscipline::Tail
        } else {
            InsertDiscipline::AfterCurrent
        };
        trace!(length = segment.length, child_length = length, ?discipline, "branched");

        self.queue.insert_pair(
            discipline,
            Segment::child(&shape, length, width, angle1, tip_color),
            Segment::child(&shape, length, width, angle2, tip_color),
        );
        self.created += 2;
    }

    fn draw(
        &self,
        segment: &Segment,
        shape: &SegmentShape,
        tip_color: Color,
        sink: &mut impl RenderSink,
    ) {
        if self.params.draw_with_lines {
            sink.set_line_width(segment.width);
            sink.set_stroke_color(tip_color);
            sink.stroke_line(segment.mid_anchor, shape.mid_end, segment.width, tip_color);
            return;
        }

        let fill = match &self.params.gradient {
            Some(_) => FillStyle::LinearGradient(LinearGradient::two_stop(
                segment.mid_anchor,
                shape.mid_end,
                segment.color,
                tip_color,
            )),
            None => FillStyle::Solid(tip_color),
        };
        sink.fill_tapered_quad(&shape.quad, fill);
    }

    fn log_if_done(&self) {
        if !self.queue.has_next() {
            debug!(segments = self.created, "tree fully grown");
        }
    }
}

impl<R> fmt::Debug for Tree<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("params", &self.params)
            .field("pending", &self.queue.len())
            .field("created", &self.created)
            .field("halted", &self.halted)
            .finish_non_exhaustive()
    }
}
