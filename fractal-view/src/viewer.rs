//! Interactive fractal tree viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the growth engine (tree,
//! parameters, recorded draw intents) and implements [`eframe::App`] to
//! drive and render the growth through an egui UI.

use std::{cell::Cell, rc::Rc};

use eframe::App;
use fractal_core::{
    color::{Color, Gradient},
    config::GrowthParameters,
    error::GrowthError,
    sink::{DrawIntent, FillStyle},
    tree::Tree,
};
use glam::Vec2;
use rand::Rng;
use tracing::{info, warn};

/// Gap between the bottom of the canvas and the trunk's base.
const TRUNK_MARGIN: f32 = 40.0;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The growth engine: [`Tree`] and its [`GrowthParameters`].
/// - The recorded [`DrawIntent`]s, replayed every frame since egui does not
///   keep what was painted last frame.
/// - UI state (pan/zoom, timing, the parameter panel's working copy).
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input; push edited parameters to the tree.
/// 2. If `running` is `true` and enough time has passed, call
///    [`Viewer::step_once`], which grows one length budget.
/// 3. Replay all recorded intents onto the canvas.
///
/// ### Fields
/// - `tree` - The tree being grown.
/// - `params` - Working copy edited by the config panel.
/// - `intents` - Everything the tree has drawn since the last reset.
/// - `regrow` - Set by the tree's change callback when parameters change.
/// - `param_error` - Why the last parameter edit was rejected, if it was.
///
/// - `seed` - Seed of the current tree; reset regrows the same tree.
/// - `canvas_size` - Size of the drawing surface in sink units.
/// - `trunk_start` - Where the trunk is planted, in sink units.
///
/// - `running` - Whether growth is currently auto-advancing.
/// - `zoom` - Zoom factor on top of the fit-to-panel scale.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `step_interval` - Target time between automatic steps (seconds).
/// - `last_step_time` - Time stamp of the last step (egui time).
/// - `last_step_dt` - Actual time delta between the last two steps.
pub struct Viewer {
    tree: Tree,
    params: GrowthParameters,
    intents: Vec<DrawIntent>,
    regrow: Rc<Cell<bool>>,
    param_error: Option<String>,

    seed: u64,
    canvas_size: Vec2,
    trunk_start: Vec2,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer with a freshly seeded gradient tree on a 1024×1024
    /// canvas, ready to animate.
    ///
    /// ### Errors
    /// Propagates [`GrowthError`] if the initial tree cannot be built.
    pub fn new() -> Result<Self, GrowthError> {
        let canvas_size = Vec2::new(1024.0, 1024.0);
        let params = Self::default_params();
        let seed = rand::rng().random();
        let regrow = Rc::new(Cell::new(false));
        let trunk_start = Vec2::new(canvas_size.x / 2.0, canvas_size.y - TRUNK_MARGIN);
        let tree = Self::build_tree(trunk_start, &params, seed, &regrow)?;

        Ok(Self {
            tree,
            params,
            intents: Vec::with_capacity(1024),
            regrow,
            param_error: None,
            seed,
            canvas_size,
            trunk_start,
            running: true,
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            step_interval: 1.0 / 24.0,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    /// The parameter set a new viewer starts from: defaults in gradient mode.
    fn default_params() -> GrowthParameters {
        GrowthParameters {
            gradient: Some(Gradient::default()),
            ..Default::default()
        }
    }

    fn build_tree(
        start: Vec2,
        params: &GrowthParameters,
        seed: u64,
        regrow: &Rc<Cell<bool>>,
    ) -> Result<Tree, GrowthError> {
        let flag = Rc::clone(regrow);
        Ok(Tree::seeded(start, params.clone(), seed)?.with_change_callback(move |_| flag.set(true)))
    }

    /// Replants the tree with the current seed and parameters.
    ///
    /// Panel edits that fail validation are reported and the tree is
    /// replanted with the last accepted parameters instead. Recorded intents
    /// are dropped and auto-running stops only once a new tree is in place.
    fn reset(&mut self) {
        let params = match self.params.validate() {
            Ok(()) => self.params.clone(),
            Err(err) => {
                warn!(%err, "replanting with the last accepted parameters");
                self.param_error = Some(err.to_string());
                self.tree.params().clone()
            }
        };

        match Self::build_tree(self.trunk_start, &params, self.seed, &self.regrow) {
            Ok(tree) => self.tree = tree,
            Err(err) => {
                warn!(%err, "could not rebuild tree");
                self.param_error = Some(err.to_string());
                return;
            }
        }
        self.intents.clear();
        self.running = false;
    }

    /// Restores the panel to the parameters a new viewer starts with.
    fn reset_params(&mut self) {
        self.params = Self::default_params();
    }

    /// Picks a new random seed and replants.
    fn reseed(&mut self) {
        self.seed = rand::rng().random();
        info!(seed = self.seed, "reseeded");
        self.reset();
    }

    /// Moves the trunk to `start` (sink units) and replants.
    fn plant_at(&mut self, start: Vec2) {
        self.trunk_start = start;
        self.reset();
    }

    /// Grows one length budget worth of segments.
    ///
    /// Stops auto-running once the tree has nothing left to grow.
    fn step_once(&mut self) {
        let more = self
            .tree
            .step_budgeted(self.params.length_budget, &mut self.intents);
        if !more {
            self.finish();
        }
    }

    /// Grows the tree to completion in one go (a static render).
    fn grow_all(&mut self) {
        while self.tree.step(&mut self.intents) {}
        self.finish();
    }

    fn finish(&mut self) {
        self.running = false;
        match self.tree.halted() {
            Some(err) => warn!(%err, "growth halted"),
            None => info!(
                segments = self.tree.segments_created(),
                intents = self.intents.len(),
                "tree fully grown"
            ),
        }
    }

    /// Pushes panel edits to the tree and regrows if they were accepted.
    ///
    /// A running animation restarts from the trunk; otherwise the tree is
    /// regrown in full, like re-rendering a static image.
    fn apply_params(&mut self) {
        if self.params != *self.tree.params() {
            match self.tree.set_params(self.params.clone()) {
                Ok(()) => self.param_error = None,
                Err(err) => self.param_error = Some(err.to_string()),
            }
        }

        if self.regrow.replace(false) {
            let was_running = self.running;
            self.reset();
            if was_running {
                self.running = true;
            } else {
                self.grow_all();
            }
        }
    }

    /// Screen pixels per sink unit.
    fn scale(&self, rect: egui::Rect) -> f32 {
        let fit = (rect.width() / self.canvas_size.x).min(rect.height() / self.canvas_size.y);
        fit * self.zoom
    }

    /// Converts a sink-space position to screen-space.
    ///
    /// The canvas center is mapped to the center of `rect`, scaled by
    /// [`Viewer::scale`] and offset by `pan`. Both spaces have y pointing
    /// down, so no axis is flipped.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let scale = self.scale(rect);
        let local = (p - self.canvas_size / 2.0) * scale;
        egui::pos2(
            center.x + local.x + self.pan.x,
            center.y + local.y + self.pan.y,
        )
    }

    /// Converts a screen-space position back to sink-space.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to floating
    /// point rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let scale = self.scale(rect);
        let x = (p.x - center.x - self.pan.x) / scale;
        let y = (p.y - center.y - self.pan.y) / scale;
        Vec2::new(x, y) + self.canvas_size / 2.0
    }

    fn background(&self) -> Color {
        match &self.params.gradient {
            Some(gradient) => gradient.root,
            None => Color::WHITE,
        }
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    fn color_picker(ui: &mut egui::Ui, label: &str, color: &mut Color) {
        ui.horizontal(|ui| {
            ui.label(label);
            let mut rgb = color.to_array();
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                *color = Color::from(rgb);
            }
        });
    }

    /// Builds the top panel UI (run controls, stepping, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.01),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Grow all").clicked() {
                    self.grow_all();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Reseed").clicked() {
                    self.reseed();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (timing, segment counts, seed).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("segments = {}", self.tree.segments_created()));
                ui.label(format!("pending = {}", self.tree.pending()));
                ui.label(format!("intents = {}", self.intents.len()));
                ui.label(format!("seed = {}", self.seed));
                if let Some(err) = self.tree.halted() {
                    ui.colored_label(egui::Color32::RED, err.to_string());
                }
            });
        });
    }

    /// Builds the right-hand configuration panel for growth parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Parameters");

                ui.separator();
                ui.label("Length");
                let p = &mut self.params;
                Self::labeled_drag_f32(ui, "final_length:", &mut p.final_length, 0.0..=40.0, 0.1);
                Self::labeled_drag_f32(
                    ui,
                    "min_len_reduction:",
                    &mut p.min_len_reduction,
                    0.05..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "max_len_reduction:",
                    &mut p.max_len_reduction,
                    0.05..=1.0,
                    0.01,
                );

                ui.separator();
                ui.label("Width");
                Self::labeled_drag_f32(
                    ui,
                    "min_weight_reduction:",
                    &mut p.min_weight_reduction,
                    0.05..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "max_weight_reduction:",
                    &mut p.max_weight_reduction,
                    0.05..=1.0,
                    0.01,
                );

                ui.separator();
                ui.label("Spread (radians)");
                Self::labeled_drag_f32(ui, "delta_min:", &mut p.delta_min, 0.0..=3.2, 0.01);
                Self::labeled_drag_f32(ui, "delta_max:", &mut p.delta_max, 0.0..=3.2, 0.01);

                ui.separator();
                ui.label("Trunk");
                Self::labeled_drag_f32(
                    ui,
                    "length from:",
                    &mut p.trunk_length.start,
                    1.0..=400.0,
                    1.0,
                );
                Self::labeled_drag_f32(ui, "length to:", &mut p.trunk_length.end, 1.0..=400.0, 1.0);
                Self::labeled_drag_f32(
                    ui,
                    "width from:",
                    &mut p.trunk_width.start,
                    1.0..=100.0,
                    0.5,
                );
                Self::labeled_drag_f32(ui, "width to:", &mut p.trunk_width.end, 1.0..=100.0, 0.5);
                Self::labeled_drag_f32(ui, "angle:", &mut p.trunk_angle, -3.2..=6.3, 0.01);

                ui.separator();
                ui.label("Growth order");
                Self::labeled_drag_f32(
                    ui,
                    "tail_append_probability:",
                    &mut p.tail_append_probability,
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag_f32(
                    ui,
                    "length_budget:",
                    &mut p.length_budget,
                    1.0..=2000.0,
                    5.0,
                );
                Self::labeled_drag_usize(
                    ui,
                    "max_segments:",
                    &mut p.max_segments,
                    1..=500_000,
                    100.0,
                );

                ui.separator();
                ui.label("Color");
                match p.gradient.as_mut() {
                    Some(gradient) => {
                        Self::color_picker(ui, "root:", &mut gradient.root);
                        Self::labeled_drag_f32(ui, "hue:", &mut gradient.to.h, 0.0..=360.0, 1.0);
                        Self::labeled_drag_f32(
                            ui,
                            "saturation:",
                            &mut gradient.to.s,
                            0.0..=100.0,
                            0.5,
                        );
                        Self::labeled_drag_f32(
                            ui,
                            "lightness from:",
                            &mut gradient.from.l,
                            0.0..=100.0,
                            0.5,
                        );
                        Self::labeled_drag_f32(
                            ui,
                            "lightness to:",
                            &mut gradient.to.l,
                            0.0..=100.0,
                            0.5,
                        );
                    }
                    None => Self::color_picker(ui, "color:", &mut p.color),
                }

                if let Some(err) = &self.param_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, err);
                }

                ui.separator();
                if ui.button("Reset parameters to default").clicked() {
                    self.reset_params();
                }
            });
    }

    /// Builds the small floating toolbar for choosing how segments render.
    fn ui_toolbar(&mut self, ctx: &egui::Context) {
        egui::Area::new("toolbar".into())
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 100.0))
            .movable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(0, 0, 0, 32))
                    .show(ui, |ui| {
                        ui.vertical(|ui| {
                            if ui
                                .selectable_label(!self.params.draw_with_lines, "▰ Quads")
                                .clicked()
                            {
                                self.params.draw_with_lines = false;
                            }

                            if ui
                                .selectable_label(self.params.draw_with_lines, "╱ Lines")
                                .clicked()
                            {
                                self.params.draw_with_lines = true;
                            }

                            ui.separator();

                            if ui
                                .selectable_label(self.params.gradient.is_none(), "● Solid")
                                .clicked()
                            {
                                self.params.gradient = None;
                            }

                            if ui
                                .selectable_label(self.params.gradient.is_some(), "◐ Gradient")
                                .clicked()
                                && self.params.gradient.is_none()
                            {
                                self.params.gradient = Some(Gradient::default());
                            }
                        });
                    });
            });
    }

    /// Replays the recorded intents onto `painter`.
    ///
    /// All quads go into one mesh; gradient fills are shaded per vertex by
    /// sampling the gradient at each corner.
    fn paint_intents(&self, painter: &egui::Painter, rect: egui::Rect) {
        let scale = self.scale(rect);
        let mut mesh = egui::Mesh::default();

        for intent in &self.intents {
            match intent {
                DrawIntent::FillTaperedQuad { quad, fill } => {
                    let first = mesh.vertices.len() as u32;
                    for p in quad.points() {
                        let color = match fill {
                            FillStyle::Solid(color) => *color,
                            FillStyle::LinearGradient(gradient) => gradient.sample(p),
                        };
                        mesh.colored_vertex(self.world_to_screen(p, rect), to_color32(color));
                    }
                    mesh.add_triangle(first, first + 1, first + 2);
                    mesh.add_triangle(first, first + 2, first + 3);
                }
                DrawIntent::StrokeLine {
                    from,
                    to,
                    width,
                    color,
                } => {
                    painter.line_segment(
                        [self.world_to_screen(*from, rect), self.world_to_screen(*to, rect)],
                        egui::Stroke::new(width * scale, to_color32(*color)),
                    );
                }
                // Strokes carry their own width and color.
                DrawIntent::SetLineWidth(_) | DrawIntent::SetStrokeColor(_) => {}
            }
        }

        if !mesh.is_empty() {
            painter.add(egui::Shape::mesh(mesh));
        }
    }

    /// Builds the central panel where the canvas is drawn and interacted with.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                let delta = response.drag_delta();
                self.pan += delta;
            }

            let hover_world = response.hover_pos().map(|p| self.screen_to_world(p, rect));

            // Click plants the trunk where the pointer is.
            if response.clicked()
                && let Some(start) = hover_world
            {
                self.plant_at(start);
                self.running = true;
            }

            // Zoom around the mouse cursor.
            if ui.ctx().input(|i| i.raw_scroll_delta.y != 0.0) {
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    let pointer_screen = response.hover_pos().unwrap_or(rect.center());

                    let world_before = self.screen_to_world(pointer_screen, rect);

                    let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                    self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                    let screen_after = self.world_to_screen(world_before, rect);

                    let delta = pointer_screen - screen_after;
                    self.pan += delta;
                }
            }

            // Canvas background.
            let canvas = egui::Rect::from_two_pos(
                self.world_to_screen(Vec2::ZERO, rect),
                self.world_to_screen(self.canvas_size, rect),
            );
            painter.rect_filled(canvas, 0.0, to_color32(self.background()));

            self.paint_intents(&painter, rect);

            // Trunk marker.
            let marker = self.world_to_screen(self.trunk_start, rect);
            painter.circle_filled(marker, 3.0, egui::Color32::GREEN);

            // Auto-run growth if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    ///
    /// This method:
    /// - Renders the top control bar and status bar.
    /// - Renders the parameter side panel and toolbar, then applies edits.
    /// - Draws the canvas and advances growth.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_toolbar(ctx);
        self.apply_params();
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui;
    use glam::Vec2;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    /// A small tree that finishes in a handful of frames.
    fn quick_viewer() -> Viewer {
        let mut viewer = Viewer::new().unwrap();
        viewer.params = GrowthParameters {
            final_length: 20.0,
            min_len_reduction: 0.6,
            max_len_reduction: 0.6,
            ..Default::default()
        };
        viewer.seed = 7;
        viewer.reset();
        viewer
    }

    fn shape_count(viewer: &Viewer) -> usize {
        viewer.intents.iter().filter(|i| i.is_shape()).count()
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let mut viewer = Viewer::new().unwrap();
        // Use non-trivial zoom and pan to exercise the math.
        viewer.zoom = 2.0;
        viewer.pan = egui::vec2(15.0, -7.0);
        let rect = test_rect();

        let world_points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(512.0, 984.0),
            Vec2::new(-3.5, 8.25),
        ];

        let eps = 1e-3;

        for p in world_points {
            let screen = viewer.world_to_screen(p, rect);
            let back = viewer.screen_to_world(screen, rect);

            assert!(
                (back.x - p.x).abs() < eps && (back.y - p.y).abs() < eps,
                "roundtrip mismatch: p={:?}, back={:?}",
                p,
                back
            );
        }
    }

    #[test]
    fn canvas_center_maps_to_panel_center() {
        let viewer = Viewer::new().unwrap();
        let rect = test_rect();
        let screen = viewer.world_to_screen(viewer.canvas_size / 2.0, rect);
        assert_eq!(screen, rect.center());
    }

    #[test]
    fn reset_restores_basic_state() {
        let mut viewer = quick_viewer();
        viewer.step_once();
        assert!(!viewer.intents.is_empty());
        viewer.running = true;

        viewer.reset();

        assert!(viewer.intents.is_empty());
        assert_eq!(viewer.tree.pending(), 1);
        assert_eq!(viewer.tree.segments_created(), 1);
        assert!(!viewer.running);
    }

    #[test]
    fn reset_regrows_the_same_tree() {
        let mut viewer = quick_viewer();
        viewer.grow_all();
        let first = viewer.intents.clone();

        viewer.reset();
        viewer.grow_all();

        assert_eq!(viewer.intents, first);
    }

    #[test]
    fn step_once_grows_until_done_then_stops_running() {
        let mut viewer = quick_viewer();
        viewer.running = true;

        let mut frames = 0;
        while viewer.running {
            viewer.step_once();
            frames += 1;
            assert!(frames < 10_000, "tree never finished");
        }

        assert!(!viewer.tree.has_next());
        assert_eq!(shape_count(&viewer), viewer.tree.segments_created());
    }

    #[test]
    fn accepted_param_change_regrows_the_tree() {
        let mut viewer = quick_viewer();
        viewer.grow_all();
        assert!(shape_count(&viewer) > 1);

        viewer.params.final_length = 500.0;
        viewer.apply_params();

        // Not running, so the tree is regrown in full: just the trunk.
        assert_eq!(shape_count(&viewer), 1);
        assert!(viewer.param_error.is_none());
        assert_eq!(viewer.tree.params().final_length, 500.0);
    }

    #[test]
    fn rejected_param_change_is_reported_and_ignored() {
        let mut viewer = quick_viewer();
        viewer.grow_all();
        let drawn = viewer.intents.len();

        viewer.params.min_len_reduction = 0.0;
        viewer.apply_params();

        assert!(viewer.param_error.is_some());
        assert_eq!(viewer.tree.params().min_len_reduction, 0.6);
        assert_eq!(viewer.intents.len(), drawn);
    }

    #[test]
    fn plant_at_moves_the_trunk() {
        let mut viewer = quick_viewer();
        let spot = Vec2::new(200.0, 900.0);

        viewer.plant_at(spot);
        viewer.step_once();

        let Some(DrawIntent::FillTaperedQuad { quad, .. }) = viewer.intents.first() else {
            panic!("expected the trunk quad first");
        };
        let base = quad.base_mid();
        assert!((base - spot).length() < 1e-3, "trunk base at {base:?}");
    }

    #[test]
    fn reseed_changes_the_seed_and_replants() {
        let mut viewer = quick_viewer();
        viewer.grow_all();
        let old_seed = viewer.seed;

        viewer.reseed();

        // A 1 in 2^64 collision is not worth guarding against.
        assert_ne!(viewer.seed, old_seed);
        assert!(viewer.intents.is_empty());
        assert_eq!(viewer.tree.pending(), 1);
    }

    #[test]
    fn reset_with_rejected_panel_edit_replants_the_accepted_tree() {
        let mut viewer = quick_viewer();
        viewer.step_once();
        viewer.step_once();
        let accepted = viewer.tree.params().clone();

        viewer.params.trunk_length = 120.0..90.0;
        viewer.reset();

        assert!(viewer.param_error.is_some());
        assert!(viewer.intents.is_empty());
        assert_eq!(viewer.tree.pending(), 1);
        assert_eq!(viewer.tree.segments_created(), 1);
        assert_eq!(*viewer.tree.params(), accepted);

        viewer.step_once();
        let Some(DrawIntent::FillTaperedQuad { quad, .. }) = viewer.intents.first() else {
            panic!("expected the trunk quad first");
        };
        let base = quad.base_mid();
        assert!((base - viewer.trunk_start).length() < 1e-3, "trunk base at {base:?}");
    }

    #[test]
    fn reset_params_keeps_gradient_mode() {
        let mut viewer = Viewer::new().unwrap();
        let initial = viewer.params.clone();
        viewer.params.gradient = None;
        viewer.params.final_length = 42.0;

        viewer.reset_params();

        assert_eq!(viewer.params, initial);
        assert!(viewer.params.gradient.is_some());
    }
}
