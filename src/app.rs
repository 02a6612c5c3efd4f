//! The single controller that owns all interaction state. Event callbacks
//! and the animation loop call into [`Sketch`]; nothing else mutates it.

use glam::{Mat4, Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::camera::{self, OrbitControls, PerspectiveCamera};
use crate::capture::{normalize_pointer, Admission, PathCapture};
use crate::config::SketchConfig;
use crate::curve::catmull_rom;
use crate::geometry::flatten;
use crate::metric;
use crate::morph::morph_into;
use crate::phase::InteractionPhase;
use crate::present::Presenter;
use crate::prompts::PromptAction;
use crate::shape::GeneratedShape;

const TIME_STEP: f32 = 0.01;

/// What the path line should do this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum LineUpdate {
    Keep,
    Clear,
    Rebuild(Vec<f32>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameUpdate {
    pub path: LineUpdate,
    /// Line-list positions of the morphed shape.
    pub shape: Option<Vec<f32>>,
    pub shape_model: Mat4,
    pub view_proj: Mat4,
}

pub struct Sketch {
    config: SketchConfig,
    phase: InteractionPhase,
    capture: PathCapture,
    shape: Option<GeneratedShape>,
    morphed: Vec<Vec3>,
    generations: usize,
    time: f32,
    spin: f32,
    viewport: Vec2,
    live_pointer: Option<Vec2>,
    camera: PerspectiveCamera,
    orbit: OrbitControls,
    rng: SmallRng,
}

impl Sketch {
    pub fn new(config: SketchConfig, viewport: Vec2) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            capture: PathCapture::new(config.capture),
            camera: PerspectiveCamera::new(&config.camera, viewport),
            orbit: OrbitControls::new(&config.camera),
            config,
            phase: InteractionPhase::Prompting,
            shape: None,
            morphed: Vec::new(),
            generations: 0,
            time: 0.0,
            spin: 0.0,
            viewport,
            live_pointer: None,
            rng,
        }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    pub fn points(&self) -> &[Vec3] {
        self.capture.points()
    }

    pub fn shape(&self) -> Option<&GeneratedShape> {
        self.shape.as_ref()
    }

    /// Current morphed vertex positions (empty until the first morph frame).
    pub fn morphed(&self) -> &[Vec3] {
        &self.morphed
    }

    /// How many times a shape has been built. At most one.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Frame clock, advanced a fixed step per tick.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn apply_prompt(&mut self, action: PromptAction, presenter: &mut impl Presenter) {
        match action {
            PromptAction::Show(i) => presenter.set_prompt_visible(i, true),
            PromptAction::Hide(i) => presenter.set_prompt_visible(i, false),
            PromptAction::Activate => {
                if self.phase.advance_to(InteractionPhase::Drawing) {
                    presenter.show_metric();
                    presenter.show_footer();
                    if self.config.hide_cursor_while_drawing {
                        presenter.set_cursor_hidden(true);
                    }
                }
            }
        }
    }

    /// Pointer movement in viewport pixels. Feeds the path while drawing and
    /// the orbit afterwards.
    pub fn pointer_move(&mut self, client: Vec2, presenter: &mut impl Presenter) -> Admission {
        if !self.phase.is_drawing() {
            self.orbit.drag_to(client, self.viewport);
            return Admission::Ignored;
        }
        let Some(ndc) = normalize_pointer(client, self.viewport) else {
            return Admission::Ignored;
        };
        self.live_pointer = Some(ndc);

        let admission = self.capture.offer(ndc, &mut self.rng);
        if admission == Admission::Triggered {
            self.begin_morph(presenter);
        }
        admission
    }

    pub fn pointer_down(&mut self, client: Vec2) {
        self.orbit.begin_drag(client);
    }

    pub fn pointer_up(&mut self) {
        self.orbit.end_drag();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.orbit.wheel(delta_y);
    }

    /// The viewport is always recorded so a degenerate one stops pointer
    /// mapping. The camera keeps its last usable aspect.
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.camera.resize(viewport);
    }

    fn begin_morph(&mut self, presenter: &mut impl Presenter) {
        if !self.phase.advance_to(InteractionPhase::Morphing) {
            return;
        }
        self.live_pointer = None;
        self.shape =
            GeneratedShape::generate(&self.config.shape, self.capture.points(), &mut self.rng);
        self.generations += 1;
        self.orbit.enabled = self.shape.is_some();
        if self.config.hide_cursor_while_drawing {
            presenter.set_cursor_hidden(false);
        }
    }

    /// Curve vertices for the path plus the optional live pointer trail.
    pub fn path_vertices(&self) -> Vec<f32> {
        let mut controls = self.capture.points().to_vec();
        if self.config.trail_live_pointer {
            if let Some(ndc) = self.live_pointer {
                let trail = self.capture.project(ndc);
                if controls.last() != Some(&trail) {
                    controls.push(trail);
                }
            }
        }
        let divisions = self.capture.points().len() * self.config.curve_samples_per_point;
        flatten(&catmull_rom(&controls, divisions))
    }

    /// Readout text for the current state. `None` until input goes live.
    pub fn readout(&self) -> Option<String> {
        if !self.phase.is_active() {
            return None;
        }
        let d = metric::distance(
            self.phase,
            self.capture.last_point(),
            self.shape.as_ref(),
            &self.morphed,
        );
        Some(metric::format_readout(d, self.config.metric_divisor))
    }

    /// One animation frame at wall-clock `now_ms`.
    pub fn tick(&mut self, now_ms: f64, presenter: &mut impl Presenter) -> FrameUpdate {
        self.time += TIME_STEP;

        let mut frame = FrameUpdate {
            path: LineUpdate::Keep,
            shape: None,
            shape_model: Mat4::IDENTITY,
            view_proj: Mat4::IDENTITY,
        };

        match self.phase {
            InteractionPhase::Drawing => {
                let verts = self.path_vertices();
                frame.path = if verts.is_empty() {
                    LineUpdate::Clear
                } else {
                    LineUpdate::Rebuild(verts)
                };
            }
            InteractionPhase::Morphing => {
                frame.path = LineUpdate::Clear;
                if let Some(shape) = &self.shape {
                    morph_into(&shape.base, now_ms, &self.config.morph, &mut self.morphed);
                    self.spin += self.config.morph.spin_per_frame;
                    frame.shape = Some(shape.segment_buffer(&self.morphed));
                    frame.shape_model = Mat4::from_rotation_y(self.spin);
                }
            }
            InteractionPhase::Prompting => {}
        }

        if let Some(text) = self.readout() {
            presenter.set_metric_text(&text);
        }

        self.orbit.update();
        frame.view_proj = camera::view_proj(&self.camera, &self.orbit);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::{PresenterCall, Recording};

    fn seeded(mut config: SketchConfig) -> Sketch {
        config.seed = Some(7);
        Sketch::new(config, Vec2::new(1000.0, 1000.0))
    }

    fn activate(s: &mut Sketch, p: &mut Recording) {
        s.apply_prompt(PromptAction::Activate, p);
    }

    #[test]
    fn moves_before_activation_are_ignored() {
        let mut p = Recording::default();
        let mut s = seeded(SketchConfig::polyhedron());
        assert_eq!(
            s.pointer_move(Vec2::new(10.0, 10.0), &mut p),
            Admission::Ignored
        );
        assert!(s.points().is_empty());
        assert_eq!(s.readout(), None);
    }

    #[test]
    fn activation_shows_readout_and_footer_once() {
        let mut p = Recording::default();
        let mut s = seeded(SketchConfig::wireframe());
        activate(&mut s, &mut p);
        activate(&mut s, &mut p);
        assert_eq!(
            p.calls,
            vec![
                PresenterCall::ShowMetric,
                PresenterCall::ShowFooter,
                PresenterCall::CursorHidden(true),
            ]
        );
        s.tick(0.0, &mut p);
        assert_eq!(p.last_metric(), Some("—"));
    }

    #[test]
    fn path_line_needs_two_points() {
        let mut p = Recording::default();
        let mut s = seeded(SketchConfig::polyhedron());
        activate(&mut s, &mut p);
        assert_eq!(s.tick(0.0, &mut p).path, LineUpdate::Clear);
        s.pointer_move(Vec2::new(100.0, 100.0), &mut p);
        assert_eq!(s.tick(16.0, &mut p).path, LineUpdate::Clear);
        s.pointer_move(Vec2::new(300.0, 100.0), &mut p);
        match s.tick(32.0, &mut p).path {
            // 2 points * 5 samples + 1
            LineUpdate::Rebuild(v) => assert_eq!(v.len(), 11 * 3),
            other => panic!("expected rebuild, got {other:?}"),
        }
    }

    #[test]
    fn live_pointer_trails_the_wireframe_path() {
        let mut p = Recording::default();
        let mut s = seeded(SketchConfig::wireframe());
        activate(&mut s, &mut p);
        s.pointer_move(Vec2::new(100.0, 100.0), &mut p);
        assert_eq!(s.path_vertices().len(), (8 + 1) * 3);
        // within the threshold: not admitted, still drawn
        s.pointer_move(Vec2::new(105.0, 100.0), &mut p);
        assert_eq!(s.points().len(), 1);
        let verts = s.path_vertices();
        let end = &verts[verts.len() - 3..];
        assert!((end[0] - (105.0 / 1000.0 * 2.0 - 1.0) * 4.0).abs() < 1e-5);
    }

    #[test]
    fn morph_frame_spins_and_clears_path() {
        let mut p = Recording::default();
        let mut s = seeded(SketchConfig::polyhedron());
        activate(&mut s, &mut p);
        for i in 0..16 {
            s.pointer_move(Vec2::new(40.0 + i as f32 * 50.0, 500.0), &mut p);
        }
        assert_eq!(s.phase(), InteractionPhase::Morphing);
        assert!(s.orbit().enabled);
        let frame = s.tick(1000.0, &mut p);
        assert_eq!(frame.path, LineUpdate::Clear);
        assert_eq!(frame.shape.as_ref().map(Vec::len), Some(30 * 6));
        assert_eq!(frame.shape_model, Mat4::from_rotation_y(0.001));
        assert_eq!(s.morphed().len(), 20);
    }
}
