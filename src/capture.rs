//! Pointer → path point conversion with distance decimation.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::config::CaptureConfig;

/// Maps a viewport pixel position to normalized device coordinates.
/// Returns `None` for a degenerate viewport.
pub fn normalize_pointer(client: Vec2, viewport: Vec2) -> Option<Vec2> {
    if !(viewport.x > 0.0 && viewport.y > 0.0) {
        log::debug!("ignoring pointer on degenerate viewport {viewport:?}");
        return None;
    }
    let ndc = Vec2::new(
        client.x / viewport.x * 2.0 - 1.0,
        -(client.y / viewport.y * 2.0 - 1.0),
    );
    ndc.is_finite().then_some(ndc)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Capture is closed; the sample was not looked at.
    Ignored,
    /// Too close to the previous admitted sample.
    Rejected,
    Admitted,
    /// Admitted, and the point count just reached the trigger.
    Triggered,
}

#[derive(Debug, Clone)]
pub struct PathCapture {
    config: CaptureConfig,
    points: Vec<Vec3>,
    last_ndc: Option<Vec2>,
    closed: bool,
}

impl PathCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            points: Vec::new(),
            last_ndc: None,
            closed: false,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn last_point(&self) -> Option<Vec3> {
        self.points.last().copied()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// World position of `ndc` if it were the next point, without depth noise.
    pub fn project(&self, ndc: Vec2) -> Vec3 {
        let xy = ndc * self.config.world_scale;
        xy.extend(self.config.depth.base(self.points.len()))
    }

    pub fn offer<R: Rng + ?Sized>(&mut self, ndc: Vec2, rng: &mut R) -> Admission {
        if self.closed {
            return Admission::Ignored;
        }
        if let Some(last) = self.last_ndc {
            if last.distance(ndc) <= self.config.move_threshold {
                return Admission::Rejected;
            }
        }

        let mut point = self.project(ndc);
        let jitter = self.config.depth.jitter;
        if jitter > 0.0 {
            point.z += rng.gen_range(-jitter..=jitter);
        }
        self.points.push(point);
        self.last_ndc = Some(ndc);

        if self.points.len() >= self.config.trigger_count {
            self.closed = true;
            Admission::Triggered
        } else {
            Admission::Admitted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SketchConfig;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn capture() -> PathCapture {
        PathCapture::new(SketchConfig::polyhedron().capture)
    }

    #[test]
    fn normalizes_corners_and_center() {
        let vp = Vec2::new(800.0, 600.0);
        let at = |x, y| normalize_pointer(Vec2::new(x, y), vp);
        assert_eq!(at(0.0, 0.0), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(at(400.0, 300.0), Some(Vec2::ZERO));
        assert_eq!(at(800.0, 600.0), Some(Vec2::new(1.0, -1.0)));
    }

    #[test]
    fn degenerate_viewport_yields_none() {
        let client = Vec2::ONE;
        assert_eq!(normalize_pointer(client, Vec2::new(0.0, 600.0)), None);
        assert_eq!(normalize_pointer(client, Vec2::new(800.0, 0.0)), None);
        assert_eq!(normalize_pointer(client, Vec2::new(f32::NAN, 600.0)), None);
        assert_eq!(normalize_pointer(client, Vec2::ZERO), None);
    }

    #[test]
    fn first_point_always_admitted_then_decimated() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut c = capture();
        assert_eq!(c.offer(Vec2::ZERO, &mut rng), Admission::Admitted);
        let near = Vec2::new(0.049, 0.0);
        let far = Vec2::new(0.051, 0.0);
        assert_eq!(c.offer(near, &mut rng), Admission::Rejected);
        assert_eq!(c.offer(far, &mut rng), Admission::Admitted);
        assert_eq!(c.points().len(), 2);
    }

    #[test]
    fn stored_point_is_scaled_with_synthetic_depth() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut c = capture();
        c.offer(Vec2::new(0.5, -0.5), &mut rng);
        c.offer(Vec2::new(0.0, 0.0), &mut rng);
        assert_eq!(c.points()[0], Vec3::new(1.5, -1.5, 0.0));
        assert!((c.points()[1].z - 0.5f32.sin() * 0.5).abs() < 1e-6);
    }

    #[test]
    fn trigger_fires_once_and_closes() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut c = capture();
        let mut triggered = 0;
        for i in 0..20 {
            match c.offer(Vec2::new(-0.9 + i as f32 * 0.1, 0.0), &mut rng) {
                Admission::Triggered => triggered += 1,
                Admission::Admitted => {}
                other => assert!(i >= 16 && other == Admission::Ignored),
            }
        }
        assert_eq!(triggered, 1);
        assert_eq!(c.points().len(), 16);
        assert!(c.is_closed());
    }

    #[test]
    fn depth_jitter_stays_bounded() {
        let mut rng = SmallRng::seed_from_u64(9);
        let cfg = SketchConfig::wireframe().capture;
        let mut c = PathCapture::new(cfg);
        for i in 0..10 {
            c.offer(Vec2::new(i as f32 * 0.1 - 0.5, 0.2), &mut rng);
        }
        for (i, p) in c.points().iter().enumerate() {
            assert!((p.z - cfg.depth.base(i)).abs() <= cfg.depth.jitter + 1e-6);
        }
    }
}
