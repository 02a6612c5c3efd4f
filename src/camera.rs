use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, viewport: Vec2) -> Self {
        let mut camera = Self {
            fov_y_deg: config.fov_y_deg,
            aspect: 1.0,
            near: config.near,
            far: config.far,
        };
        camera.resize(viewport);
        camera
    }

    /// Adopts the viewport's aspect ratio. A degenerate viewport keeps the
    /// previous one.
    pub fn resize(&mut self, viewport: Vec2) -> bool {
        if viewport.x > 0.0 && viewport.y > 0.0 {
            self.aspect = viewport.x / viewport.y;
            true
        } else {
            false
        }
    }

    pub fn projection(&self) -> Mat4 {
        let fov = self.fov_y_deg.to_radians();
        Mat4::perspective_rh_gl(fov, self.aspect, self.near, self.far)
    }
}

/// Damped orbit around the origin. No panning.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enabled: bool,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    min_distance: f32,
    max_distance: f32,
    damping: f32,
    yaw_delta: f32,
    pitch_delta: f32,
    zoom: f32,
    dragging: Option<Vec2>,
}

const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 1e-3;
const ZOOM_STEP: f32 = 0.95;

impl OrbitControls {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            enabled: false,
            yaw: 0.0,
            pitch: 0.0,
            distance: config.distance,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            damping: config.damping,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            zoom: 1.0,
            dragging: None,
        }
    }

    pub fn begin_drag(&mut self, at: Vec2) {
        if self.enabled {
            self.dragging = Some(at);
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    /// Converts pointer travel into rotation. A full viewport height of
    /// travel is one full turn.
    pub fn drag_to(&mut self, at: Vec2, viewport: Vec2) {
        if !self.enabled || viewport.y <= 0.0 {
            return;
        }
        if let Some(last) = self.dragging {
            let d = at - last;
            let turn = std::f32::consts::TAU / viewport.y;
            self.yaw_delta -= d.x * turn;
            self.pitch_delta += d.y * turn;
            self.dragging = Some(at);
        }
    }

    /// Positive `delta_y` (scrolling down) moves the camera away.
    pub fn wheel(&mut self, delta_y: f32) {
        if !self.enabled || delta_y == 0.0 {
            return;
        }
        if delta_y > 0.0 {
            self.zoom /= ZOOM_STEP;
        } else {
            self.zoom *= ZOOM_STEP;
        }
    }

    /// Applies a damped share of the pending input.
    pub fn update(&mut self) {
        let k = if self.damping > 0.0 {
            self.damping
        } else {
            1.0
        };
        self.yaw += self.yaw_delta * k;
        self.pitch = (self.pitch + self.pitch_delta * k).clamp(-MAX_PITCH, MAX_PITCH);
        self.distance = (self.distance * self.zoom).clamp(self.min_distance, self.max_distance);

        self.yaw_delta *= 1.0 - k;
        self.pitch_delta *= 1.0 - k;
        self.zoom = 1.0;
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }
}

pub fn view_proj(camera: &PerspectiveCamera, controls: &OrbitControls) -> Mat4 {
    camera.projection() * controls.view()
}
