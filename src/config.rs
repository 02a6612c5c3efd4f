//! Every tunable literal of the sketch, grouped so the two page variants are
//! plain data rather than separate code paths.

use crate::error::ConfigError;
use crate::morph::MorphParams;
use crate::prompts::{PromptSchedule, PromptTimeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeMode {
    /// Fixed dodecahedron, independent of the drawn path.
    Polyhedron,
    /// Random graph built from the captured path points.
    Wireframe,
}

impl ShapeMode {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "polyhedron" | "a" => Ok(ShapeMode::Polyhedron),
            "wireframe" | "b" => Ok(ShapeMode::Wireframe),
            _ => Err(ConfigError::UnknownMode(value.to_string())),
        }
    }
}

/// Synthetic depth assigned to the `i`-th captured point:
/// `sin(i * k) * amplitude`, plus uniform noise in `[-jitter, jitter]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthProfile {
    pub k: f32,
    pub amplitude: f32,
    pub jitter: f32,
}

impl DepthProfile {
    pub fn base(&self, index: usize) -> f32 {
        (index as f32 * self.k).sin() * self.amplitude
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureConfig {
    /// Minimum NDC distance between admitted samples (strictly exceeded).
    pub move_threshold: f32,
    /// NDC → world multiplier for x and y.
    pub world_scale: f32,
    /// Shape generation fires when this many points have been stored.
    pub trigger_count: usize,
    pub depth: DepthProfile,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeConfig {
    pub mode: ShapeMode,
    pub polyhedron_radius: f32,
    /// Per-axis jitter bound applied to wireframe vertices.
    pub jitter: [f32; 3],
    pub edges_per_vertex: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 5.0,
            min_distance: 2.0,
            max_distance: 20.0,
            damping: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SketchConfig {
    pub capture: CaptureConfig,
    /// Curve divisions per captured point.
    pub curve_samples_per_point: usize,
    /// Append the live pointer position as a trailing curve point.
    pub trail_live_pointer: bool,
    pub shape: ShapeConfig,
    pub morph: MorphParams,
    pub metric_divisor: f32,
    pub prompts: PromptTimeline,
    pub hide_cursor_while_drawing: bool,
    pub camera: CameraConfig,
    pub seed: Option<u64>,
}

impl SketchConfig {
    /// The dodecahedron page.
    pub fn polyhedron() -> Self {
        Self {
            capture: CaptureConfig {
                move_threshold: 0.05,
                world_scale: 3.0,
                trigger_count: 16,
                depth: DepthProfile {
                    k: 0.5,
                    amplitude: 0.5,
                    jitter: 0.0,
                },
            },
            curve_samples_per_point: 5,
            trail_live_pointer: false,
            shape: ShapeConfig {
                mode: ShapeMode::Polyhedron,
                polyhedron_radius: 2.5,
                jitter: [0.15, 0.15, 0.25],
                edges_per_vertex: 3,
            },
            morph: MorphParams {
                amplitude: 0.5,
                frequencies: [1.5, 1.2, 1.8],
                time_scale: 0.0005,
                spin_per_frame: 0.001,
            },
            metric_divisor: 5.0,
            prompts: PromptTimeline::Staggered {
                start: 1000.0,
                hold: 2500.0,
                step: 3000.0,
            },
            hide_cursor_while_drawing: false,
            camera: CameraConfig::default(),
            seed: None,
        }
    }

    /// The path-derived wireframe page.
    pub fn wireframe() -> Self {
        Self {
            capture: CaptureConfig {
                move_threshold: 0.02,
                world_scale: 4.0,
                trigger_count: 16,
                depth: DepthProfile {
                    k: 0.3,
                    amplitude: 0.8,
                    jitter: 0.1,
                },
            },
            curve_samples_per_point: 8,
            trail_live_pointer: true,
            shape: ShapeConfig {
                mode: ShapeMode::Wireframe,
                polyhedron_radius: 2.5,
                jitter: [0.15, 0.15, 0.25],
                edges_per_vertex: 3,
            },
            morph: MorphParams {
                amplitude: 0.08,
                frequencies: [2.0, 1.7, 2.3],
                time_scale: 0.001,
                spin_per_frame: 0.0,
            },
            metric_divisor: 10.0,
            prompts: PromptTimeline::Fixed(PromptSchedule::fixed(
                &[(1000.0, 3500.0), (4000.0, 6500.0), (7000.0, 9500.0)],
                9500.0,
            )),
            hide_cursor_while_drawing: true,
            camera: CameraConfig::default(),
            seed: None,
        }
    }

    pub fn for_mode(mode: ShapeMode) -> Self {
        match mode {
            ShapeMode::Polyhedron => Self::polyhedron(),
            ShapeMode::Wireframe => Self::wireframe(),
        }
    }

    /// Builds a config from a `location.search` string such as
    /// `?mode=wireframe&seed=7`. `mode` picks the preset; the remaining keys
    /// override individual fields. Unknown keys are ignored.
    pub fn from_query(query: &str) -> Result<Self, ConfigError> {
        let pairs: Vec<(&str, &str)> = query
            .trim_start_matches('?')
            .split('&')
            .filter(|p| !p.is_empty())
            .map(|p| p.split_once('=').unwrap_or((p, "")))
            .collect();

        let mut config = match pairs.iter().find(|(k, _)| *k == "mode") {
            Some((_, v)) => Self::for_mode(ShapeMode::parse(v)?),
            None => Self::default(),
        };

        for (key, value) in pairs {
            match key {
                "seed" => config.seed = Some(parse_value("seed", value)?),
                "threshold" => {
                    let t: f32 = parse_value("threshold", value)?;
                    if !(t.is_finite() && t >= 0.0) {
                        return Err(invalid("threshold", value));
                    }
                    config.capture.move_threshold = t;
                }
                "trigger" => {
                    let n: usize = parse_value("trigger", value)?;
                    // The wireframe needs four vertices to pick three neighbours.
                    if n < 4 {
                        return Err(invalid("trigger", value));
                    }
                    config.capture.trigger_count = n;
                }
                _ => {}
            }
        }
        Ok(config)
    }
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self::polyhedron()
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_polyhedron_preset() {
        for query in ["", "?"] {
            let config = SketchConfig::from_query(query).unwrap();
            assert_eq!(config, SketchConfig::polyhedron());
        }
    }

    #[test]
    fn mode_selects_preset_and_overrides_apply() {
        let c = SketchConfig::from_query("?seed=42&mode=wireframe&threshold=0.1").unwrap();
        assert_eq!(c.shape.mode, ShapeMode::Wireframe);
        assert_eq!(c.seed, Some(42));
        assert!((c.capture.move_threshold - 0.1).abs() < 1e-6);
        assert_eq!(c.metric_divisor, 10.0);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let c = SketchConfig::from_query("?utm_source=x&flag").unwrap();
        assert_eq!(c, SketchConfig::polyhedron());
    }

    #[test]
    fn bad_values_are_rejected() {
        assert_eq!(
            SketchConfig::from_query("?mode=cube"),
            Err(ConfigError::UnknownMode("cube".into()))
        );
        assert!(matches!(
            SketchConfig::from_query("?seed=abc"),
            Err(ConfigError::InvalidValue { key: "seed", .. })
        ));
        assert!(SketchConfig::from_query("?trigger=2").is_err());
        assert!(SketchConfig::from_query("?threshold=-1").is_err());
    }

    #[test]
    fn depth_profile_follows_sine() {
        let d = SketchConfig::polyhedron().capture.depth;
        assert_eq!(d.base(0), 0.0);
        assert!((d.base(3) - (1.5f32).sin() * 0.5).abs() < 1e-6);
    }
}
