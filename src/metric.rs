//! The ΔCMH readout: a distance derived from whatever is on screen.

use glam::Vec3;

use crate::config::ShapeMode;
use crate::phase::InteractionPhase;
use crate::shape::GeneratedShape;

pub const PLACEHOLDER: &str = "—";

/// Raw distance for the current state, or `None` when there is nothing to
/// measure yet. `current` is the shape's latest morphed vertex set.
pub fn distance(
    phase: InteractionPhase,
    last_point: Option<Vec3>,
    shape: Option<&GeneratedShape>,
    current: &[Vec3],
) -> Option<f32> {
    match phase {
        InteractionPhase::Drawing => last_point.map(Vec3::length),
        InteractionPhase::Morphing => {
            let shape = shape?;
            match shape.mode {
                ShapeMode::Polyhedron => {
                    let verts = if current.is_empty() {
                        &shape.base[..]
                    } else {
                        current
                    };
                    if verts.is_empty() {
                        return None;
                    }
                    let total: f32 = verts.iter().map(|v| v.length()).sum();
                    Some(total / verts.len() as f32)
                }
                ShapeMode::Wireframe => Some(shape.source_mean.length()),
            }
        }
        InteractionPhase::Prompting => None,
    }
}

pub fn format_readout(distance: Option<f32>, divisor: f32) -> String {
    match distance {
        Some(d) if divisor != 0.0 => format!("{:.3}", d / divisor),
        _ => PLACEHOLDER.to_string(),
    }
}
