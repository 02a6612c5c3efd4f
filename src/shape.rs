//! The wireframe that replaces the drawn path.

use glam::Vec3;
use rand::seq::index;
use rand::Rng;

use crate::config::{ShapeConfig, ShapeMode};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedShape {
    pub mode: ShapeMode,
    /// Rest positions the morph offsets are applied to.
    pub base: Vec<Vec3>,
    /// Undirected edges, each listed once.
    pub segments: Vec<[usize; 2]>,
    /// Per-vertex neighbour picks (wireframe mode only).
    pub outgoing: Vec<Vec<usize>>,
    /// Mean of the vertex set before any morphing.
    pub source_mean: Vec3,
}

impl GeneratedShape {
    pub fn generate<R: Rng + ?Sized>(
        config: &ShapeConfig,
        path: &[Vec3],
        rng: &mut R,
    ) -> Option<Self> {
        // Both modes wait for a real path, even though the polyhedron ignores it.
        if path.len() < 4 {
            log::warn!("not generating a shape from {} points", path.len());
            return None;
        }
        let shape = match config.mode {
            ShapeMode::Polyhedron => Self::dodecahedron(config.polyhedron_radius),
            ShapeMode::Wireframe => {
                Self::wireframe(path, config.jitter, config.edges_per_vertex, rng)?
            }
        };
        log::info!(
            "generated {:?} shape: {} vertices, {} edges",
            shape.mode,
            shape.base.len(),
            shape.segments.len()
        );
        Some(shape)
    }

    /// Regular dodecahedron with the given circumradius.
    pub fn dodecahedron(radius: f32) -> Self {
        let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let inv = 1.0 / phi;

        let mut vertices = Vec::with_capacity(20);
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for z in [-1.0, 1.0] {
                    vertices.push(Vec3::new(x, y, z));
                }
            }
        }
        for a in [-inv, inv] {
            for b in [-phi, phi] {
                vertices.push(Vec3::new(0.0, a, b));
                vertices.push(Vec3::new(a, b, 0.0));
                vertices.push(Vec3::new(b, 0.0, a));
            }
        }

        // Unit-cube corners sit at sqrt(3); edges are 2/phi long.
        let scale = radius / 3.0_f32.sqrt();
        let edge = 2.0 * inv;
        let mut segments = Vec::with_capacity(30);
        for i in 0..vertices.len() {
            for j in (i + 1)..vertices.len() {
                if (vertices[i].distance(vertices[j]) - edge).abs() < 1e-3 {
                    segments.push([i, j]);
                }
            }
        }
        let base: Vec<Vec3> = vertices.into_iter().map(|v| v * scale).collect();

        Self {
            mode: ShapeMode::Polyhedron,
            source_mean: mean(&base),
            base,
            segments,
            outgoing: Vec::new(),
        }
    }

    /// Jittered copy of `path`, each vertex wired to `per_vertex` distinct
    /// other vertices chosen at random.
    pub fn wireframe<R: Rng + ?Sized>(
        path: &[Vec3],
        jitter: [f32; 3],
        per_vertex: usize,
        rng: &mut R,
    ) -> Option<Self> {
        let n = path.len();
        if n <= per_vertex {
            return None;
        }

        let source_mean = mean(path);
        let base: Vec<Vec3> = path
            .iter()
            .map(|p| {
                let offset = Vec3::new(
                    symmetric(rng, jitter[0]),
                    symmetric(rng, jitter[1]),
                    symmetric(rng, jitter[2]),
                );
                *p + offset
            })
            .collect();

        let mut outgoing = Vec::with_capacity(n);
        let mut segments = Vec::new();
        for i in 0..n {
            // sample among the n-1 others, then shift past `i`
            let picks: Vec<usize> = index::sample(rng, n - 1, per_vertex)
                .into_iter()
                .map(|j| if j >= i { j + 1 } else { j })
                .collect();
            for &j in &picks {
                let edge = [i.min(j), i.max(j)];
                if !segments.contains(&edge) {
                    segments.push(edge);
                }
            }
            outgoing.push(picks);
        }

        Some(Self {
            mode: ShapeMode::Wireframe,
            base,
            segments,
            outgoing,
            source_mean,
        })
    }

    /// Line-list positions (two endpoints per segment) taken from `vertices`.
    pub fn segment_buffer(&self, vertices: &[Vec3]) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.segments.len() * 6);
        for &[a, b] in &self.segments {
            let (pa, pb) = (vertices[a], vertices[b]);
            out.extend_from_slice(&[pa.x, pa.y, pa.z, pb.x, pb.y, pb.z]);
        }
        out
    }
}

fn symmetric<R: Rng + ?Sized>(rng: &mut R, bound: f32) -> f32 {
    if bound > 0.0 {
        rng.gen_range(-bound..=bound)
    } else {
        0.0
    }
}

pub fn mean(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    points.iter().copied().sum::<Vec3>() / points.len() as f32
}
