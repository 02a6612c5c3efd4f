use glam::Vec3;

/// Per-vertex "breathing" offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphParams {
    pub amplitude: f32,
    /// Angular frequency per axis, distinct so the axes drift apart.
    pub frequencies: [f32; 3],
    /// Converts wall-clock milliseconds to morph time.
    pub time_scale: f32,
    /// Y-axis spin added every frame, in radians.
    pub spin_per_frame: f32,
}

impl MorphParams {
    pub fn time(&self, now_ms: f64) -> f32 {
        (now_ms * self.time_scale as f64) as f32
    }

    /// Each axis is driven by a different coordinate of the rest position.
    pub fn offset(&self, base: Vec3, t: f32) -> Vec3 {
        let [fx, fy, fz] = self.frequencies;
        Vec3::new(
            (t * fx + base.y).sin(),
            (t * fy + base.z).cos(),
            (t * fz + base.x).sin(),
        ) * self.amplitude
    }
}

/// Overwrites `out` with every `base` vertex displaced for `now_ms`.
pub fn morph_into(base: &[Vec3], now_ms: f64, params: &MorphParams, out: &mut Vec<Vec3>) {
    let t = params.time(now_ms);
    out.clear();
    out.extend(base.iter().map(|&b| b + params.offset(b, t)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SketchConfig;

    #[test]
    fn offset_at_time_zero() {
        let p = SketchConfig::polyhedron().morph;
        let o = p.offset(Vec3::ZERO, 0.0);
        assert!(o.x.abs() < 1e-6);
        assert!((o.y - 0.5).abs() < 1e-6);
        assert!(o.z.abs() < 1e-6);
    }

    #[test]
    fn offsets_are_bounded_by_amplitude() {
        let p = SketchConfig::polyhedron().morph;
        let base = [Vec3::new(1.0, -2.0, 0.3), Vec3::new(-0.7, 0.1, 2.2)];
        let mut out = Vec::new();
        for ms in [0.0, 1_000.0, 12_345.6, 9_999_999.0] {
            morph_into(&base, ms, &p, &mut out);
            for (b, m) in base.iter().zip(&out) {
                let d = *m - *b;
                assert!(d.abs().max_element() <= p.amplitude + 1e-5);
            }
        }
    }

    #[test]
    fn output_replaces_previous_contents() {
        let p = SketchConfig::polyhedron().morph;
        let mut out = vec![Vec3::splat(99.0); 10];
        morph_into(&[Vec3::ONE; 3], 500.0, &p, &mut out);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn same_time_same_output() {
        let p = SketchConfig::wireframe().morph;
        let base: Vec<Vec3> = (0..12).map(|i| Vec3::splat(i as f32 * 0.37)).collect();
        let mut a = Vec::new();
        let mut b = Vec::new();
        morph_into(&base, 4242.5, &p, &mut a);
        morph_into(&base, 1.0, &p, &mut b);
        morph_into(&base, 4242.5, &p, &mut b);
        let bits = |v: &[Vec3]| -> Vec<u32> {
            v.iter()
                .flat_map(|p| p.to_array().map(f32::to_bits))
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }
}
