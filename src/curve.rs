//! Centripetal Catmull–Rom sampling through a polyline of control points.

use glam::Vec3;

const CENTRIPETAL_ALPHA: f32 = 0.5;

/// Samples `divisions + 1` points along a centripetal Catmull–Rom spline
/// through `points`, evenly spaced in the curve parameter. The curve passes
/// through every control point. Open ends are extended by reflecting the
/// neighbouring control point.
pub fn catmull_rom(points: &[Vec3], divisions: usize) -> Vec<Vec3> {
    if points.len() < 2 {
        return Vec::new();
    }
    let divisions = divisions.max(1);
    (0..=divisions)
        .map(|d| point_at(points, d as f32 / divisions as f32))
        .collect()
}

/// Position at `t` in `[0, 1]` over the whole curve.
pub fn point_at(points: &[Vec3], t: f32) -> Vec3 {
    let n = points.len();
    debug_assert!(n >= 2);
    let p = (n - 1) as f32 * t.clamp(0.0, 1.0);
    let mut segment = p.floor() as usize;
    let mut weight = p - segment as f32;
    if segment >= n - 1 {
        segment = n - 2;
        weight = 1.0;
    }

    let p1 = points[segment];
    let p2 = points[segment + 1];
    let p0 = match segment.checked_sub(1) {
        Some(prev) => points[prev],
        None => 2.0 * p1 - p2,
    };
    let p3 = match points.get(segment + 2) {
        Some(&next) => next,
        None => 2.0 * p2 - p1,
    };

    segment_point(p0, p1, p2, p3, weight)
}

fn knot_interval(a: Vec3, b: Vec3) -> f32 {
    a.distance_squared(b).powf(CENTRIPETAL_ALPHA * 0.5)
}

/// Non-uniform Catmull–Rom on one segment, written as a cubic Hermite between
/// `p1` and `p2` with tangents from the centripetal knot spacing.
fn segment_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let mut dt0 = knot_interval(p0, p1);
    let mut dt1 = knot_interval(p1, p2);
    let mut dt2 = knot_interval(p2, p3);

    // coincident control points
    if dt1 < 1e-4 {
        dt1 = 1.0;
    }
    if dt0 < 1e-4 {
        dt0 = dt1;
    }
    if dt2 < 1e-4 {
        dt2 = dt1;
    }

    let m1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
    let m2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    p1 * h00 + m1 * h10 + p2 * h01 + m2 * h11
}
