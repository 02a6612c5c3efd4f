#![cfg(not(target_arch = "wasm32"))]

use glam::{Vec2, Vec3};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use polysketch_wasm::capture::{Admission, PathCapture};
use polysketch_wasm::morph::morph_into;
use polysketch_wasm::shape::GeneratedShape;
use polysketch_wasm::SketchConfig;

fn ndc() -> impl Strategy<Value = Vec2> {
    (-1.0f32..=1.0, -1.0f32..=1.0).prop_map(|(x, y)| Vec2::new(x, y))
}

proptest! {
    #[test]
    fn admitted_samples_are_spaced_past_the_threshold(
        samples in prop::collection::vec(ndc(), 1..200),
        seed in any::<u64>(),
    ) {
        let config = SketchConfig::wireframe().capture;
        let mut capture = PathCapture::new(config);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut admitted: Vec<Vec2> = Vec::new();
        for s in samples {
            match capture.offer(s, &mut rng) {
                Admission::Admitted | Admission::Triggered => admitted.push(s),
                _ => {}
            }
        }
        for w in admitted.windows(2) {
            prop_assert!(w[0].distance(w[1]) > config.move_threshold);
        }
        prop_assert!(capture.points().len() <= config.trigger_count);
        prop_assert_eq!(capture.points().len(), admitted.len());
    }

    #[test]
    fn every_wireframe_vertex_has_three_distinct_neighbours(
        n in 4usize..64,
        seed in any::<u64>(),
    ) {
        let path: Vec<Vec3> = (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let mut rng = SmallRng::seed_from_u64(seed);
        let shape = GeneratedShape::wireframe(&path, [0.15, 0.15, 0.25], 3, &mut rng).unwrap();
        for (i, picks) in shape.outgoing.iter().enumerate() {
            prop_assert_eq!(picks.len(), 3);
            prop_assert!(picks.iter().all(|&j| j != i && j < n));
            let mut distinct = picks.clone();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(distinct.len(), 3);
            for &j in picks {
                let edge = [i.min(j), i.max(j)];
                prop_assert!(shape.segments.contains(&edge));
            }
        }
        // no undirected edge is listed twice
        let mut sorted = shape.segments.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), shape.segments.len());
    }

    #[test]
    fn morph_is_pure_in_time(now in 0.0f64..1.0e7) {
        let params = SketchConfig::polyhedron().morph;
        let base = GeneratedShape::dodecahedron(2.5).base;
        let mut a = Vec::new();
        let mut b = vec![Vec3::splat(-1.0); 3];
        morph_into(&base, now, &params, &mut a);
        morph_into(&base, now, &params, &mut b);
        prop_assert_eq!(a, b);
    }
}
