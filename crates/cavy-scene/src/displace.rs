//! Organic vertex displacement
//!
//! Nudges X/Z of every vertex by a small random offset while keeping Y.
//! Vertices that start at the same position (to 4 decimal places) share one
//! offset, so duplicated seam vertices stay welded and no cracks open up.

use ahash::AHashMap;

use crate::geometry::Geometry;
use crate::rng::SceneRng;

/// Angular frequency of the twist term along Y
const TWIST_FREQUENCY: f32 = 4.0;

/// Scale at which positions are quantised for the seam cache
const WELD_SCALE: f32 = 10_000.0;

fn weld_key(p: glam::Vec3) -> (i64, i64, i64) {
    (
        (p.x * WELD_SCALE).round() as i64,
        (p.y * WELD_SCALE).round() as i64,
        (p.z * WELD_SCALE).round() as i64,
    )
}

/// Displace `geometry` in place and recompute its normals.
///
/// `twist` adds a helical term `twist * (sin(k*y), cos(k*y))` on top of
/// the random offset. Randomness comes from `rng`; pass a seeded generator
/// to make the result reproducible.
pub fn displace(geometry: &mut Geometry, magnitude: f32, twist: f32, rng: &mut impl SceneRng) {
    let mut offsets: AHashMap<(i64, i64, i64), (f32, f32)> = AHashMap::new();

    for p in &mut geometry.positions {
        let (dx, dz) = *offsets.entry(weld_key(*p)).or_insert_with(|| {
            let mut dx = rng.spread(magnitude);
            let mut dz = rng.spread(magnitude);
            if twist != 0.0 {
                let phase = p.y * TWIST_FREQUENCY;
                dx += phase.sin() * twist;
                dz += phase.cos() * twist;
            }
            (dx, dz)
        });
        p.x += dx;
        p.z += dz;
    }

    geometry.compute_vertex_normals();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;
    use glam::Vec3;

    #[test]
    fn test_shared_corner_stays_welded() {
        let mut geom = Geometry::cuboid(1.0, 1.0, 1.0);
        let corner = Vec3::splat(0.5);
        let before: Vec<usize> = geom
            .positions
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == corner)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(before.len(), 3);

        displace(&mut geom, 0.2, 0.0, &mut seeded_rng(5));

        let moved = geom.positions[before[0]];
        for &i in &before[1..] {
            assert_eq!(geom.positions[i], moved);
        }
    }

    #[test]
    fn test_y_is_untouched() {
        let mut geom = Geometry::cylinder(0.5, 0.5, 2.0, 8, false);
        let ys: Vec<f32> = geom.positions.iter().map(|p| p.y).collect();
        displace(&mut geom, 0.1, 0.05, &mut seeded_rng(11));
        for (p, y) in geom.positions.iter().zip(ys) {
            assert_eq!(p.y, y);
        }
    }

    #[test]
    fn test_offset_bounded_by_magnitude() {
        let mut geom = Geometry::sphere(1.0, 8, 6);
        let original = geom.positions.clone();
        displace(&mut geom, 0.05, 0.0, &mut seeded_rng(3));
        for (a, b) in geom.positions.iter().zip(original.iter()) {
            assert!((a.x - b.x).abs() <= 0.05);
            assert!((a.z - b.z).abs() <= 0.05);
        }
    }

    #[test]
    fn test_twist_follows_height() {
        // Zero magnitude isolates the twist term
        let mut geom = Geometry::cylinder(0.5, 0.5, 2.0, 8, true);
        let original = geom.positions.clone();
        displace(&mut geom, 0.0, 0.1, &mut seeded_rng(1));
        for (a, b) in geom.positions.iter().zip(original.iter()) {
            let phase = b.y * TWIST_FREQUENCY;
            assert!((a.x - b.x - phase.sin() * 0.1).abs() < 1e-6);
            assert!((a.z - b.z - phase.cos() * 0.1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_normals_recomputed() {
        let mut geom = Geometry::cuboid(1.0, 1.0, 1.0);
        displace(&mut geom, 0.3, 0.0, &mut seeded_rng(9));
        assert_eq!(geom.normals.len(), geom.positions.len());
        for n in &geom.normals {
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }
}
