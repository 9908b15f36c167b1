//! Indexed triangle geometry and primitive generators
//!
//! Primitives follow the usual real-time convention of duplicating vertices
//! along hard edges and UV seams, so one corner of a box is stored three
//! times. Anything that moves vertices must keep those copies together
//! (see `displace`).

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

/// Indexed triangle list with per-vertex normals and UVs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned box centred on the origin (24 vertices, 12 triangles).
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let hw = width * 0.5;
        let hh = height * 0.5;
        let hd = depth * 0.5;
        let mut geom = Geometry::default();

        // (normal, u axis, v axis) for each face
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let half = Vec3::new(hw, hh, hd);

        for (normal, u_axis, v_axis) in faces {
            let base = geom.positions.len() as u32;
            for (u, v) in [(-1.0, 1.0), (1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)] {
                let p = (normal + u_axis * u + v_axis * v) * half;
                geom.positions.push(p);
                geom.normals.push(normal);
                geom.uvs.push(Vec2::new((u + 1.0) * 0.5, (v + 1.0) * 0.5));
            }
            geom.indices
                .extend_from_slice(&[base, base + 2, base + 1, base + 2, base + 3, base + 1]);
        }

        geom
    }

    /// UV sphere. Pole and seam vertices are duplicated.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self::sphere_section(radius, width_segments, height_segments, 0.0, PI)
    }

    /// Partial UV sphere between polar angles `theta_start` and
    /// `theta_start + theta_length` (a dome uses `0..PI/2`).
    pub fn sphere_section(
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        theta_start: f32,
        theta_length: f32,
    ) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let theta_end = (theta_start + theta_length).min(PI);
        let mut geom = Geometry::default();

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let theta = theta_start + v * theta_length;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let phi = u * TAU;
                let p = Vec3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                geom.positions.push(p);
                geom.normals.push(p.normalize_or_zero());
                geom.uvs.push(Vec2::new(u, 1.0 - v));
            }
        }

        let row = ws + 1;
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 || theta_start > 0.0 {
                    geom.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 || theta_end < PI {
                    geom.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        geom
    }

    /// Cylinder (or cone / frustum) along Y, centred on the origin.
    pub fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        open_ended: bool,
    ) -> Self {
        let rs = radial_segments.max(3);
        let half = height * 0.5;
        let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);
        let mut geom = Geometry::default();

        // Torso: two rings, seam duplicated
        for (row, (y, radius)) in [(half, radius_top), (-half, radius_bottom)]
            .into_iter()
            .enumerate()
        {
            for ix in 0..=rs {
                let u = ix as f32 / rs as f32;
                let theta = u * TAU;
                let (sin, cos) = theta.sin_cos();
                geom.positions.push(Vec3::new(radius * sin, y, radius * cos));
                geom.normals
                    .push(Vec3::new(sin, slope, cos).normalize_or_zero());
                geom.uvs.push(Vec2::new(u, 1.0 - row as f32));
            }
        }
        let row = rs + 1;
        for ix in 0..rs {
            let a = ix;
            let b = row + ix;
            let c = row + ix + 1;
            let d = ix + 1;
            geom.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        if !open_ended {
            if radius_top > 0.0 {
                geom.push_cap(half, radius_top, rs, true);
            }
            if radius_bottom > 0.0 {
                geom.push_cap(-half, radius_bottom, rs, false);
            }
        }

        geom
    }

    fn push_cap(&mut self, y: f32, radius: f32, segments: u32, top: bool) {
        let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
        let center_start = self.positions.len() as u32;

        // One centre vertex per segment, like the rim duplicates
        for _ in 0..segments {
            self.positions.push(Vec3::new(0.0, y, 0.0));
            self.normals.push(normal);
            self.uvs.push(Vec2::splat(0.5));
        }
        let rim_start = self.positions.len() as u32;
        for ix in 0..=segments {
            let theta = ix as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            self.positions.push(Vec3::new(radius * sin, y, radius * cos));
            self.normals.push(normal);
            self.uvs
                .push(Vec2::new(cos * 0.5 + 0.5, sin * 0.5 * normal.y + 0.5));
        }
        for ix in 0..segments {
            let c = center_start + ix;
            let i = rim_start + ix;
            if top {
                self.indices.extend_from_slice(&[i, i + 1, c]);
            } else {
                self.indices.extend_from_slice(&[i + 1, i, c]);
            }
        }
    }

    /// Torus in the XY plane around the Z axis, sweeping `arc` radians.
    pub fn torus(
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
        arc: f32,
    ) -> Self {
        let rs = radial_segments.max(3);
        let ts = tubular_segments.max(3);
        let mut geom = Geometry::default();

        for j in 0..=rs {
            for i in 0..=ts {
                let u = i as f32 / ts as f32 * arc;
                let v = j as f32 / rs as f32 * TAU;
                let p = Vec3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
                geom.positions.push(p);
                geom.normals.push((p - center).normalize_or_zero());
                geom.uvs
                    .push(Vec2::new(i as f32 / ts as f32, j as f32 / rs as f32));
            }
        }

        for j in 1..=rs {
            for i in 1..=ts {
                let a = (ts + 1) * j + i - 1;
                let b = (ts + 1) * (j - 1) + i - 1;
                let c = (ts + 1) * (j - 1) + i;
                let d = (ts + 1) * j + i;
                geom.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        geom
    }

    /// Flat rectangle in the XZ plane facing +Y.
    pub fn plane(width: f32, depth: f32) -> Self {
        let hw = width * 0.5;
        let hd = depth * 0.5;
        Geometry {
            positions: vec![
                Vec3::new(-hw, 0.0, -hd),
                Vec3::new(hw, 0.0, -hd),
                Vec3::new(-hw, 0.0, hd),
                Vec3::new(hw, 0.0, hd),
            ],
            normals: vec![Vec3::Y; 4],
            uvs: vec![
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
            ],
            indices: vec![0, 2, 1, 2, 3, 1],
        }
    }

    pub fn translated(mut self, offset: Vec3) -> Self {
        for p in &mut self.positions {
            *p += offset;
        }
        self
    }

    pub fn scaled(mut self, factor: Vec3) -> Self {
        for p in &mut self.positions {
            *p *= factor;
        }
        self.compute_vertex_normals();
        self
    }

    /// Recompute smooth normals by accumulating area-weighted face normals
    /// onto each indexed vertex.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            let face = (pc - pb).cross(pa - pb);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        self.normals = normals;
    }

    /// Returns `(min, max)` corners, or `None` for empty geometry.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_counts_and_extent() {
        let geom = Geometry::cuboid(2.0, 4.0, 6.0);
        assert_eq!(geom.vertex_count(), 24);
        assert_eq!(geom.triangle_count(), 12);

        let (min, max) = geom.bounding_box().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_cuboid_corner_is_shared_by_three_faces() {
        let geom = Geometry::cuboid(1.0, 1.0, 1.0);
        let corner = Vec3::splat(0.5);
        let copies = geom.positions.iter().filter(|p| **p == corner).count();
        assert_eq!(copies, 3);
    }

    #[test]
    fn test_sphere_vertices_on_radius() {
        let geom = Geometry::sphere(2.0, 12, 8);
        assert_eq!(geom.vertex_count(), 13 * 9);
        for p in &geom.positions {
            assert!((p.length() - 2.0).abs() < 1e-4);
        }
        // Poles skip degenerate triangles
        assert_eq!(geom.triangle_count(), 12 * 8 * 2 - 12 * 2);
    }

    #[test]
    fn test_cylinder_with_and_without_caps() {
        let open = Geometry::cylinder(1.0, 1.0, 2.0, 8, true);
        let closed = Geometry::cylinder(1.0, 1.0, 2.0, 8, false);
        assert_eq!(open.triangle_count(), 16);
        assert_eq!(closed.triangle_count(), 32);

        // Cone: no top cap
        let cone = Geometry::cylinder(0.0, 1.0, 2.0, 8, false);
        assert_eq!(cone.triangle_count(), 24);
    }

    #[test]
    fn test_compute_vertex_normals_plane_faces_up() {
        let mut geom = Geometry::plane(1.0, 1.0);
        geom.normals.clear();
        geom.compute_vertex_normals();
        for n in &geom.normals {
            assert!((*n - Vec3::Y).length() < 1e-5);
        }
    }

    #[test]
    fn test_compute_vertex_normals_matches_cuboid_faces() {
        let mut geom = Geometry::cuboid(1.0, 1.0, 1.0);
        let expected = geom.normals.clone();
        geom.compute_vertex_normals();
        for (a, b) in geom.normals.iter().zip(expected.iter()) {
            assert!((*a - *b).length() < 1e-5);
        }
    }

    #[test]
    fn test_torus_extent() {
        let geom = Geometry::torus(1.0, 0.25, 8, 16, TAU);
        let (min, max) = geom.bounding_box().unwrap();
        assert!((max.x - 1.25).abs() < 1e-3);
        assert!((min.z + 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_empty_geometry_has_no_bounds() {
        assert!(Geometry::default().bounding_box().is_none());
    }
}
