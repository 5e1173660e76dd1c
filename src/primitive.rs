//! Canonical shapes the scene is built from.
//!
//! Each [`Primitive`] has a fixed object-space size; the scene shapes them entirely
//! through the matrix stack. Geometry is generated on the CPU here and uploaded once by
//! the GPU backend.
//!
//! | Primitive         | Object space                                              |
//! |-------------------|-----------------------------------------------------------|
//! | `Cube`            | 2×2×2, centered at the origin                             |
//! | `Sphere`          | radius 1, centered at the origin                          |
//! | `Cylinder`        | along Z, height 1, radius 0.5, centered, capped           |
//! | `Cone`            | along Z, height 1, base radius 1 at z = -0.5              |
//! | `TaperedCylinder` | along Z, height 1, radius 0.5 narrowing by 20% to the top |

use std::f32::consts::TAU;

use glam::Vec3;

use crate::mesh::Vertex3d;

/// How much the tapered cylinder narrows from bottom to top.
pub const TAPER_AMOUNT: f32 = 0.2;

/// A canonical shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    TaperedCylinder,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Cube,
        Primitive::Sphere,
        Primitive::Cylinder,
        Primitive::Cone,
        Primitive::TaperedCylinder,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Generate this primitive's geometry.
    pub fn geometry(self) -> Geometry {
        match self {
            Primitive::Cube => Geometry::cube(),
            Primitive::Sphere => Geometry::sphere(36, 18),
            Primitive::Cylinder => Geometry::cylinder(24),
            Primitive::Cone => Geometry::cone(24),
            Primitive::TaperedCylinder => Geometry::tube(12, 9, TAPER_AMOUNT),
        }
    }
}

/// CPU-side triangle list.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<Vertex3d>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), v| {
                let p = Vec3::from(v.position);
                (min.min(p), max.max(p))
            },
        )
    }

    fn push(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices
            .push(Vertex3d::new(position.to_array(), normal.to_array(), uv));
        index
    }

    /// 2×2×2 cube with per-face normals.
    pub fn cube() -> Self {
        let mut geometry = Self::default();
        let faces = [
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        ];

        for (normal, u, v) in faces {
            let a = geometry.push(normal - u - v, normal, [0.0, 0.0]);
            let b = geometry.push(normal + u - v, normal, [1.0, 0.0]);
            let c = geometry.push(normal + u + v, normal, [1.0, 1.0]);
            let d = geometry.push(normal - u + v, normal, [0.0, 1.0]);
            geometry.indices.extend_from_slice(&[a, b, c, c, d, a]);
        }

        geometry
    }

    /// Unit-radius UV sphere.
    pub fn sphere(segments: u32, rings: u32) -> Self {
        let mut geometry = Self::default();

        for ring in 0..=rings {
            let phi = std::f32::consts::PI * ring as f32 / rings as f32;
            let y = phi.cos();
            let ring_radius = phi.sin();

            for seg in 0..=segments {
                let theta = TAU * seg as f32 / segments as f32;
                let p = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
                geometry.push(
                    p,
                    p,
                    [seg as f32 / segments as f32, ring as f32 / rings as f32],
                );
            }
        }

        for ring in 0..rings {
            for seg in 0..segments {
                let current = ring * (segments + 1) + seg;
                let next = current + segments + 1;
                geometry
                    .indices
                    .extend_from_slice(&[current, next, current + 1, current + 1, next, next + 1]);
            }
        }

        geometry
    }

    /// Open tube along Z from z = -0.5 to 0.5, radius 0.5 at the bottom narrowing by
    /// `taper` toward the top.
    pub fn tube(slices: u32, stacks: u32, taper: f32) -> Self {
        let mut geometry = Self::default();

        for stack in 0..=stacks {
            let v = stack as f32 / stacks as f32;
            let radius = 0.5 * (1.0 - taper * v);
            for slice in 0..=slices {
                let u = slice as f32 / slices as f32;
                let (sin, cos) = (u * TAU).sin_cos();
                geometry.push(
                    Vec3::new(radius * cos, radius * sin, v - 0.5),
                    Vec3::new(cos, sin, 0.0),
                    [u, v * (1.0 - taper)],
                );
            }
        }

        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * (slices + 1) + slice;
                let b = a + 1;
                let c = a + slices + 1;
                let d = c + 1;
                geometry.indices.extend_from_slice(&[a, b, d, a, d, c]);
            }
        }

        geometry
    }

    /// Capped cylinder along Z, height 1, radius 0.5.
    pub fn cylinder(slices: u32) -> Self {
        let mut geometry = Self::tube(slices, 1, 0.0);
        geometry.cap(slices, 0.5, 0.5);
        geometry.cap(slices, 0.5, -0.5);
        geometry
    }

    /// Cone along Z with its base (radius 1) at z = -0.5 and apex at z = 0.5.
    pub fn cone(slices: u32) -> Self {
        let mut geometry = Self::default();
        let apex = Vec3::new(0.0, 0.0, 0.5);

        for slice in 0..slices {
            let u0 = slice as f32 / slices as f32;
            let u1 = (slice + 1) as f32 / slices as f32;
            let mid = (u0 + u1) * 0.5 * TAU;
            let (s0, c0) = (u0 * TAU).sin_cos();
            let (s1, c1) = (u1 * TAU).sin_cos();

            let n0 = Vec3::new(c0, s0, 1.0).normalize();
            let n1 = Vec3::new(c1, s1, 1.0).normalize();
            let n_apex = Vec3::new(mid.cos(), mid.sin(), 1.0).normalize();

            let a = geometry.push(Vec3::new(c0, s0, -0.5), n0, [u0, 0.0]);
            let b = geometry.push(Vec3::new(c1, s1, -0.5), n1, [u1, 0.0]);
            let c = geometry.push(apex, n_apex, [(u0 + u1) * 0.5, 1.0]);
            geometry.indices.extend_from_slice(&[a, b, c]);
        }

        geometry.cap(slices, 1.0, -0.5);
        geometry
    }

    /// Flat disk closing a Z-aligned shape at height `z`, facing away from the origin.
    fn cap(&mut self, slices: u32, radius: f32, z: f32) {
        let normal = if z >= 0.0 { Vec3::Z } else { Vec3::NEG_Z };
        let center = self.push(Vec3::new(0.0, 0.0, z), normal, [0.5, 0.5]);
        let first = self.vertices.len() as u32;

        for slice in 0..=slices {
            let (sin, cos) = (slice as f32 / slices as f32 * TAU).sin_cos();
            self.push(
                Vec3::new(radius * cos, radius * sin, z),
                normal,
                [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
            );
        }

        for slice in 0..slices {
            let (a, b) = (first + slice, first + slice + 1);
            if z >= 0.0 {
                self.indices.extend_from_slice(&[center, a, b]);
            } else {
                self.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_near(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-5), "{a:?} != {b:?}");
    }

    #[test]
    fn cube_spans_two_units() {
        let cube = Geometry::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.triangle_count(), 12);
        let (min, max) = cube.bounds();
        assert_vec_near(min, Vec3::splat(-1.0));
        assert_vec_near(max, Vec3::splat(1.0));
    }

    #[test]
    fn sphere_has_unit_radius() {
        let sphere = Geometry::sphere(16, 8);
        assert_eq!(sphere.vertices.len(), 17 * 9);
        assert_eq!(sphere.triangle_count(), 16 * 8 * 2);
        for v in &sphere.vertices {
            assert!((Vec3::from(v.position).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn tapered_tube_narrows_toward_top() {
        let tube = Geometry::tube(8, 4, TAPER_AMOUNT);
        assert_eq!(tube.triangle_count(), 8 * 4 * 2);

        let top_radius = tube
            .vertices
            .iter()
            .filter(|v| (v.position[2] - 0.5).abs() < 1e-6)
            .map(|v| Vec3::new(v.position[0], v.position[1], 0.0).length())
            .fold(0.0f32, f32::max);
        assert!((top_radius - 0.4).abs() < 1e-5);

        let (min, max) = tube.bounds();
        assert!((min.z + 0.5).abs() < 1e-6);
        assert!((max.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn cylinder_is_capped() {
        let open = Geometry::tube(10, 1, 0.0);
        let capped = Geometry::cylinder(10);
        assert_eq!(capped.triangle_count(), open.triangle_count() + 20);
    }

    #[test]
    fn cone_base_and_apex() {
        let cone = Geometry::cone(12);
        assert_eq!(cone.triangle_count(), 24);
        let (min, max) = cone.bounds();
        assert!((min.z + 0.5).abs() < 1e-6);
        assert!((max.z - 0.5).abs() < 1e-6);
        assert!((max.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn every_primitive_produces_indexed_triangles() {
        for primitive in Primitive::ALL {
            let geometry = primitive.geometry();
            assert!(!geometry.indices.is_empty(), "{primitive:?}");
            assert_eq!(geometry.indices.len() % 3, 0);
            let count = geometry.vertices.len() as u32;
            assert!(geometry.indices.iter().all(|&i| i < count));
        }
    }
}
