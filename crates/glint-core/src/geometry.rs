//! Procedural demo geometry.
//!
//! The demos use three models: a unit cube, a ground/mirror quad, and a
//! faceted gem. All are generated here rather than loaded from files, with
//! per-vertex positions, normals, and UVs plus a triangle index list.

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

use crate::error::{GlintError, Result};

/// CPU-side mesh: parallel attribute arrays plus triangle indices.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex unit normals.
    pub normals: Vec<Vec3>,
    /// Per-vertex texture coordinates.
    pub uvs: Vec<Vec2>,
    /// Triangle indices, three per face.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangle indices.
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Checks attribute array consistency and index bounds.
    pub fn validate(&self) -> Result<()> {
        let n = self.positions.len();
        if self.normals.len() != n {
            return Err(GlintError::SizeMismatch {
                expected: n,
                actual: self.normals.len(),
            });
        }
        if self.uvs.len() != n {
            return Err(GlintError::SizeMismatch {
                expected: n,
                actual: self.uvs.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(GlintError::SizeMismatch {
                expected: self.indices.len().div_ceil(3) * 3,
                actual: self.indices.len(),
            });
        }
        for &index in &self.indices {
            if index as usize >= n {
                return Err(GlintError::IndexOutOfBounds {
                    index,
                    vertex_count: n,
                });
            }
        }
        Ok(())
    }
}

/// A unit cube centered at the origin, 24 vertices with per-face normals.
#[must_use]
pub fn cube() -> MeshData {
    // (normal, tangent, bitangent) per face; corners wound counterclockwise
    // as seen from outside.
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (normal, tangent, bitangent) in faces {
        let base = mesh.positions.len() as u32;
        for (u, v) in [(0.0_f32, 0.0_f32), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            let corner = normal + tangent * (u * 2.0 - 1.0) + bitangent * (v * 2.0 - 1.0);
            mesh.positions.push(corner * 0.5);
            mesh.normals.push(normal);
            mesh.uvs.push(Vec2::new(u, v));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// A unit quad in the XZ plane spanning [-1, 1], facing +Y.
///
/// Shared by the mirror surface and, reinterpreted in clip space by its
/// vertex shader, the skybox.
#[must_use]
pub fn plane() -> MeshData {
    let corners = [
        Vec3::new(-1.0, 0.0, -1.0),
        Vec3::new(1.0, 0.0, -1.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(-1.0, 0.0, 1.0),
    ];
    MeshData {
        positions: corners.to_vec(),
        normals: vec![Vec3::Y; 4],
        uvs: vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ],
        indices: vec![0, 2, 1, 0, 3, 2],
    }
}

/// A faceted gem: a bipyramid over an `n`-sided girdle, flat-shaded.
///
/// Vertices are duplicated per face so each facet keeps a hard edge.
#[must_use]
pub fn gem(sides: usize) -> MeshData {
    let sides = sides.max(3);
    let top = Vec3::new(0.0, 1.0, 0.0);
    let bottom = Vec3::new(0.0, -1.0, 0.0);

    let ring: Vec<Vec3> = (0..sides)
        .map(|i| {
            let theta = TAU * i as f32 / sides as f32;
            Vec3::new(theta.cos(), 0.0, theta.sin())
        })
        .collect();

    let mut mesh = MeshData::default();
    let mut push_facet = |apex: Vec3, a: Vec3, b: Vec3| {
        let mut normal = (a - apex).cross(b - apex).normalize();
        let centroid = (apex + a + b) / 3.0;
        // Flip inward-wound facets so every normal points away from the axis.
        let (a, b) = if normal.dot(centroid) < 0.0 {
            normal = -normal;
            (b, a)
        } else {
            (a, b)
        };
        let base = mesh.positions.len() as u32;
        for p in [apex, a, b] {
            mesh.positions.push(p);
            mesh.normals.push(normal);
            mesh.uvs
                .push(Vec2::new(p.x.mul_add(0.5, 0.5), p.z.mul_add(0.5, 0.5)));
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    };

    for i in 0..sides {
        let a = ring[i];
        let b = ring[(i + 1) % sides];
        push_facet(top, a, b);
        push_facet(bottom, a, b);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_is_consistent() {
        let mesh = cube();
        mesh.validate().unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
    }

    #[test]
    fn test_cube_normals_are_unit_axis_aligned() {
        for n in cube().normals {
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert!((n.x.abs() + n.y.abs() + n.z.abs() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_plane_faces_up() {
        let mesh = plane();
        mesh.validate().unwrap();
        assert!(mesh.normals.iter().all(|n| *n == Vec3::Y));
        // Winding must agree with the +Y normal.
        let [a, b, c] = [0, 2, 1].map(|i| mesh.positions[mesh.indices[i] as usize]);
        let face_normal = (b - a).cross(c - a).normalize();
        assert!((face_normal - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_gem_facets_point_outward() {
        let mesh = gem(8);
        mesh.validate().unwrap();
        assert_eq!(mesh.index_count(), 8 * 2 * 3);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize]);
            let face_normal = (b - a).cross(c - a).normalize();
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0, "facet winds inward");
            // Stored normals agree with the geometric one.
            let stored = mesh.normals[tri[0] as usize];
            assert!((stored - face_normal).length() < 1e-5);
        }
    }

    #[test]
    fn test_gem_clamps_degenerate_side_count() {
        let mesh = gem(1);
        mesh.validate().unwrap();
        assert_eq!(mesh.index_count(), 3 * 2 * 3);
    }

    #[test]
    fn test_validate_rejects_bad_indices() {
        let mut mesh = plane();
        mesh.indices[0] = 99;
        assert!(matches!(
            mesh.validate(),
            Err(GlintError::IndexOutOfBounds { index: 99, .. })
        ));
    }
}
