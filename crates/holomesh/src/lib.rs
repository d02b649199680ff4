//! HOLOMESH: small triangle-mesh library behind the pyramid hologram viewer.
//!
//! - Indexed triangle meshes with one normal per vertex.
//! - Wavefront OBJ reader (positions, normals, polygon faces).
//! - Procedural fallback shapes (torus, icosahedron).
//! - Axis-aligned bounds, used to frame a model with the camera rig.
//!
//! Layout of a [`Mesh`]:
//!   positions[i], normals[i]  : vertex i (parallel arrays)
//!   indices                   : u32 triples, counter-clockwise front faces
//!
//! The library has no GPU dependency; [`MeshVertex`] is `Pod` so callers can
//! upload [`Mesh::vertices`] with a plain byte cast.

pub mod obj;
pub mod primitives;

pub use obj::{parse_obj, parse_obj_bytes, read_obj};
pub use primitives::{icosahedron, torus};

/// Interleaved vertex as uploaded to the GPU (`position`, `normal`).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    #[inline]
    pub fn center(&self) -> [f32; 3] {
        [
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
            0.5 * (self.min[2] + self.max[2]),
        ]
    }

    /// Radius of the sphere through the box corners (half the diagonal).
    #[inline]
    pub fn radius(&self) -> f32 {
        let dx = self.max[0] - self.min[0];
        let dy = self.max[1] - self.min[1];
        let dz = self.max[2] - self.min[2];
        0.5 * (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Mesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Interleaves positions and normals for upload.
    pub fn vertices(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(&position, &normal)| MeshVertex { position, normal })
            .collect()
    }

    /// Bounds over all positions; `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.positions.first()?;
        let (min, max) = self
            .positions
            .iter()
            .fold((first, first), |(mut lo, mut hi), p| {
                for k in 0..3 {
                    lo[k] = lo[k].min(p[k]);
                    hi[k] = hi[k].max(p[k]);
                }
                (lo, hi)
            });
        Some(Bounds { min, max })
    }

    /// Translates the mesh so its bounds center sits at the origin.
    pub fn recentered(mut self) -> Self {
        if let Some(b) = self.bounds() {
            let c = b.center();
            for p in &mut self.positions {
                p[0] -= c[0];
                p[1] -= c[1];
                p[2] -= c[2];
            }
        }
        self
    }

    /// Replaces all normals with area-weighted smooth normals.
    ///
    /// Each triangle adds its unnormalized face normal (whose length is twice
    /// its area) to its three corners. Vertices no triangle touches get +Y.
    pub fn compute_smooth_normals(&mut self) {
        let mut acc = vec![[0.0f32; 3]; self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let n = face_normal(self.positions[a], self.positions[b], self.positions[c]);
            for &i in &[a, b, c] {
                acc[i][0] += n[0];
                acc[i][1] += n[1];
                acc[i][2] += n[2];
            }
        }

        self.normals = acc
            .into_iter()
            .map(|n| normalize_or(n, [0.0, 1.0, 0.0]))
            .collect();
    }
}

/// Unnormalized normal of the counter-clockwise triangle `a, b, c`.
#[inline]
pub(crate) fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

#[inline]
pub(crate) fn normalize_or(v: [f32; 3], fallback: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > f32::EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Mesh {
        Mesh {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0; 3]; 3],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn bounds_of_empty_mesh_is_none() {
        assert!(Mesh::default().bounds().is_none());
        assert!(Mesh::default().is_empty());
    }

    #[test]
    fn bounds_center_and_radius() {
        let mesh = Mesh {
            positions: vec![[-1.0, 2.0, 0.0], [3.0, 4.0, 0.0], [1.0, 3.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: vec![0, 1, 2],
        };
        let b = mesh.bounds().unwrap();
        assert_eq!(b.min, [-1.0, 2.0, 0.0]);
        assert_eq!(b.max, [3.0, 4.0, 0.0]);
        assert_eq!(b.center(), [1.0, 3.0, 0.0]);
        // Half of sqrt(4^2 + 2^2).
        assert!((b.radius() - 20f32.sqrt() / 2.0).abs() < 1e-6);
    }

    #[test]
    fn recentered_moves_center_to_origin() {
        let mesh = Mesh {
            positions: vec![[10.0, 10.0, 10.0], [12.0, 14.0, 16.0]],
            normals: vec![[0.0, 1.0, 0.0]; 2],
            indices: vec![],
        }
        .recentered();
        let c = mesh.bounds().unwrap().center();
        assert_eq!(c, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.positions[0], [-1.0, -2.0, -3.0]);
    }

    #[test]
    fn smooth_normals_follow_winding() {
        let mut mesh = unit_triangle();
        mesh.compute_smooth_normals();
        for n in &mesh.normals {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn vertices_interleave_in_order() {
        let mut mesh = unit_triangle();
        mesh.compute_smooth_normals();
        let verts = mesh.vertices();
        assert_eq!(verts.len(), 3);
        assert_eq!(verts[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(verts[1].normal, [0.0, 0.0, 1.0]);
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
    }
}
