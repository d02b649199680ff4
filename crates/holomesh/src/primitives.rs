//! Procedural shapes used when a model asset cannot be loaded.

use crate::{face_normal, normalize_or, Mesh};
use std::f32::consts::TAU;

/// Torus around the Y axis.
///
/// `major_segments` steps go around the ring and `minor_segments` around the
/// tube. The seam vertices are duplicated, giving `(major+1)*(minor+1)`
/// vertices and `major*minor*6` indices.
pub fn torus(
    major_radius: f32,
    minor_radius: f32,
    major_segments: u32,
    minor_segments: u32,
) -> Mesh {
    let major_segments = major_segments.max(3);
    let minor_segments = minor_segments.max(3);

    let ring = (minor_segments + 1) as usize;
    let capacity = (major_segments as usize + 1) * ring;
    let mut mesh = Mesh {
        positions: Vec::with_capacity(capacity),
        normals: Vec::with_capacity(capacity),
        indices: Vec::with_capacity((major_segments * minor_segments * 6) as usize),
    };

    for i in 0..=major_segments {
        let u = i as f32 / major_segments as f32 * TAU;
        let (sin_u, cos_u) = u.sin_cos();

        for j in 0..=minor_segments {
            let v = j as f32 / minor_segments as f32 * TAU;
            let (sin_v, cos_v) = v.sin_cos();

            let r = major_radius + minor_radius * cos_v;
            mesh.positions
                .push([r * cos_u, minor_radius * sin_v, -r * sin_u]);
            mesh.normals.push([cos_v * cos_u, sin_v, -cos_v * sin_u]);
        }
    }

    for i in 0..major_segments as usize {
        for j in 0..minor_segments as usize {
            let a = (i * ring + j) as u32;
            let b = ((i + 1) * ring + j) as u32;
            let c = b + 1;
            let d = a + 1;
            mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }

    mesh
}

/// Regular icosahedron with flat shading (three unshared vertices per face).
pub fn icosahedron(radius: f32) -> Mesh {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let corners: [[f32; 3]; 12] = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    #[rustfmt::skip]
    const FACES: [[usize; 3]; 20] = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    let scale = radius / (1.0 + t * t).sqrt();
    let mut mesh = Mesh::default();

    for face in FACES {
        let [a, b, c] = face.map(|k| corners[k].map(|x| x * scale));
        let n = normalize_or(face_normal(a, b, c), [0.0, 1.0, 0.0]);
        let base = mesh.positions.len() as u32;
        mesh.positions.extend_from_slice(&[a, b, c]);
        mesh.normals.extend_from_slice(&[n, n, n]);
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn torus_counts_match_segments() {
        let mesh = torus(1.0, 0.5, 40, 20);
        assert_eq!(mesh.vertex_count(), 41 * 21);
        assert_eq!(mesh.indices.len(), 40 * 20 * 6);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn torus_extent_is_major_plus_minor() {
        let b = torus(1.0, 0.5, 40, 20).bounds().unwrap();
        assert!((b.max[0] - 1.5).abs() < 1e-5);
        assert!((b.max[1] - 0.5).abs() < 1e-5);
        assert!((b.min[1] + 0.5).abs() < 1e-5);
    }

    #[test]
    fn torus_faces_wind_outward() {
        let mesh = torus(1.0, 0.5, 16, 8);
        for tri in mesh.indices.chunks_exact(3) {
            let p: Vec<[f32; 3]> = tri.iter().map(|&i| mesh.positions[i as usize]).collect();
            let n = face_normal(p[0], p[1], p[2]);
            let vn = mesh.normals[tri[0] as usize];
            assert!(dot(n, vn) >= -1e-6);
        }
    }

    #[test]
    fn icosahedron_vertices_lie_on_sphere() {
        let mesh = icosahedron(2.0);
        assert_eq!(mesh.triangle_count(), 20);
        assert_eq!(mesh.vertex_count(), 60);
        for p in &mesh.positions {
            assert!((dot(*p, *p).sqrt() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn icosahedron_normals_point_outward() {
        let mesh = icosahedron(1.0);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!(dot(*p, *n) > 0.0);
        }
    }
}
