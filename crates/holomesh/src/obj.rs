//! Wavefront OBJ reader.
//!
//! Supported records:
//!   v  x y z [w]        position (w ignored)
//!   vn x y z            normal
//!   f  c c c [c ...]    polygon; corners are `v`, `v/vt`, `v//vn` or `v/vt/vn`
//!
//! Indices are 1-based; negative indices count back from the latest record.
//! Polygons are fanned into triangles. Everything else (`vt`, `o`, `g`, `s`,
//! `usemtl`, `mtllib`, comments) is skipped.

use crate::Mesh;
use std::collections::HashMap;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

#[cold]
fn bad(line: usize, msg: &str) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, format!("OBJ line {}: {}", line, msg))
}

fn parse_vec3<'a, I>(parts: &mut I, line: usize) -> io::Result<[f32; 3]>
where
    I: Iterator<Item = &'a str>,
{
    let mut out = [0.0f32; 3];
    for (k, slot) in out.iter_mut().enumerate() {
        let tok = parts
            .next()
            .ok_or_else(|| bad(line, &format!("expected 3 components, found {}", k)))?;
        *slot = tok
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| bad(line, &format!("malformed number '{}'", tok)))?;
    }
    Ok(out)
}

/// Resolves a 1-based (or negative, relative) OBJ index against `len` records.
fn resolve_index(tok: &str, len: usize, line: usize) -> io::Result<u32> {
    let raw: i64 = tok
        .parse()
        .map_err(|_| bad(line, &format!("malformed index '{}'", tok)))?;

    let idx = match raw {
        0 => return Err(bad(line, "index 0 is not valid in OBJ")),
        r if r > 0 => r - 1,
        r => len as i64 + r,
    };

    if idx < 0 || idx >= len as i64 {
        return Err(bad(
            line,
            &format!("index {} out of range ({} defined)", raw, len),
        ));
    }
    Ok(idx as u32)
}

/// Splits a face corner into (position index, optional normal index).
fn parse_corner(
    corner: &str,
    n_positions: usize,
    n_normals: usize,
    line: usize,
) -> io::Result<(u32, Option<u32>)> {
    let mut fields = corner.split('/');
    let v = fields.next().unwrap_or_default();
    let _vt = fields.next();
    let vn = fields.next().filter(|s| !s.is_empty());

    let vi = resolve_index(v, n_positions, line)?;
    let ni = vn
        .map(|s| resolve_index(s, n_normals, line))
        .transpose()?;
    Ok((vi, ni))
}

/// Parse OBJ text from a byte slice.
pub fn parse_obj_bytes(bytes: &[u8]) -> io::Result<Mesh> {
    let text = String::from_utf8_lossy(bytes);

    let mut src_positions: Vec<[f32; 3]> = Vec::new();
    let mut src_normals: Vec<[f32; 3]> = Vec::new();
    let mut corner_to_vertex: HashMap<(u32, Option<u32>), u32> = HashMap::new();
    let mut mesh = Mesh::default();
    // Source position index of every output vertex.
    let mut vertex_source: Vec<u32> = Vec::new();
    let mut missing_normals = false;
    let mut face: Vec<u32> = Vec::with_capacity(8);

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("v") => src_positions.push(parse_vec3(&mut parts, line_no)?),
            Some("vn") => src_normals.push(parse_vec3(&mut parts, line_no)?),
            Some("f") => {
                face.clear();
                for corner in parts {
                    let key = parse_corner(corner, src_positions.len(), src_normals.len(), line_no)?;
                    missing_normals |= key.1.is_none();

                    let idx = *corner_to_vertex.entry(key).or_insert_with(|| {
                        mesh.positions.push(src_positions[key.0 as usize]);
                        vertex_source.push(key.0);
                        mesh.normals
                            .push(key.1.map_or([0.0; 3], |n| src_normals[n as usize]));
                        (mesh.positions.len() - 1) as u32
                    });
                    face.push(idx);
                }

                if face.len() < 3 {
                    return Err(bad(
                        line_no,
                        &format!("face needs at least 3 corners, found {}", face.len()),
                    ));
                }

                for k in 1..face.len() - 1 {
                    mesh.indices.extend_from_slice(&[face[0], face[k], face[k + 1]]);
                }
            }
            _ => {}
        }
    }

    if mesh.indices.is_empty() {
        return Err(io::Error::new(ErrorKind::InvalidData, "OBJ has no faces"));
    }

    if missing_normals {
        mesh = weld_by_position(mesh, &vertex_source);
        mesh.compute_smooth_normals();
    } else {
        for n in &mut mesh.normals {
            *n = crate::normalize_or(*n, [0.0, 1.0, 0.0]);
        }
    }

    Ok(mesh)
}

/// Merges vertices that share a source position, dropping their normals.
/// Smoothing then averages over every face that touches the position.
fn weld_by_position(mesh: Mesh, vertex_source: &[u32]) -> Mesh {
    let mut welded = Mesh::default();
    let mut source_to_vertex: HashMap<u32, u32> = HashMap::new();

    let remap: Vec<u32> = vertex_source
        .iter()
        .zip(&mesh.positions)
        .map(|(&src, &pos)| {
            *source_to_vertex.entry(src).or_insert_with(|| {
                welded.positions.push(pos);
                welded.normals.push([0.0; 3]);
                (welded.positions.len() - 1) as u32
            })
        })
        .collect();

    welded.indices = mesh.indices.iter().map(|&i| remap[i as usize]).collect();
    welded
}

/// Parse OBJ text from any reader.
pub fn parse_obj<R: Read>(mut reader: R) -> io::Result<Mesh> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_obj_bytes(&bytes)
}

/// Fast path: prefer mmap; fall back to a single read.
#[cfg(feature = "mmap")]
pub fn read_obj<P: AsRef<Path>>(path: P) -> io::Result<Mesh> {
    let file = std::fs::File::open(path)?;
    let map = unsafe { memmap2::MmapOptions::new().map(&file)? };
    parse_obj_bytes(&map)
}

#[cfg(not(feature = "mmap"))]
pub fn read_obj<P: AsRef<Path>>(path: P) -> io::Result<Mesh> {
    let bytes = std::fs::read(path)?;
    parse_obj_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_triangle_and_computes_normals() {
        let src = b"# a triangle\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse_obj_bytes(src).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.normals[0], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn quad_is_fanned_into_two_triangles() {
        let src = b"v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = parse_obj_bytes(src).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn negative_indices_are_relative() {
        let src = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = parse_obj_bytes(src).unwrap();
        assert_eq!(mesh.positions[2], [0.0, 1.0, 0.0]);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn explicit_normals_are_kept_and_normalized() {
        let src = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 2\nf 1//1 2//1 3//1\n";
        let mesh = parse_obj_bytes(src).unwrap();
        assert!(mesh.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn shared_corners_are_deduplicated() {
        let src = b"v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
                    vt 0 0\nvn 0 0 1\n\
                    f 1/1/1 2/1/1 3/1/1\nf 1/1/1 3/1/1 4/1/1\n";
        let mesh = parse_obj_bytes(src).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn ignores_unsupported_records() {
        let src = b"mtllib x.mtl\no thing\ng group\ns off\nusemtl red\n\
                    v 0 0 0 1\nv 1 0 0\nv 0 1 0\nvt 0.5 0.5\nf 1/1 2/1 3/1 # trailing\n";
        let mesh = parse_obj_bytes(src).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn rejects_out_of_range_and_zero_indices() {
        let err = parse_obj_bytes(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("line 4"));

        let err = parse_obj_bytes(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_malformed_vertices_and_short_faces() {
        assert!(parse_obj_bytes(b"v 0 zero 0\n").is_err());
        assert!(parse_obj_bytes(b"v 0 0\n").is_err());
        assert!(parse_obj_bytes(b"v 0 0 0\nv 1 0 0\nf 1 2\n").is_err());
    }

    #[test]
    fn rejects_file_without_faces() {
        let err = parse_obj_bytes(b"v 0 0 0\nv 1 0 0\nv 0 1 0\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(parse_obj_bytes(b"").is_err());
    }

    #[test]
    fn mixed_normals_smooth_across_shared_positions() {
        // Two faces at 90 degrees sharing the edge 1-3; only the first has normals.
        let src = b"v 0 0 0\nv 1 0 0\nv 0 0 -1\nv 0 -1 0\nvn 0 1 0\n\
                    f 1//1 2//1 3//1\nf 1 4 3\n";
        let mesh = parse_obj_bytes(src).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        let origin = mesh
            .positions
            .iter()
            .position(|p| *p == [0.0, 0.0, 0.0])
            .unwrap();
        let n = mesh.normals[origin];
        let s = std::f32::consts::FRAC_1_SQRT_2;
        assert!((n[0] - s).abs() < 1e-5, "{:?}", n);
        assert!((n[1] - s).abs() < 1e-5, "{:?}", n);
        assert!(n[2].abs() < 1e-5, "{:?}", n);
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        for src in [&b"v nan 0 0\n"[..], &b"v 0 inf 0\n"[..], &b"vn 0 0 -infinity\n"[..]] {
            let err = parse_obj_bytes(src).unwrap_err();
            assert!(err.to_string().contains("malformed number"), "{}", err);
        }
    }

    #[test]
    fn parses_from_reader() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse_obj(io::Cursor::new(src)).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn read_obj_reports_missing_file() {
        let err = read_obj("/definitely/not/here.obj").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
