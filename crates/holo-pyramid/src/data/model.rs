use crate::catalog::{CatalogEntry, ModelId};
use crate::data::types::ModelGpu;
use anyhow::{Context, Result};
use holomesh::{icosahedron, read_obj, torus, Mesh};
use std::path::Path;
use wgpu::util::DeviceExt;

/// Shape shown when a model asset cannot be read.
pub fn fallback_mesh() -> Mesh {
    torus(1.0, 0.5, 40, 20)
}

/// Read an OBJ model from disk.
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    read_obj(path).with_context(|| format!("Failed to parse OBJ model '{}'", path.display()))
}

/// Read an OBJ model, substituting the fallback torus on any error.
/// Returns the mesh recentred on the origin and whether it is the fallback.
pub fn mesh_or_fallback(path: &Path) -> (Mesh, bool) {
    match load_mesh(path) {
        Ok(mesh) => (mesh.recentered(), false),
        Err(err) => {
            log::error!("{:#}; showing a torus instead.", err);
            (fallback_mesh().recentered(), true)
        }
    }
}

/// Geometry that can stand in for a bundled model whose asset is absent.
pub fn builtin_mesh(id: ModelId) -> Option<Mesh> {
    match id {
        ModelId::Icosahedron => Some(icosahedron(1.0)),
        ModelId::UtahTeapot | ModelId::Spider => None,
    }
}

/// Mesh for a catalog entry. A bundled model with built-in geometry is
/// generated when its file is missing; everything else goes through
/// [`mesh_or_fallback`].
pub fn entry_mesh(entry: &CatalogEntry) -> (Mesh, bool) {
    if !entry.path.is_file() {
        if let Some(mesh) = entry.bundled.and_then(builtin_mesh) {
            log::warn!(
                "'{}' not found; generating the {} instead.",
                entry.path.display(),
                entry.name
            );
            return (mesh.recentered(), false);
        }
    }
    mesh_or_fallback(&entry.path)
}

/// Upload a mesh's vertex and index buffers.
pub fn upload_model(device: &wgpu::Device, name: &str, mesh: &Mesh, is_fallback: bool) -> ModelGpu {
    let vertices = mesh.vertices();
    let radius = mesh.bounds().map_or(1.0, |b| b.radius());

    let vtx = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Model Vertices"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let idx = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Model Indices"),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    log::info!(
        "Model '{}': verts={}, tris={}, radius={:.3}{}",
        name,
        mesh.vertex_count(),
        mesh.triangle_count(),
        radius,
        if is_fallback { " (fallback)" } else { "" }
    );

    ModelGpu {
        name: name.to_owned(),
        is_fallback,
        radius,
        vertex_count: vertices.len() as u32,
        index_count: mesh.indices.len() as u32,
        vtx,
        idx,
    }
}
