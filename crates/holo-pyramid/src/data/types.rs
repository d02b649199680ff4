//! Core data types for the pyramid viewer, focused on GPU data representation.

use glam::Mat4;

/// Lights the lighting uniform has room for.
pub const MAX_LIGHTS: usize = 4;

/// Per-camera uniform, respecting std140 layout.
/// Must match `View` in the model shader.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewUniformStd140 {
    /// Mirrored, rolled view-projection of one hologram camera.
    pub view_proj: [[f32; 4]; 4],
    /// Model rotation (the mesh is already centred on the origin).
    pub model: [[f32; 4]; 4],
}

impl ViewUniformStd140 {
    pub fn new(view_proj: Mat4, model: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        }
    }
}

/// One point light. Must match `Light` in the model shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLight {
    /// xyz = world position, w = power.
    pub position: [f32; 4],
    /// rgb = colour, a unused.
    pub color: [f32; 4],
}

/// Lights and material shared by all four cameras.
/// Must match `Lighting` in the model shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniformStd140 {
    pub lights: [GpuLight; MAX_LIGHTS],
    /// rgb = ambient term.
    pub ambient: [f32; 4],
    /// x = constant, y = linear, z = quadratic, w = 1 / distance scale.
    pub attenuation: [f32; 4],
    /// rgb = diffuse colour, w = 1.0 when lighting is enabled.
    pub material: [f32; 4],
    pub count: u32,
    pub _pad: [u32; 3],
}

/// Holds the GPU resources and metadata for the loaded model.
#[derive(Debug)]
pub struct ModelGpu {
    /// Name shown in the HUD.
    pub name: String,
    /// True when the asset failed to load and the torus is shown instead.
    pub is_fallback: bool,
    /// Bounding-sphere radius after recentering.
    pub radius: f32,
    pub vertex_count: u32,
    pub index_count: u32,

    /// Vertex buffer containing `holomesh::MeshVertex` data.
    pub vtx: wgpu::Buffer,
    /// Triangle list, `u32` indices.
    pub idx: wgpu::Buffer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_match_the_shader_layout() {
        assert_eq!(std::mem::size_of::<ViewUniformStd140>(), 128);
        assert_eq!(std::mem::size_of::<GpuLight>(), 32);
        // 4 lights (128) + ambient + attenuation + material (48) + count/pad (16)
        assert_eq!(std::mem::size_of::<LightingUniformStd140>(), 192);
    }
}
