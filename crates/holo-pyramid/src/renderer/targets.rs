//! Off-screen render targets, one per hologram camera.

use crate::rig::NUM_DIRECTIONS;

/// Colour format of every hologram view.
pub const VIEW_COLOR_FMT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub const VIEW_DEPTH_FMT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub struct HoloTarget {
    // Private textures – keep alive for the lifetime of the views.
    _color_tex: wgpu::Texture,
    _depth_tex: wgpu::Texture,

    // Public texture views used by the camera passes and the composite pass.
    pub color: wgpu::TextureView,
    pub depth: wgpu::TextureView,
}

pub struct HoloTargets {
    pub views: Vec<HoloTarget>,
    pub size: (u32, u32),

    // Formats required by pipeline creation.
    pub color_fmt: wgpu::TextureFormat,
    pub depth_fmt: wgpu::TextureFormat,
}

impl HoloTargets {
    pub fn new(device: &wgpu::Device, size: (u32, u32)) -> Self {
        // Ensure non‑zero dimensions.
        let width = size.0.max(1);
        let height = size.1.max(1);

        let tex_size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        // Helper to create a texture with the given parameters.
        let create_tex = |label: &str, format, usage| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: tex_size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage,
                view_formats: &[],
            })
        };

        let views = (0..NUM_DIRECTIONS)
            .map(|i| {
                let color_tex = create_tex(
                    &format!("Holo View {} Color", i),
                    VIEW_COLOR_FMT,
                    wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
                );
                let depth_tex = create_tex(
                    &format!("Holo View {} Depth", i),
                    VIEW_DEPTH_FMT,
                    wgpu::TextureUsages::RENDER_ATTACHMENT,
                );

                HoloTarget {
                    color: color_tex.create_view(&wgpu::TextureViewDescriptor::default()),
                    depth: depth_tex.create_view(&wgpu::TextureViewDescriptor::default()),
                    _color_tex: color_tex,
                    _depth_tex: depth_tex,
                }
            })
            .collect();

        log::debug!("Hologram targets: {} x {}x{}", NUM_DIRECTIONS, width, height);

        Self {
            views,
            size: (width, height),
            color_fmt: VIEW_COLOR_FMT,
            depth_fmt: VIEW_DEPTH_FMT,
        }
    }

    /// Rebuilds the targets when their size changes. Returns true if rebuilt.
    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) -> bool {
        if self.size == (size.0.max(1), size.1.max(1)) {
            return false;
        }
        *self = Self::new(device, size);
        true
    }
}
