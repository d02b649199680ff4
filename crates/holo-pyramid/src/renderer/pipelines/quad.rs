use crate::renderer::targets::HoloTargets;
use crate::rig::{PyramidRig, ScreenQuad, NUM_DIRECTIONS};
use wgpu::util::DeviceExt;

/// Unit quad corners, two triangles.
const QUAD_CORNERS: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

/// Textured screen quad placed by a centre/half-extent uniform.
const QUAD_WGSL: &str = r#"
struct Placement {
    center: vec2<f32>,
    scale:  vec2<f32>,
}

@group(0) @binding(0) var tView: texture_2d<f32>;
@group(0) @binding(1) var samp: sampler;
@group(0) @binding(2) var<uniform> place: Placement;

struct VSOut {
    @builtin(position) clip: vec4<f32>,
    @location(0)         uv: vec2<f32>,
}

@vertex
fn vs_main(@location(0) corner: vec2<f32>) -> VSOut {
    var out: VSOut;
    out.clip = vec4<f32>(place.center + corner * place.scale, 0.0, 1.0);
    out.uv = vec2<f32>(0.5 * (corner.x + 1.0), 0.5 * (-corner.y + 1.0));
    return out;
}

@fragment
fn fs_main(in: VSOut) -> @location(0) vec4<f32> {
    return textureSample(tView, samp, in.uv);
}
"#;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Default)]
struct UboPlacement {
    center: [f32; 2],
    scale: [f32; 2],
}

impl From<&ScreenQuad> for UboPlacement {
    fn from(q: &ScreenQuad) -> Self {
        Self {
            center: q.center.to_array(),
            scale: q.scale.to_array(),
        }
    }
}

pub struct QuadPipeline {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    quad_vb: wgpu::Buffer,
    /// One placement per cross position.
    quad_ubos: Vec<wgpu::Buffer>,
    /// Shared full-window placement for preview mode.
    preview_ubo: wgpu::Buffer,
    quad_binds: Vec<wgpu::BindGroup>,
    preview_binds: Vec<wgpu::BindGroup>,
}

impl QuadPipeline {
    pub fn new(device: &wgpu::Device, out_fmt: wgpu::TextureFormat, targets: &HoloTargets) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Screen Quad Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<UboPlacement>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Screen Quad Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Screen Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(QUAD_WGSL.into()),
        });

        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Screen Quad VB"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let make_ubo = |label: &str, placement: UboPlacement| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(&placement),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };

        let quad_ubos = (0..NUM_DIRECTIONS)
            .map(|i| make_ubo(&format!("Screen Quad {} UBO", i), UboPlacement::default()))
            .collect();
        let preview_ubo = make_ubo(
            "Preview Quad UBO",
            UboPlacement::from(&ScreenQuad::fullscreen(0)),
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Screen Quad PipelineLayout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Screen Quad Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        shader_location: 0,
                        offset: 0,
                        format: wgpu::VertexFormat::Float32x2,
                    }],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                // Views are cleared to transparent, so overlapping corners don't hide each other.
                targets: &[Some(wgpu::ColorTargetState {
                    format: out_fmt,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let mut this = Self {
            pipeline,
            layout,
            sampler,
            quad_vb,
            quad_ubos,
            preview_ubo,
            quad_binds: Vec::new(),
            preview_binds: Vec::new(),
        };
        this.rebind(device, targets);
        this
    }

    /// Rebuilds the bind groups after the render targets were recreated.
    pub fn rebind(&mut self, device: &wgpu::Device, targets: &HoloTargets) {
        let bind = |label: &str, view: &wgpu::TextureView, ubo: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: ubo.as_entire_binding(),
                    },
                ],
            })
        };

        let quad_binds = targets
            .views
            .iter()
            .zip(&self.quad_ubos)
            .enumerate()
            .map(|(i, (t, ubo))| bind(&format!("Screen Quad {} BindGroup", i), &t.color, ubo))
            .collect();
        let preview_binds = targets
            .views
            .iter()
            .enumerate()
            .map(|(i, t)| {
                bind(&format!("Preview Quad {} BindGroup", i), &t.color, &self.preview_ubo)
            })
            .collect();

        self.quad_binds = quad_binds;
        self.preview_binds = preview_binds;
    }

    /// Uploads the cross placements from the rig.
    pub fn update(&self, queue: &wgpu::Queue, rig: &PyramidRig) {
        for (quad, ubo) in rig.quads().iter().zip(&self.quad_ubos) {
            queue.write_buffer(ubo, 0, bytemuck::bytes_of(&UboPlacement::from(quad)));
        }
    }

    /// Draws all four views in the cross layout.
    pub fn draw_pyramid<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        for bind in &self.quad_binds {
            rpass.set_bind_group(0, bind, &[]);
            rpass.draw(0..6, 0..1);
        }
    }

    /// Draws one camera's view over the whole window.
    pub fn draw_preview<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, camera: usize) {
        let Some(bind) = self.preview_binds.get(camera % NUM_DIRECTIONS) else {
            return;
        };
        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_bind_group(0, bind, &[]);
        rpass.draw(0..6, 0..1);
    }
}
