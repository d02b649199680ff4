use crate::data::types::{LightingUniformStd140, ModelGpu, ViewUniformStd140};
use crate::rig::{PyramidRig, NUM_DIRECTIONS};
use glam::Mat4;
use holomesh::MeshVertex;
use wgpu::util::DeviceExt;

/// Lambert-lit mesh with up to four point lights.
const MODEL_WGSL: &str = r#"
struct View {
    view_proj: mat4x4<f32>,
    model:     mat4x4<f32>,
}

struct Light {
    position: vec4<f32>, // w = power
    color:    vec4<f32>,
}

struct Lighting {
    lights:      array<Light, 4>,
    ambient:     vec4<f32>,
    attenuation: vec4<f32>, // constant, linear, quadratic, 1/scale
    material:    vec4<f32>, // rgb colour, w = lighting on
    count:       u32,
}

@group(0) @binding(0) var<uniform> u_view: View;
@group(0) @binding(1) var<uniform> u_lighting: Lighting;

struct VSOut {
    @builtin(position) clip:   vec4<f32>,
    @location(0)       world:  vec3<f32>,
    @location(1)       normal: vec3<f32>,
}

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) normal: vec3<f32>) -> VSOut {
    let world = u_view.model * vec4<f32>(position, 1.0);
    var out: VSOut;
    out.clip = u_view.view_proj * world;
    out.world = world.xyz;
    out.normal = (u_view.model * vec4<f32>(normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_main(in: VSOut) -> @location(0) vec4<f32> {
    let base = u_lighting.material.rgb;
    if (u_lighting.material.w < 0.5) {
        return vec4<f32>(base, 1.0);
    }

    let n = normalize(in.normal);
    let att = u_lighting.attenuation;
    var light_sum = u_lighting.ambient.rgb;

    let count = min(u_lighting.count, 4u);
    for (var i = 0u; i < count; i = i + 1u) {
        let light = u_lighting.lights[i];
        let to_light = light.position.xyz - in.world;
        let dist = max(length(to_light), 1e-5);
        let d = dist * att.w;
        let falloff = 1.0 / (att.x + att.y * d + att.z * d * d);
        let lambert = max(dot(n, to_light / dist), 0.0);
        light_sum += light.color.rgb * light.position.w * lambert * falloff;
    }

    return vec4<f32>(base * light_sum, 1.0);
}
"#;

struct CameraSlot {
    ubo: wgpu::Buffer,
    bind: wgpu::BindGroup,
}

pub struct ModelPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub layout: wgpu::BindGroupLayout,
    lighting_ubo: wgpu::Buffer,
    cameras: Vec<CameraSlot>,
}

impl ModelPipeline {
    pub fn new(
        device: &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        depth_fmt: wgpu::TextureFormat,
    ) -> Self {
        // Per-camera view UBO + shared lighting UBO
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model UBO Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ViewUniformStd140>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<LightingUniformStd140>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Model Shader"),
            source: wgpu::ShaderSource::Wgsl(MODEL_WGSL.into()),
        });

        let lighting_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Lighting UBO"),
            size: std::mem::size_of::<LightingUniformStd140>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let cameras = (0..NUM_DIRECTIONS)
            .map(|i| {
                let ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Holo Camera {} UBO", i)),
                    contents: bytemuck::bytes_of(&ViewUniformStd140::new(
                        Mat4::IDENTITY,
                        Mat4::IDENTITY,
                    )),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("Holo Camera {} BindGroup", i)),
                    layout: &layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: ubo.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: lighting_ubo.as_entire_binding(),
                        },
                    ],
                });
                CameraSlot { ubo, bind }
            })
            .collect();

        let vbuf_layouts = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position (vec3)
                wgpu::VertexAttribute {
                    shader_location: 0,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal (vec3)
                wgpu::VertexAttribute {
                    shader_location: 1,
                    offset: 12,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }];

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Model PipelineLayout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Model Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &vbuf_layouts,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            // The mirrored projection reverses winding, so front faces arrive clockwise.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_fmt,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_fmt,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            pipeline,
            layout,
            lighting_ubo,
            cameras,
        }
    }

    pub fn write_lighting(&self, queue: &wgpu::Queue, lighting: &LightingUniformStd140) {
        queue.write_buffer(&self.lighting_ubo, 0, bytemuck::bytes_of(lighting));
    }

    /// Uploads the four camera matrices for this frame.
    pub fn write_views(&self, queue: &wgpu::Queue, rig: &PyramidRig, model: Mat4) {
        for (i, slot) in self.cameras.iter().enumerate() {
            let ubo = ViewUniformStd140::new(rig.view_proj(i), model);
            queue.write_buffer(&slot.ubo, 0, bytemuck::bytes_of(&ubo));
        }
    }

    pub fn draw<'a>(
        &'a self,
        rpass: &mut wgpu::RenderPass<'a>,
        camera: usize,
        model: &'a ModelGpu,
    ) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.cameras[camera % NUM_DIRECTIONS].bind, &[]);
        rpass.set_vertex_buffer(0, model.vtx.slice(..));
        rpass.set_index_buffer(model.idx.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..model.index_count, 0, 0..1);
    }
}
