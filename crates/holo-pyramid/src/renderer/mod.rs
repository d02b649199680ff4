//! The main rendering orchestrator. Owns the GPU context, the four hologram
//! render targets and the pipelines that fill and composite them.

pub mod context;
pub mod pipelines;
pub mod targets;

use self::{
    context::GfxContext,
    pipelines::{model::ModelPipeline, quad::QuadPipeline},
    targets::HoloTargets,
};
use crate::{
    data::types::{LightingUniformStd140, ModelGpu},
    rig::{PyramidRig, ViewMode, NUM_DIRECTIONS},
};
use glam::Mat4;
use std::sync::Arc;
use winit::window::Window;

const BLACK: wgpu::Color = wgpu::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
const CLEAR: wgpu::Color = wgpu::Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

/// Owns all rendering-related state.
pub struct Renderer {
    pub gfx: GfxContext,
    pub targets: HoloTargets,
    pub model: ModelPipeline,
    pub quads: QuadPipeline,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, rig: &mut PyramidRig) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;
        rig.set_viewport(gfx.size.width, gfx.size.height);

        let targets = HoloTargets::new(&gfx.device, rig.target_size());
        let model = ModelPipeline::new(&gfx.device, targets.color_fmt, targets.depth_fmt);
        let quads = QuadPipeline::new(&gfx.device, gfx.config.format, &targets);
        quads.update(&gfx.queue, rig);

        let egui_renderer =
            egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Ok(Self {
            gfx,
            targets,
            model,
            quads,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>, rig: &mut PyramidRig) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            rig.set_viewport(new_size.width, new_size.height);
            if self.targets.resize(&self.gfx.device, rig.target_size()) {
                self.quads.rebind(&self.gfx.device, &self.targets);
            }
            self.quads.update(&self.gfx.queue, rig);
        }
    }

    pub fn set_lighting(&self, lighting: &LightingUniformStd140) {
        self.model.write_lighting(&self.gfx.queue, lighting);
    }

    /// One hologram frame: the model from each camera into its target, then
    /// the targets composited onto the swapchain.
    pub fn render_hologram(
        &mut self,
        swap_view: &wgpu::TextureView,
        model: &ModelGpu,
        rig: &PyramidRig,
        model_matrix: Mat4,
        mode: ViewMode,
    ) {
        self.model.write_views(&self.gfx.queue, rig, model_matrix);

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Hologram Encoder"),
            });

        // Pass 1..4: one per camera
        for camera in 0..NUM_DIRECTIONS {
            let target = &self.targets.views[camera];
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Holo Camera Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &target.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.model.draw(&mut pass, camera, model);
        }

        // Pass 5: composite onto the screen
        {
            let mut pass = begin_screen_pass(&mut encoder, swap_view, "Hologram Composite Pass");
            match mode {
                ViewMode::Pyramid => self.quads.draw_pyramid(&mut pass),
                ViewMode::Preview => self.quads.draw_preview(&mut pass, rig.selected()),
            }
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Clears the screen to black; the selection screen is drawn on top by egui.
    pub fn render_clear(&mut self, swap_view: &wgpu::TextureView) {
        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Clear Encoder"),
            });
        drop(begin_screen_pass(&mut encoder, swap_view, "Clear Pass"));
        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Paints tessellated egui output over whatever is already in `swap_view`.
    pub fn paint_egui(
        &mut self,
        swap_view: &wgpu::TextureView,
        egui_ctx: &egui::Context,
        egui_output: egui::FullOutput,
    ) {
        let shapes = egui_ctx.tessellate(egui_output.shapes, egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gfx.config.width, self.gfx.config.height],
            pixels_per_point: egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.gfx.device, &self.gfx.queue, *id, delta);
        }

        self.egui_renderer.update_buffers(
            &self.gfx.device,
            &self.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("EGUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}

fn begin_screen_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    view: &'e wgpu::TextureView,
    label: &'static str,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}
