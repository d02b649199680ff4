use crate::{
    catalog::{CatalogEntry, ModelCatalog},
    config::Config,
    data::{
        model::{entry_mesh, upload_model},
        types::ModelGpu,
    },
    input::{RigAction, RigController},
    renderer::Renderer,
    rig::{wrap_degrees, PyramidRig, ViewMode, MIN_CAMERA_RADIUS},
    scene::SceneLights,
    ui,
};
use anyhow::Result;
use glam::Mat4;
use std::{sync::Arc, time::Instant};
use winit::{event::WindowEvent, window::Window};

/// A model on display, with its per-visit state.
pub struct Hologram {
    pub model: ModelGpu,
    /// Rotation about +Y in degrees, kept in [0, 360).
    pub rotation_deg: f32,
    pub mode: ViewMode,
}

impl Hologram {
    pub fn rotate(&mut self, delta_deg: f32) {
        self.rotation_deg = wrap_degrees(self.rotation_deg + delta_deg);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_deg.to_radians())
    }
}

/// Frame timing for the spin and the FPS readout.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Instant,
    fps: f32,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self { last: now, fps: 0.0 }
    }

    /// Seconds since the previous tick or restart.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        if dt > 0.0 {
            // Exponential moving average keeps the readout steady.
            self.fps = if self.fps == 0.0 { 1.0 / dt } else { self.fps * 0.9 + 0.1 / dt };
        }
        dt
    }

    /// Forgets the time since the last tick, so a slow model load does not
    /// turn into a jump of the spin.
    pub fn restart(&mut self, now: Instant) {
        self.last = now;
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

pub enum Screen {
    ModelSelect,
    Hologram(Hologram),
}

pub struct App {
    pub config: Config,
    pub renderer: Renderer,
    pub rig: PyramidRig,
    pub controller: RigController,
    pub catalog: ModelCatalog,
    pub lights: SceneLights,
    pub screen: Screen,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    clock: FrameClock,
}

impl App {
    pub async fn new(window: Arc<Window>, config: Config) -> Result<Self> {
        let mut rig = PyramidRig::new(
            config.camera_radius.unwrap_or(MIN_CAMERA_RADIUS),
            config.quad_radius,
            config.view_scale,
            (1, 1),
        );
        let renderer = Renderer::new(window.clone(), &mut rig).await?;
        let catalog = ModelCatalog::discover(&config.assets_dir);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        let mut app = Self {
            config,
            renderer,
            rig,
            controller: RigController::new(),
            catalog,
            lights: SceneLights::default(),
            screen: Screen::ModelSelect,
            egui_ctx,
            egui_state,
            clock: FrameClock::new(Instant::now()),
        };

        // A model given on the command line skips the list.
        if let Some(id) = app.config.model {
            match app.catalog.find(id).cloned() {
                Some(entry) => app.open_model(&entry),
                None => log::warn!("Model {} is not in the catalog.", id),
            }
        }

        Ok(app)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size, &mut self.rig);
        }
    }

    /// Loads `entry` (or a stand-in shape) and switches to the hologram.
    pub fn open_model(&mut self, entry: &CatalogEntry) {
        log::info!("Opening '{}' from {}", entry.name, entry.path.display());

        let (mesh, is_fallback) = entry_mesh(entry);
        let model = upload_model(&self.renderer.gfx.device, &entry.name, &mesh, is_fallback);

        self.rig.frame_model(model.radius, self.config.camera_radius);
        self.rig.reset_selection();
        self.lights.fit_to_model(model.radius);
        self.renderer.set_lighting(&self.lights.to_uniform());

        log::info!(
            "Camera radius {:.2}, clip planes {:?}",
            self.rig.camera_radius(),
            self.rig.clip_planes()
        );

        self.screen = Screen::Hologram(Hologram {
            model,
            rotation_deg: 0.0,
            mode: ViewMode::Pyramid,
        });
        self.clock.restart(Instant::now());
    }

    /// Returns true when the event was consumed and should not reach the
    /// default window handling.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        if response.consumed {
            return true;
        }

        if let WindowEvent::Resized(physical_size) = event {
            self.resize(*physical_size);
            return false;
        }

        let Screen::Hologram(holo) = &mut self.screen else {
            return false;
        };

        match self.controller.handle_event(event) {
            Some(RigAction::NextCamera) => {
                let cam = self.rig.select_next_camera();
                log::debug!("Selected camera {}", cam);
            }
            Some(RigAction::Rotate(deg)) => holo.rotate(deg),
            Some(RigAction::ToggleView) => holo.mode = holo.mode.toggled(),
            Some(RigAction::Back) => self.screen = Screen::ModelSelect,
            None => return false,
        }
        true
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let dt = self.clock.tick(Instant::now());

        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        match &mut self.screen {
            Screen::Hologram(holo) => {
                holo.rotate(self.config.spin_deg_per_sec * dt);
                self.renderer.render_hologram(
                    &swap_view,
                    &holo.model,
                    &self.rig,
                    holo.model_matrix(),
                    holo.mode,
                );
            }
            Screen::ModelSelect => self.renderer.render_clear(&swap_view),
        }

        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        let mut picked = None;
        match &self.screen {
            Screen::Hologram(holo) => ui::draw_hud(
                &self.egui_ctx,
                &self.rig,
                &ui::HudInfo {
                    model_name: &holo.model.name,
                    is_fallback: holo.model.is_fallback,
                    vertices: holo.model.vertex_count,
                    triangles: holo.model.index_count / 3,
                    camera: self.rig.selected(),
                    mode: holo.mode,
                    rotation_deg: holo.rotation_deg,
                    fps: self.clock.fps(),
                },
            ),
            Screen::ModelSelect => picked = ui::draw_model_list(&self.egui_ctx, &self.catalog),
        }

        let egui_output = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, egui_output.platform_output.clone());
        self.renderer
            .paint_egui(&swap_view, &self.egui_ctx, egui_output);

        frame.present();

        if let Some(entry) = picked.and_then(|i| self.catalog.get(i).cloned()) {
            self.open_model(&entry);
        }

        Ok(())
    }
}
