// src/ui.rs
use crate::catalog::ModelCatalog;
use crate::rig::{PyramidRig, ViewMode};
use egui::{Color32, RichText};

const HUD_CYAN: Color32 = Color32::from_rgb(45, 247, 255);

/// What the HUD shows over a running hologram.
pub struct HudInfo<'a> {
    pub model_name: &'a str,
    pub is_fallback: bool,
    pub vertices: u32,
    pub triangles: u32,
    pub camera: usize,
    pub mode: ViewMode,
    pub rotation_deg: f32,
    pub fps: f32,
}

/// Model selection screen. Returns the catalog index the user clicked.
pub fn draw_model_list(ctx: &egui::Context, catalog: &ModelCatalog) -> Option<usize> {
    let mut picked = None;

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(Color32::BLACK).inner_margin(24.0))
        .show(ctx, |ui| {
            ui.heading(RichText::new("Select a Model").color(HUD_CYAN).strong());
            ui.add_space(12.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                for (i, entry) in catalog.entries().iter().enumerate() {
                    let text = RichText::new(&entry.name).size(18.0).monospace();
                    let button = egui::Button::new(text)
                        .min_size(egui::vec2(ui.available_width(), 36.0));
                    let mut response = ui.add(button);
                    if entry.bundled.is_none() {
                        response = response.on_hover_text(entry.path.display().to_string());
                    }
                    if response.clicked() {
                        picked = Some(i);
                    }
                }
            });

            ui.add_space(12.0);
            ui.label(
                RichText::new("Place the pyramid tip-down at the centre of the screen.")
                    .color(Color32::GRAY),
            );
        });

    picked
}

/// Status overlay and the outline of the selected view.
pub fn draw_hud(ctx: &egui::Context, rig: &PyramidRig, info: &HudInfo<'_>) {
    // Outline of the selected camera's quad
    if info.mode == ViewMode::Pyramid {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("holo_selected_view"),
        ));
        let screen = ctx.screen_rect();
        let quad = rig.quads()[info.camera];

        // NDC (+y up) -> egui points (+y down)
        let to_screen = |x: f32, y: f32| {
            egui::pos2(
                screen.min.x + (x + 1.0) * 0.5 * screen.width(),
                screen.min.y + (1.0 - y) * 0.5 * screen.height(),
            )
        };
        let rect = egui::Rect::from_two_pos(
            to_screen(quad.center.x - quad.scale.x, quad.center.y - quad.scale.y),
            to_screen(quad.center.x + quad.scale.x, quad.center.y + quad.scale.y),
        );
        painter.rect_stroke(rect, 0.0, (1.5, HUD_CYAN.gamma_multiply(0.6)));
    }

    egui::Area::new("hud_text".into())
        .interactable(false)
        .movable(false)
        .order(egui::Order::Foreground)
        .fixed_pos(egui::pos2(16.0, 16.0))
        .show(ctx, |ui| {
            let line = |ui: &mut egui::Ui, s: String| {
                ui.label(RichText::new(s).monospace().color(HUD_CYAN));
            };
            let model = if info.is_fallback {
                format!("MODEL:    {} (fallback torus)", info.model_name)
            } else {
                format!("MODEL:    {}", info.model_name)
            };
            line(ui, model);
            line(ui, format!("MESH:     {} verts, {} tris", info.vertices, info.triangles));
            line(ui, format!("CAMERA:   {}/4", info.camera + 1));
            line(
                ui,
                format!(
                    "VIEW:     {}",
                    match info.mode {
                        ViewMode::Pyramid => "PYRAMID",
                        ViewMode::Preview => "PREVIEW",
                    }
                ),
            );
            line(ui, format!("ROTATION: {:>6.1}°", info.rotation_deg));
            line(ui, format!("FPS:      {:>6.1}", info.fps));
        });

    egui::Area::new("hud_keys".into())
        .interactable(false)
        .movable(false)
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
        .show(ctx, |ui| {
            ui.label(
                RichText::new("SPACE camera · ←/→ rotate · P preview · ESC back")
                    .monospace()
                    .small()
                    .color(Color32::DARK_GRAY),
            );
        });
}
