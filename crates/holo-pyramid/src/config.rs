use crate::catalog::ModelId;
use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

/// `holo_pyramid` - a four-view hologram renderer for pyramid prism displays.
///
/// The selected model is rendered from four cameras around it and the four
/// views are laid out in a cross. Put a clear pyramid, tip down, at the centre
/// of the screen to see the model float inside it.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Directory holding the bundled `.obj` models.
    ///
    /// Any additional `.obj` file found below it is listed after the bundled
    /// models on the selection screen.
    #[arg(long, env = "HOLO_ASSETS_DIR", default_value = "assets/models")]
    pub assets_dir: PathBuf,

    /// Open this bundled model directly instead of showing the model list.
    #[arg(long, env = "HOLO_MODEL", value_enum)]
    pub model: Option<ModelId>,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Distance of the four cameras from the model centre.
    ///
    /// When unset, the distance is derived from the model's bounds.
    #[arg(long)]
    pub camera_radius: Option<f32>,

    /// Distance from screen centre to each view, in normalized device units.
    #[arg(long, default_value_t = 0.25)]
    pub quad_radius: f32,

    /// Size of each view relative to the window (also sizes its render target).
    #[arg(long, default_value_t = 0.25)]
    pub view_scale: f32,

    /// Model spin around the vertical axis, in degrees per second.
    #[arg(long, default_value_t = 60.0, allow_negative_numbers = true)]
    pub spin_deg_per_sec: f32,

    /// Target frames per second.
    #[arg(long, default_value_t = 60)]
    pub frame_rate: u32,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("window size must be non-zero, got {}x{}", self.width, self.height);
        }
        if let Some(r) = self.camera_radius {
            if !(r.is_finite() && r > 0.0) {
                bail!("--camera-radius must be positive, got {}", r);
            }
        }
        if !(self.quad_radius.is_finite() && self.quad_radius > 0.0) {
            bail!("--quad-radius must be positive, got {}", self.quad_radius);
        }
        if !(self.view_scale.is_finite() && self.view_scale > 0.0 && self.view_scale <= 0.5) {
            bail!("--view-scale must be in (0, 0.5], got {}", self.view_scale);
        }
        if !self.spin_deg_per_sec.is_finite() {
            bail!("--spin-deg-per-sec must be finite");
        }
        if self.frame_rate == 0 {
            bail!("--frame-rate must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_layout() {
        let cfg = Config::try_parse_from(["holo_pyramid"]).unwrap();
        assert_eq!(cfg.quad_radius, 0.25);
        assert_eq!(cfg.view_scale, 0.25);
        assert_eq!(cfg.frame_rate, 60);
        assert_eq!(cfg.spin_deg_per_sec, 60.0);
        assert!(cfg.camera_radius.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parses_model_and_overrides() {
        let cfg = Config::try_parse_from([
            "holo_pyramid",
            "--model",
            "icosahedron",
            "--camera-radius",
            "6.5",
            "--spin-deg-per-sec",
            "-30",
        ])
        .unwrap();
        assert_eq!(cfg.model, Some(ModelId::Icosahedron));
        assert_eq!(cfg.camera_radius, Some(6.5));
        assert_eq!(cfg.spin_deg_per_sec, -30.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_model() {
        assert!(Config::try_parse_from(["holo_pyramid", "--model", "bunny"]).is_err());
    }

    #[test]
    fn validate_rejects_overlapping_views_and_zero_rate() {
        let mut cfg = Config::try_parse_from(["holo_pyramid"]).unwrap();
        cfg.view_scale = 0.6;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::try_parse_from(["holo_pyramid"]).unwrap();
        cfg.frame_rate = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::try_parse_from(["holo_pyramid"]).unwrap();
        cfg.camera_radius = Some(-1.0);
        assert!(cfg.validate().is_err());
    }
}
