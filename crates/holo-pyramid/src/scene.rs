//! Lights and material of the hologram scene.

use crate::data::types::{GpuLight, LightingUniformStd140, MAX_LIGHTS};

/// Constant, linear and quadratic falloff of every point light.
pub const ATTENUATION: [f32; 3] = [1.0, 0.09, 0.032];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub power: f32,
}

impl PointLight {
    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            color,
            power: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    /// Lambert diffuse when set, flat colour otherwise.
    pub lighting: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            lighting: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneLights {
    pub lights: Vec<PointLight>,
    pub ambient: [f32; 3],
    pub material: Material,
    /// Light positions and falloff distances are multiplied by this.
    pub scale: f32,
}

impl Default for SceneLights {
    /// Purple from above, green from the left, orange from the front.
    fn default() -> Self {
        Self {
            lights: vec![
                PointLight::new([0.0, 1.5, 0.0], [0.5, 0.0, 1.0]),
                PointLight::new([-1.5, 0.0, 0.0], [0.0, 1.0, 0.0]),
                PointLight::new([0.0, 0.0, 1.5], [1.0, 0.5, 0.0]),
            ],
            ambient: [0.06, 0.06, 0.06],
            material: Material::default(),
            scale: 1.0,
        }
    }
}

impl SceneLights {
    /// Keeps the lights outside a model of the given bounding radius.
    pub fn fit_to_model(&mut self, model_radius: f32) {
        self.scale = model_radius.max(1.0);
    }

    /// Packs the scene into the shader layout; lights past [`MAX_LIGHTS`] are dropped.
    pub fn to_uniform(&self) -> LightingUniformStd140 {
        if self.lights.len() > MAX_LIGHTS {
            log::warn!(
                "{} lights configured, only the first {} are used.",
                self.lights.len(),
                MAX_LIGHTS
            );
        }

        let mut lights = [GpuLight::default(); MAX_LIGHTS];
        for (slot, light) in lights.iter_mut().zip(&self.lights) {
            let p = light.position.map(|c| c * self.scale);
            slot.position = [p[0], p[1], p[2], light.power];
            slot.color = [light.color[0], light.color[1], light.color[2], 1.0];
        }

        let m = &self.material;
        LightingUniformStd140 {
            lights,
            ambient: [self.ambient[0], self.ambient[1], self.ambient[2], 0.0],
            attenuation: [ATTENUATION[0], ATTENUATION[1], ATTENUATION[2], 1.0 / self.scale],
            material: [m.color[0], m.color[1], m.color[2], if m.lighting { 1.0 } else { 0.0 }],
            count: self.lights.len().min(MAX_LIGHTS) as u32,
            _pad: [0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_has_three_coloured_lights() {
        let u = SceneLights::default().to_uniform();
        assert_eq!(u.count, 3);
        assert_eq!(u.lights[0].position, [0.0, 1.5, 0.0, 1.0]);
        assert_eq!(u.lights[0].color, [0.5, 0.0, 1.0, 1.0]);
        assert_eq!(u.lights[1].position, [-1.5, 0.0, 0.0, 1.0]);
        assert_eq!(u.lights[2].color, [1.0, 0.5, 0.0, 1.0]);
        assert_eq!(u.lights[3], GpuLight::default());
        assert_eq!(u.material, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn fitting_scales_positions_and_falloff() {
        let mut scene = SceneLights::default();
        scene.fit_to_model(4.0);
        let u = scene.to_uniform();
        assert_eq!(u.lights[2].position, [0.0, 0.0, 6.0, 1.0]);
        assert_eq!(u.attenuation, [1.0, 0.09, 0.032, 0.25]);

        // Small models keep the unit layout.
        scene.fit_to_model(0.2);
        assert_eq!(scene.to_uniform().lights[2].position, [0.0, 0.0, 1.5, 1.0]);
    }

    #[test]
    fn extra_lights_are_truncated() {
        let mut scene = SceneLights::default();
        for _ in 0..3 {
            scene.lights.push(PointLight::new([1.0, 1.0, 1.0], [1.0, 1.0, 1.0]));
        }
        assert_eq!(scene.to_uniform().count, MAX_LIGHTS as u32);
    }

    #[test]
    fn unlit_material_clears_the_flag() {
        let mut scene = SceneLights::default();
        scene.material.lighting = false;
        assert_eq!(scene.to_uniform().material[3], 0.0);
    }
}
