//! Placement of the four hologram cameras and the four screen views.
//!
//! Top-down view of the model and cameras (+Y up out of the page):
//!
//! ```text
//!            back
//!           cam 2               +---- +x
//!             |                 |
//!             v                 +z
//!   cam 3 -> obj <- cam 1
//!             ^
//!             |
//!           cam 0
//!           front
//! ```
//!
//! Screen layout of the views (camera `i` feeds view `i`):
//!
//! ```text
//!              view 2
//!   view 3                view 1
//!              view 0
//! ```
//!
//! A pyramid face reflects its view upside down, so every camera image is
//! mirrored vertically and rolled so the model's top points away from the
//! screen centre.

use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

pub const NUM_DIRECTIONS: usize = 4;

/// Closest the cameras get to the model centre.
pub const MIN_CAMERA_RADIUS: f32 = 4.0;

/// Vertical field of view of every hologram camera.
pub const FOV_Y_DEG: f32 = 45.0;

/// Extra room around the bounding sphere when framing a model.
const FRAMING_MARGIN: f32 = 1.15;

/// Flips clip-space Y; applied after projection.
#[rustfmt::skip]
pub const MIRROR_Y: Mat4 = Mat4::from_cols_array(&[
    1.0,  0.0, 0.0, 0.0,
    0.0, -1.0, 0.0, 0.0,
    0.0,  0.0, 1.0, 0.0,
    0.0,  0.0, 0.0, 1.0,
]);

/// Folds an angle into [0, 360).
#[inline]
pub fn wrap_degrees(deg: f32) -> f32 {
    deg.rem_euclid(360.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Four views in a cross, for use with the prism.
    #[default]
    Pyramid,
    /// The selected camera's view stretched over the whole window.
    Preview,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Pyramid => ViewMode::Preview,
            ViewMode::Preview => ViewMode::Pyramid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoloCamera {
    pub index: usize,
    pub position: Vec3,
    /// Roll about the viewing axis, `90° * index`.
    pub roll_deg: f32,
}

impl HoloCamera {
    pub fn new(index: usize, radius: f32) -> Self {
        let theta = index as f32 * FRAC_PI_2;
        Self {
            index,
            position: Vec3::new(radius * theta.sin(), 0.0, radius * theta.cos()),
            roll_deg: 90.0 * index as f32,
        }
    }

    /// World -> view, looking at the origin with +Y up, then rolled.
    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_z(-self.roll_deg.to_radians())
            * Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    /// Mirrored view-projection in wgpu clip space (depth in [0, 1]).
    pub fn view_proj(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect, near, far);
        MIRROR_Y * proj * self.view()
    }
}

/// A screen-aligned view in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenQuad {
    pub index: usize,
    pub center: Vec2,
    /// Half extents; the quad spans `center ± scale`.
    pub scale: Vec2,
}

impl ScreenQuad {
    pub fn new(index: usize, quad_radius: f32, view_scale: f32, aspect: f32) -> Self {
        let theta = index as f32 * FRAC_PI_2;
        Self {
            index,
            center: Vec2::new(
                quad_radius * theta.sin(),
                -quad_radius * aspect * theta.cos(),
            ),
            scale: Vec2::splat(view_scale),
        }
    }

    /// Quad covering the whole window.
    pub fn fullscreen(index: usize) -> Self {
        Self {
            index,
            center: Vec2::ZERO,
            scale: Vec2::ONE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PyramidRig {
    cameras: [HoloCamera; NUM_DIRECTIONS],
    quads: [ScreenQuad; NUM_DIRECTIONS],
    camera_radius: f32,
    model_radius: f32,
    quad_radius: f32,
    view_scale: f32,
    viewport: (u32, u32),
    selected: usize,
}

impl PyramidRig {
    pub fn new(camera_radius: f32, quad_radius: f32, view_scale: f32, viewport: (u32, u32)) -> Self {
        let mut rig = Self {
            cameras: std::array::from_fn(|i| HoloCamera::new(i, camera_radius)),
            quads: std::array::from_fn(ScreenQuad::fullscreen),
            camera_radius,
            model_radius: 1.0,
            quad_radius,
            view_scale,
            viewport: (1, 1),
            selected: 0,
        };
        rig.set_viewport(viewport.0, viewport.1);
        rig
    }

    /// Camera distance that keeps a sphere of `model_radius` inside the
    /// vertical field of view, never closer than [`MIN_CAMERA_RADIUS`].
    pub fn framing_radius(model_radius: f32) -> f32 {
        let half_fov = (FOV_Y_DEG * 0.5).to_radians();
        (model_radius.max(0.0) * FRAMING_MARGIN / half_fov.sin()).max(MIN_CAMERA_RADIUS)
    }

    /// Frames a model of the given bounding radius. `fixed_radius` overrides
    /// the derived camera distance.
    pub fn frame_model(&mut self, model_radius: f32, fixed_radius: Option<f32>) {
        self.model_radius = model_radius.max(f32::EPSILON);
        let radius = fixed_radius.unwrap_or_else(|| Self::framing_radius(model_radius));
        self.set_camera_radius(radius);
    }

    pub fn set_camera_radius(&mut self, radius: f32) {
        self.camera_radius = radius;
        self.cameras = std::array::from_fn(|i| HoloCamera::new(i, radius));
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
        let aspect = self.viewport_aspect();
        let (q, s) = (self.quad_radius, self.view_scale);
        self.quads = std::array::from_fn(|i| ScreenQuad::new(i, q, s, aspect));
    }

    pub fn viewport_aspect(&self) -> f32 {
        self.viewport.0 as f32 / self.viewport.1 as f32
    }

    /// Size of each off-screen render target.
    pub fn target_size(&self) -> (u32, u32) {
        let w = (self.viewport.0 as f32 * self.view_scale).floor() as u32;
        let h = (self.viewport.1 as f32 * self.view_scale).floor() as u32;
        (w.max(1), h.max(1))
    }

    pub fn target_aspect(&self) -> f32 {
        let (w, h) = self.target_size();
        w as f32 / h as f32
    }

    /// Near/far planes hugging the model's bounding sphere.
    pub fn clip_planes(&self) -> (f32, f32) {
        let r = self.model_radius;
        let near = (self.camera_radius - 2.0 * r).max(0.05 * self.camera_radius);
        let far = self.camera_radius + 2.0 * r;
        (near, far)
    }

    pub fn view_proj(&self, index: usize) -> Mat4 {
        let (near, far) = self.clip_planes();
        self.cameras[index % NUM_DIRECTIONS].view_proj(self.target_aspect(), near, far)
    }

    /// Advances to the next camera, wrapping after the last one.
    pub fn select_next_camera(&mut self) -> usize {
        self.selected = (self.selected + 1) % NUM_DIRECTIONS;
        self.selected
    }

    pub fn reset_selection(&mut self) {
        self.selected = 0;
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn cameras(&self) -> &[HoloCamera; NUM_DIRECTIONS] {
        &self.cameras
    }

    pub fn quads(&self) -> &[ScreenQuad; NUM_DIRECTIONS] {
        &self.quads
    }

    pub fn camera_radius(&self) -> f32 {
        self.camera_radius
    }

    pub fn model_radius(&self) -> f32 {
        self.model_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const EPS: f32 = 1e-5;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    fn project(m: Mat4, p: Vec3) -> Vec3 {
        let c = m * Vec4::new(p.x, p.y, p.z, 1.0);
        c.truncate() / c.w
    }

    #[test]
    fn cameras_sit_at_quarter_turns() {
        let rig = PyramidRig::new(4.0, 0.25, 0.25, (800, 600));
        let pos: Vec<Vec3> = rig.cameras().iter().map(|c| c.position).collect();
        assert!(close(pos[0], Vec3::new(0.0, 0.0, 4.0)));
        assert!(close(pos[1], Vec3::new(4.0, 0.0, 0.0)));
        assert!(close(pos[2], Vec3::new(0.0, 0.0, -4.0)));
        assert!(close(pos[3], Vec3::new(-4.0, 0.0, 0.0)));
        let rolls: Vec<f32> = rig.cameras().iter().map(|c| c.roll_deg).collect();
        assert_eq!(rolls, [0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn every_camera_sees_the_origin_at_the_centre() {
        let rig = PyramidRig::new(4.0, 0.25, 0.25, (800, 600));
        for i in 0..NUM_DIRECTIONS {
            let ndc = project(rig.view_proj(i), Vec3::ZERO);
            assert!(ndc.x.abs() < EPS && ndc.y.abs() < EPS, "camera {}", i);
            assert!(ndc.z > 0.0 && ndc.z < 1.0);
        }
    }

    #[test]
    fn model_top_points_away_from_screen_centre() {
        // In each view the model's +Y must land on the side facing the
        // matching screen edge: down, right, up, left.
        let rig = PyramidRig::new(4.0, 0.25, 0.25, (800, 800));
        let expected = [
            Vec2::new(0.0, -1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
        ];
        for (i, dir) in expected.iter().enumerate() {
            let ndc = project(rig.view_proj(i), Vec3::Y).truncate().normalize();
            assert!((ndc - *dir).length() < 1e-3, "camera {}: {:?}", i, ndc);
            let q = rig.quads()[i].center.normalize();
            assert!((q - *dir).length() < 1e-3, "quad {}: {:?}", i, q);
        }
    }

    #[test]
    fn front_view_is_not_mirrored_left_to_right() {
        let rig = PyramidRig::new(4.0, 0.25, 0.25, (800, 800));
        let ndc = project(rig.view_proj(0), Vec3::X);
        assert!(ndc.x > 0.0);
    }

    #[test]
    fn quads_form_a_cross_scaled_by_aspect() {
        let rig = PyramidRig::new(4.0, 0.25, 0.25, (1600, 900));
        let aspect = 1600.0 / 900.0;
        let q = rig.quads();
        assert!((q[0].center - Vec2::new(0.0, -0.25 * aspect)).length() < EPS);
        assert!((q[1].center - Vec2::new(0.25, 0.0)).length() < EPS);
        assert!((q[2].center - Vec2::new(0.0, 0.25 * aspect)).length() < EPS);
        assert!((q[3].center - Vec2::new(-0.25, 0.0)).length() < EPS);
        assert!(q.iter().all(|q| q.scale == Vec2::splat(0.25)));
    }

    #[test]
    fn targets_are_a_quarter_of_the_viewport() {
        let mut rig = PyramidRig::new(4.0, 0.25, 0.25, (1280, 720));
        assert_eq!(rig.target_size(), (320, 180));
        rig.set_viewport(2, 3);
        assert_eq!(rig.target_size(), (1, 1));
        rig.set_viewport(0, 0);
        assert_eq!(rig.target_size(), (1, 1));
    }

    #[test]
    fn camera_selection_wraps_modulo_four() {
        let mut rig = PyramidRig::new(4.0, 0.25, 0.25, (100, 100));
        let seen: Vec<usize> = (0..6).map(|_| rig.select_next_camera()).collect();
        assert_eq!(seen, [1, 2, 3, 0, 1, 2]);
        rig.reset_selection();
        assert_eq!(rig.selected(), 0);
    }

    #[test]
    fn framing_radius_grows_with_the_model() {
        assert_eq!(PyramidRig::framing_radius(0.5), MIN_CAMERA_RADIUS);
        let big = PyramidRig::framing_radius(10.0);
        assert!(big > 10.0 / (FOV_Y_DEG * 0.5).to_radians().sin());

        let mut rig = PyramidRig::new(4.0, 0.25, 0.25, (100, 100));
        rig.frame_model(10.0, None);
        assert!((rig.camera_radius() - big).abs() < EPS);
        assert!((rig.cameras()[1].position.x - big).abs() < 1e-3);

        rig.frame_model(10.0, Some(50.0));
        assert_eq!(rig.camera_radius(), 50.0);
    }

    #[test]
    fn clip_planes_enclose_the_model() {
        let mut rig = PyramidRig::new(4.0, 0.25, 0.25, (100, 100));
        rig.frame_model(1.5, None);
        let (near, far) = rig.clip_planes();
        let r = rig.camera_radius();
        assert!(near > 0.0 && near < r - 1.5);
        assert!(far > r + 1.5);
    }

    #[test]
    fn rotation_wraps_into_one_turn() {
        assert_eq!(wrap_degrees(359.0 + 3.0), 2.0);
        assert_eq!(wrap_degrees(1.0 - 3.0), 358.0);
        assert_eq!(wrap_degrees(720.0), 0.0);
    }

    #[test]
    fn view_mode_toggles() {
        assert_eq!(ViewMode::default().toggled(), ViewMode::Preview);
        assert_eq!(ViewMode::Preview.toggled(), ViewMode::Pyramid);
    }
}
