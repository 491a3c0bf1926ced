//! Perspective camera orbiting a target point.

use glam::{Mat4, Vec3};

use crate::constants::{
    CAMERA_FAR, CAMERA_FOVY_RADIANS, CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE, CAMERA_NEAR,
    ORBIT_RADIANS_PER_PIXEL, ZOOM_PER_SCROLL_LINE,
};

/// Right-handed camera with perspective projection.
///
/// The view and projection matrices are cached; `update` and
/// `update_projection_matrix` rebuild them from the public fields.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fovy: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            position,
            target,
            up: Vec3::Y,
            fovy: CAMERA_FOVY_RADIANS,
            aspect_ratio: 1.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update();
        camera.update_projection_matrix();
        camera
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio.max(1e-3);
    }

    /// Aspect ratio from a surface size; zero-sized surfaces are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.set_aspect_ratio(width as f32 / height as f32);
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix =
            Mat4::perspective_rh(self.fovy, self.aspect_ratio, self.near, self.far);
    }

    /// Rebuild the view matrix from position, target and up.
    pub fn update(&mut self) {
        self.view_matrix = Mat4::look_at_rh(self.position, self.target, self.up);
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Rotate the eye around the target by yaw (about +Y) and pitch.
    ///
    /// Pitch stops just short of the poles so `up` never aligns with the view
    /// direction. Call [`Camera::update`] afterwards.
    pub fn orbit(&mut self, yaw_delta: f32, pitch_delta: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let mut yaw = offset.z.atan2(offset.x);
        let mut pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        yaw += yaw_delta;
        let lim = std::f32::consts::FRAC_PI_2 - 0.017;
        pitch = (pitch + pitch_delta).clamp(-lim, lim);
        self.position = self.target
            + Vec3::new(
                radius * yaw.cos() * pitch.cos(),
                radius * pitch.sin(),
                radius * yaw.sin() * pitch.cos(),
            );
    }

    /// Scale the eye distance by `factor`, clamped to the allowed range.
    pub fn zoom(&mut self, factor: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON || !factor.is_finite() {
            return;
        }
        let next = (radius * factor).clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
        self.position = self.target + offset * (next / radius);
    }
}

/// Pointer-driven orbit: drag to rotate, wheel to zoom.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrbitControls {
    dragging: bool,
    last: Option<(f32, f32)>,
}

impl OrbitControls {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.last = Some((x, y));
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
        self.last = None;
    }

    /// Orbit `camera` by the drag distance since the previous pointer event.
    pub fn pointer_move(&mut self, camera: &mut Camera, x: f32, y: f32) {
        if !self.dragging {
            return;
        }
        if let Some((lx, ly)) = self.last {
            camera.orbit(
                (x - lx) * ORBIT_RADIANS_PER_PIXEL,
                (y - ly) * ORBIT_RADIANS_PER_PIXEL,
            );
        }
        self.last = Some((x, y));
    }

    /// Positive `lines` zooms in.
    pub fn wheel(&mut self, camera: &mut Camera, lines: f32) {
        camera.zoom(ZOOM_PER_SCROLL_LINE.powf(lines));
    }
}
