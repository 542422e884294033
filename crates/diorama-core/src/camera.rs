//! Orbit camera: spherical pose around the origin driven by [`MovementIntent`].

use crate::constants::*;
use crate::input::MovementIntent;
use glam::{Mat4, Vec3, Vec4};
use std::f32::consts::{PI, TAU};

/// Spherical camera pose. `theta` is the azimuth around +Y, `phi` the polar
/// angle measured from +Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            radius: CAMERA_INITIAL_RADIUS,
            theta: CAMERA_INITIAL_THETA,
            phi: CAMERA_INITIAL_PHI,
        }
    }
}

impl CameraState {
    #[inline]
    pub fn position(&self) -> Vec3 {
        spherical_to_cartesian(self.radius, self.theta, self.phi)
    }
}

#[inline]
pub fn spherical_to_cartesian(radius: f32, theta: f32, phi: f32) -> Vec3 {
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

#[derive(Clone, Debug)]
pub struct CameraParams {
    pub move_speed: f32,
    pub zoom_speed: f32,
    pub min_radius: f32,
    pub phi_epsilon: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            move_speed: CAMERA_MOVE_SPEED,
            zoom_speed: CAMERA_ZOOM_SPEED,
            min_radius: CAMERA_MIN_RADIUS,
            phi_epsilon: CAMERA_PHI_EPSILON,
            fovy_radians: CAMERA_FOVY_DEGREES.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

/// Simple right-handed look-at camera with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, aspect.max(1e-3), self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// World-space ray through pixel `(sx, sy)` of a `width`×`height` viewport.
    ///
    /// Returns `(ray_origin, ray_direction)`.
    pub fn screen_ray(&self, sx: f32, sy: f32, width: f32, height: f32) -> (Vec3, Vec3) {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let ndc_x = (2.0 * sx / width) - 1.0;
        let ndc_y = 1.0 - (2.0 * sy / height);
        let inv = self.view_proj(width / height).inverse();
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let rd = (p1 - self.eye).try_normalize().unwrap_or(Vec3::NEG_Z);
        (self.eye, rd)
    }
}

/// Converts held movement keys into an orbit around the bubble.
#[derive(Clone, Debug)]
pub struct OrbitCameraController {
    pub state: CameraState,
    pub params: CameraParams,
    camera: Camera,
}

impl OrbitCameraController {
    pub fn new(mut state: CameraState, params: CameraParams) -> Self {
        state.radius = state.radius.max(params.min_radius);
        state.phi = state
            .phi
            .clamp(params.phi_epsilon, PI - params.phi_epsilon);
        state.theta = state.theta.rem_euclid(TAU);
        let camera = Camera {
            eye: state.position(),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy_radians: params.fovy_radians,
            znear: params.znear,
            zfar: params.zfar,
        };
        Self {
            state,
            params,
            camera,
        }
    }

    /// Advance one frame. Speeds are per frame, so `_dt` is unused.
    pub fn update(&mut self, intent: &MovementIntent, _dt: f32) {
        let p = &self.params;
        let s = &mut self.state;

        s.theta = (s.theta + intent.sideways * p.move_speed).rem_euclid(TAU);
        s.phi = (s.phi - intent.vertical * p.move_speed).clamp(p.phi_epsilon, PI - p.phi_epsilon);
        s.radius = (s.radius + intent.forward * p.zoom_speed).max(p.min_radius);

        self.camera.eye = s.position();
        self.camera.target = Vec3::ZERO;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}

impl Default for OrbitCameraController {
    fn default() -> Self {
        Self::new(CameraState::default(), CameraParams::default())
    }
}
