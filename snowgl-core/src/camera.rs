/// Perspective camera with a movable position and viewing direction
use std::f64::consts::PI;

use crate::error::{MathError, MathResult};
use crate::matrix::Mat;
use crate::vector;
use crate::Real;

/// Direction the view matrix aligns the camera's orientation with
pub const CANONICAL_FORWARD: [Real; 3] = [0.0, 0.0, -1.0];

/// Camera state for one scene.
///
/// Position and orientation change from frame to frame; the projection
/// is fixed when the camera is built.
#[derive(Debug, Clone)]
pub struct Camera {
    position: [Real; 3],
    orientation: [Real; 3],
    fov: Real,
    aspect: Real,
    near: Real,
    far: Real,
    projection: Mat,
}

impl Camera {
    /// Camera with a square aspect ratio, looking down -Z
    pub fn new(position: [Real; 3], fov: Real, near: Real, far: Real) -> MathResult<Self> {
        Self::with_aspect(position, fov, 1.0, near, far)
    }

    /// Camera whose horizontal extent is `aspect` times its vertical one
    pub fn with_aspect(
        position: [Real; 3],
        fov: Real,
        aspect: Real,
        near: Real,
        far: Real,
    ) -> MathResult<Self> {
        if !(0.0 < near && near < far) || !far.is_finite() {
            return Err(MathError::InvalidCamera(format!(
                "clip distances must satisfy 0 < near < far (near={}, far={})",
                near, far
            )));
        }
        if !(0.0 < fov && fov < PI) {
            return Err(MathError::InvalidCamera(format!(
                "field of view must lie in (0, pi), got {}",
                fov
            )));
        }
        if !(aspect > 0.0) || !aspect.is_finite() {
            return Err(MathError::InvalidCamera(format!(
                "aspect ratio must be positive, got {}",
                aspect
            )));
        }

        Ok(Self {
            position,
            orientation: CANONICAL_FORWARD,
            fov,
            aspect,
            near,
            far,
            projection: perspective(fov, aspect, near, far),
        })
    }

    pub fn position(&self) -> [Real; 3] {
        self.position
    }

    /// Viewing direction, not necessarily unit length
    pub fn orientation(&self) -> [Real; 3] {
        self.orientation
    }

    pub fn fov(&self) -> Real {
        self.fov
    }

    pub fn aspect(&self) -> Real {
        self.aspect
    }

    pub fn near(&self) -> Real {
        self.near
    }

    pub fn far(&self) -> Real {
        self.far
    }

    pub fn set_position(&mut self, position: [Real; 3]) {
        self.position = position;
    }

    pub fn translate(&mut self, delta: [Real; 3]) {
        self.position = vector::add(self.position, delta);
    }

    /// Turn the viewing direction by `angle` radians about `axis`
    pub fn rotate(&mut self, angle: Real, axis: [Real; 3]) {
        self.orientation = Mat::rotation(angle, axis).transform_direction(self.orientation);
    }

    /// Point the camera at `target`
    pub fn look_at(&mut self, target: [Real; 3]) {
        self.orientation = vector::sub(target, self.position);
    }

    pub fn projection_matrix(&self) -> &Mat {
        &self.projection
    }

    /// World-to-camera transform: undo the camera translation, then turn
    /// the viewing direction onto -Z. Recomputed on every call.
    pub fn view_matrix(&self) -> Mat {
        let rotation = Mat::rotate_to(self.orientation, CANONICAL_FORWARD);
        let translation = Mat::translation(vector::scale(self.position, -1.0));
        &rotation * &translation
    }

    pub fn projection_for_gpu(&self) -> Vec<f32> {
        self.projection.convert_for_gpu()
    }

    pub fn view_for_gpu(&self) -> Vec<f32> {
        self.view_matrix().convert_for_gpu()
    }

    /// Homogeneous camera position for shader uniforms
    pub fn position_for_gpu(&self) -> [f32; 4] {
        vector::extend(self.position, 1.0).map(|x| x as f32)
    }
}

/// OpenGL-style perspective projection onto clip space
fn perspective(fov: Real, aspect: Real, near: Real, far: Real) -> Mat {
    let f = 1.0 / (fov / 2.0).tan();
    let depth = near - far;

    #[rustfmt::skip]
    let m = Mat::from_4x4([
        f / aspect, 0.0, 0.0,                  0.0,
        0.0,        f,   0.0,                  0.0,
        0.0,        0.0, (far + near) / depth, 2.0 * far * near / depth,
        0.0,        0.0, -1.0,                 0.0,
    ]);
    m
}
