/// Model transform of a mesh instance and the matrices derived from it
use crate::error::{MathError, MathResult};
use crate::geometry::Geometry;
use crate::matrix::Mat;
use crate::vector;
use crate::Real;

/// Object-space axis that the orientation direction given at construction refers to
pub const MODEL_FORWARD: [Real; 3] = [1.0, 0.0, 0.0];

/// A determinant this small relative to the product of the column lengths
/// is treated as zero
pub const SINGULAR_EPSILON: Real = 1e-12;

/// A mesh placed in the world.
///
/// The model matrix is `orientation * translation * scale`; `orientation`
/// stays a proper rotation, `scale` is identity unless set.
#[derive(Debug, Clone)]
pub struct Mesh {
    translation: Mat,
    orientation: Mat,
    scale: Mat,
    geometry: Geometry,
}

impl Mesh {
    /// Place `geometry` at `position` with its +x axis turned towards `direction`
    pub fn new(position: [Real; 3], direction: [Real; 3], geometry: Geometry) -> MathResult<Self> {
        let direction = vector::normalize(direction)?;
        Ok(Self {
            translation: Mat::translation(position),
            orientation: Mat::rotate_to(MODEL_FORWARD, direction),
            scale: Mat::identity(),
            geometry,
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Current translation offset
    pub fn position(&self) -> [Real; 3] {
        let t = &self.translation;
        [t[(0, 3)], t[(1, 3)], t[(2, 3)]]
    }

    pub fn orientation(&self) -> &Mat {
        &self.orientation
    }

    /// Rotate by `angle` radians about the world-space `axis`
    pub fn rotate(&mut self, angle: Real, axis: [Real; 3]) {
        self.orientation = &Mat::rotation(angle, axis) * &self.orientation;
    }

    pub fn translate(&mut self, delta: [Real; 3]) {
        self.translation.offset_translation(delta);
    }

    pub fn set_scale(&mut self, sx: Real, sy: Real, sz: Real) {
        self.scale = Mat::scale(sx, sy, sz);
    }

    pub fn model_matrix(&self) -> Mat {
        &(&self.orientation * &self.translation) * &self.scale
    }

    /// Inverse transpose of the model's linear part, for transforming normals
    pub fn normal_matrix(&self) -> MathResult<Mat> {
        normal_matrix(&self.model_matrix())
    }

    pub fn model_for_gpu(&self) -> Vec<f32> {
        self.model_matrix().convert_for_gpu()
    }

    pub fn normal_for_gpu(&self) -> MathResult<Vec<f32>> {
        Ok(self.normal_matrix()?.convert_for_gpu())
    }
}

/// Transpose-inverse of the upper-left 3x3 block of `model`.
///
/// The inverse transpose equals the cofactor matrix divided by the
/// determinant, so no explicit transpose is needed.
pub fn normal_matrix(model: &Mat) -> MathResult<Mat> {
    let m = model.upper_left(3)?;
    let a = |i: usize, j: usize| m[(i, j)];

    let cofactors = [
        a(1, 1) * a(2, 2) - a(1, 2) * a(2, 1),
        -(a(1, 0) * a(2, 2) - a(1, 2) * a(2, 0)),
        a(1, 0) * a(2, 1) - a(1, 1) * a(2, 0),
        -(a(0, 1) * a(2, 2) - a(0, 2) * a(2, 1)),
        a(0, 0) * a(2, 2) - a(0, 2) * a(2, 0),
        -(a(0, 0) * a(2, 1) - a(0, 1) * a(2, 0)),
        a(0, 1) * a(1, 2) - a(0, 2) * a(1, 1),
        -(a(0, 0) * a(1, 2) - a(0, 2) * a(1, 0)),
        a(0, 0) * a(1, 1) - a(0, 1) * a(1, 0),
    ];

    let determinant = a(0, 0) * cofactors[0] + a(0, 1) * cofactors[1] + a(0, 2) * cofactors[2];
    // |det| never exceeds the product of the column lengths
    let extent: Real = (0..3)
        .map(|j| vector::norm([a(0, j), a(1, j), a(2, j)]))
        .product();
    if !determinant.is_finite() || determinant.abs() <= SINGULAR_EPSILON * extent {
        log::warn!("model matrix is singular, no normal matrix");
        return Err(MathError::SingularMatrix { determinant });
    }

    Mat::from_row_slice(3, 3, &cofactors.map(|c| c / determinant))
}
