/// Row-major matrices and the transform constructors built on them
use std::ops::{Add, Index, Mul};

use nalgebra::DMatrix;

use crate::error::{MathError, MathResult};
use crate::vector;
use crate::Real;

/// A rectangular matrix of `Real` entries.
///
/// Indexing is row-major: `m[(i, j)]` is row `i`, column `j`. Matrices are
/// values; every operation returns a new `Mat`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mat {
    entries: DMatrix<Real>,
}

impl Mat {
    /// Build a matrix from its rows, rejecting empty or jagged input
    pub fn new(rows: Vec<Vec<Real>>) -> MathResult<Self> {
        let row_count = rows.len();
        let col_count = rows.first().map(Vec::len).unwrap_or(0);
        if row_count == 0 || col_count == 0 {
            return Err(MathError::Shape("matrix has no entries".to_string()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != col_count) {
            return Err(MathError::Shape(format!(
                "row {} has {} entries, expected {}",
                i,
                row.len(),
                col_count
            )));
        }

        Ok(Self {
            entries: DMatrix::from_fn(row_count, col_count, |i, j| rows[i][j]),
        })
    }

    /// Build a matrix from a flat row-major slice
    pub fn from_row_slice(rows: usize, cols: usize, data: &[Real]) -> MathResult<Self> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            return Err(MathError::Shape(format!(
                "{} entries cannot fill a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self {
            entries: DMatrix::from_row_slice(rows, cols, data),
        })
    }

    pub(crate) fn from_4x4(data: [Real; 16]) -> Self {
        Self {
            entries: DMatrix::from_row_slice(4, 4, &data),
        }
    }

    /// The 4x4 identity
    pub fn identity() -> Self {
        Self::eye(4)
    }

    /// The `n`x`n` identity
    pub fn eye(n: usize) -> Self {
        Self {
            entries: DMatrix::identity(n, n),
        }
    }

    /// Homogeneous translation by `v`
    pub fn translation(v: [Real; 3]) -> Self {
        #[rustfmt::skip]
        let m = Self::from_4x4([
            1.0, 0.0, 0.0, v[0],
            0.0, 1.0, 0.0, v[1],
            0.0, 0.0, 1.0, v[2],
            0.0, 0.0, 0.0, 1.0,
        ]);
        m
    }

    /// Homogeneous non-uniform scale
    pub fn scale(sx: Real, sy: Real, sz: Real) -> Self {
        #[rustfmt::skip]
        let m = Self::from_4x4([
            sx,  0.0, 0.0, 0.0,
            0.0, sy,  0.0, 0.0,
            0.0, 0.0, sz,  0.0,
            0.0, 0.0, 0.0, 1.0,
        ]);
        m
    }

    /// Right-handed rotation by `theta` radians about `axis`.
    ///
    /// The matrix is expanded from the unit quaternion
    /// `[cos(θ/2), sin(θ/2)·n]`. A zero `axis` has no direction, so the
    /// identity is returned instead of an error.
    pub fn rotation(theta: Real, axis: [Real; 3]) -> Self {
        let n = match vector::normalize(axis) {
            Ok(n) => n,
            Err(_) => {
                log::debug!("rotation about a zero axis, using identity");
                return Self::identity();
            }
        };

        let (s, c) = (theta / 2.0).sin_cos();
        let (w, x, y, z) = (c, s * n[0], s * n[1], s * n[2]);

        #[rustfmt::skip]
        let m = Self::from_4x4([
            1.0 - 2.0 * (y * y + z * z), 2.0 * (x * y - w * z),       2.0 * (x * z + w * y),       0.0,
            2.0 * (x * y + w * z),       1.0 - 2.0 * (x * x + z * z), 2.0 * (y * z - w * x),       0.0,
            2.0 * (x * z - w * y),       2.0 * (y * z + w * x),       1.0 - 2.0 * (x * x + y * y), 0.0,
            0.0,                         0.0,                         0.0,                         1.0,
        ]);
        m
    }

    /// Rotation taking the direction of `from` onto the direction of `to`.
    ///
    /// The angle is recovered as `asin(|from × to|)` on the normalized
    /// inputs, which only covers separations up to 90°. Wider separations
    /// rotate by the supplementary angle instead, and parallel or opposite
    /// vectors give the identity.
    pub fn rotate_to(from: [Real; 3], to: [Real; 3]) -> Self {
        let axis = match (vector::normalize(from), vector::normalize(to)) {
            (Ok(a), Ok(b)) => vector::cross(a, b),
            _ => {
                log::debug!("rotate_to with a zero vector, using identity");
                return Self::identity();
            }
        };
        let sin = vector::norm(axis).min(1.0);
        Self::rotation(sin.asin(), axis)
    }

    pub fn rows(&self) -> usize {
        self.entries.nrows()
    }

    pub fn cols(&self) -> usize {
        self.entries.ncols()
    }

    /// Entry at row `i`, column `j`, if in bounds
    pub fn get(&self, i: usize, j: usize) -> Option<Real> {
        self.entries.get((i, j)).copied()
    }

    /// Copy the entries out as rows
    pub fn to_rows(&self) -> Vec<Vec<Real>> {
        (0..self.rows())
            .map(|i| (0..self.cols()).map(|j| self.entries[(i, j)]).collect())
            .collect()
    }

    /// `self + other`
    pub fn try_add(&self, other: &Mat) -> MathResult<Mat> {
        if self.rows() != other.rows() || self.cols() != other.cols() {
            return Err(self.mismatch("add", other));
        }
        Ok(Mat {
            entries: &self.entries + &other.entries,
        })
    }

    /// `self * other`, a `self.rows() x other.cols()` matrix
    pub fn try_mul(&self, other: &Mat) -> MathResult<Mat> {
        if self.cols() != other.rows() {
            return Err(self.mismatch("mul", other));
        }
        Ok(Mat {
            entries: &self.entries * &other.entries,
        })
    }

    fn mismatch(&self, op: &'static str, other: &Mat) -> MathError {
        MathError::DimensionMismatch {
            op,
            left_rows: self.rows(),
            left_cols: self.cols(),
            right_rows: other.rows(),
            right_cols: other.cols(),
        }
    }

    /// Apply the matrix to `v`: one dot product per row
    pub fn operate_on(&self, v: &[Real]) -> MathResult<Vec<Real>> {
        if v.len() != self.cols() {
            return Err(MathError::DimensionMismatch {
                op: "operate_on",
                left_rows: self.rows(),
                left_cols: self.cols(),
                right_rows: v.len(),
                right_cols: 1,
            });
        }
        Ok(self
            .entries
            .row_iter()
            .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
            .collect())
    }

    /// Apply the upper-left 3x3 block to a direction (`w = 0`).
    ///
    /// # Panics
    /// If the matrix is smaller than 3x3.
    pub fn transform_direction(&self, v: [Real; 3]) -> [Real; 3] {
        std::array::from_fn(|i| (0..3).map(|j| self.entries[(i, j)] * v[j]).sum())
    }

    /// Apply a 4x4 matrix to a point (`w = 1`), keeping the homogeneous result.
    ///
    /// # Panics
    /// If the matrix is not at least 4x4.
    pub fn transform_point(&self, p: [Real; 3]) -> [Real; 4] {
        let h = vector::extend(p, 1.0);
        std::array::from_fn(|i| (0..4).map(|j| self.entries[(i, j)] * h[j]).sum())
    }

    pub fn transpose(&self) -> Mat {
        Mat {
            entries: self.entries.transpose(),
        }
    }

    /// The leading `n`x`n` block
    pub fn upper_left(&self, n: usize) -> MathResult<Mat> {
        if n == 0 || n > self.rows() || n > self.cols() {
            return Err(MathError::Shape(format!(
                "no {}x{} block in a {}x{} matrix",
                n,
                n,
                self.rows(),
                self.cols()
            )));
        }
        Ok(Mat {
            entries: DMatrix::from_fn(n, n, |i, j| self.entries[(i, j)]),
        })
    }

    pub fn determinant(&self) -> MathResult<Real> {
        if self.rows() != self.cols() {
            return Err(MathError::Shape(format!(
                "determinant of a non-square {}x{} matrix",
                self.rows(),
                self.cols()
            )));
        }
        Ok(self.entries.determinant())
    }

    /// Flatten into the column-major `f32` layout expected by GPU uniforms.
    ///
    /// Entry `(i, j)` lands at index `j * rows + i`.
    pub fn convert_for_gpu(&self) -> Vec<f32> {
        let rows = self.rows();
        let mut out = vec![0.0f32; rows * self.cols()];
        for i in 0..rows {
            for j in 0..self.cols() {
                out[j * rows + i] = self.entries[(i, j)] as f32;
            }
        }
        out
    }

    /// True when both matrices have the same shape and every entry is within `eps`
    pub fn approx_eq(&self, other: &Mat, eps: Real) -> bool {
        self.rows() == other.rows()
            && self.cols() == other.cols()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| (a - b).abs() <= eps)
    }

    /// Shift the translation column of a homogeneous transform
    pub(crate) fn offset_translation(&mut self, delta: [Real; 3]) {
        let last = self.cols() - 1;
        for (i, d) in delta.iter().enumerate() {
            self.entries[(i, last)] += d;
        }
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = Real;

    fn index(&self, index: (usize, usize)) -> &Real {
        &self.entries[index]
    }
}

/// Panics on mismatched shapes, like nalgebra's operators. Use
/// [`Mat::try_add`] for a checked version.
impl Add for &Mat {
    type Output = Mat;

    fn add(self, rhs: &Mat) -> Mat {
        Mat {
            entries: &self.entries + &rhs.entries,
        }
    }
}

/// Panics on mismatched shapes, like nalgebra's operators. Use
/// [`Mat::try_mul`] for a checked version.
impl Mul for &Mat {
    type Output = Mat;

    fn mul(self, rhs: &Mat) -> Mat {
        Mat {
            entries: &self.entries * &rhs.entries,
        }
    }
}

impl Mul for Mat {
    type Output = Mat;

    fn mul(self, rhs: Mat) -> Mat {
        &self * &rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI};

    const EPS: Real = 1e-9;

    fn sample() -> Mat {
        Mat::new(vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![5.0, 6.0, 7.0, 8.0],
            vec![-1.0, 0.5, 0.25, 2.0],
            vec![0.0, 3.0, -2.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_new_rejects_jagged() {
        let result = Mat::new(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(MathError::Shape(_))));
        assert!(Mat::new(vec![]).is_err());
    }

    #[test]
    fn test_shape_recorded() {
        let m = Mat::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert!(Mat::from_row_slice(2, 2, &[1.0]).is_err());
    }

    #[test]
    fn test_identity_is_neutral() {
        let a = sample();
        assert_eq!(&a * &Mat::identity(), a);
        assert_eq!(&Mat::identity() * &a, a);
    }

    #[test]
    fn test_add() {
        let sum = sample().try_add(&Mat::identity()).unwrap();
        assert_eq!(sum[(0, 0)], 2.0);
        assert_eq!(sum[(0, 1)], 2.0);
        assert_eq!(sum[(3, 3)], 2.0);
    }

    #[test]
    fn test_mul_shapes() {
        let a = Mat::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = Mat::from_row_slice(3, 1, &[1.0, 0.0, -1.0]).unwrap();
        let c = a.try_mul(&b).unwrap();
        assert_eq!((c.rows(), c.cols()), (2, 1));
        assert_eq!(c.to_rows(), vec![vec![-2.0], vec![-2.0]]);

        let err = b.try_mul(&a).unwrap_err();
        assert!(matches!(err, MathError::DimensionMismatch { op: "mul", .. }));
        assert!(a.try_add(&b).is_err());
    }

    #[test]
    fn test_operate_on() {
        let v = Mat::translation([1.0, 2.0, 3.0])
            .operate_on(&[0.0, 0.0, 0.0, 1.0])
            .unwrap();
        assert_eq!(v, vec![1.0, 2.0, 3.0, 1.0]);
        assert!(Mat::identity().operate_on(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_scale() {
        let p = Mat::scale(2.0, 3.0, 4.0).transform_point([1.0, 1.0, 1.0]);
        assert_eq!(p, [2.0, 3.0, 4.0, 1.0]);
    }

    #[test]
    fn test_translation_gpu_layout() {
        let flat = Mat::translation([1.0, 2.0, 3.0]).convert_for_gpu();
        assert_eq!(
            flat,
            vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 2.0, 3.0, 1.0]
        );
    }

    #[test]
    fn test_gpu_layout_is_column_major() {
        let m = Mat::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let flat = m.convert_for_gpu();
        assert_eq!(flat.len(), 6);
        for i in 0..m.rows() {
            for j in 0..m.cols() {
                assert_eq!(flat[j * m.rows() + i], m[(i, j)] as f32);
            }
        }
        assert_eq!(flat, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_rotation_zero_angle_is_identity() {
        for axis in [[1.0, 0.0, 0.0], [0.3, -2.0, 5.0], [0.0, 0.0, 1.0]] {
            assert_eq!(Mat::rotation(0.0, axis), Mat::identity());
        }
    }

    #[test]
    fn test_rotation_zero_axis_falls_back_to_identity() {
        assert_eq!(Mat::rotation(1.2, [0.0, 0.0, 0.0]), Mat::identity());
    }

    #[test]
    fn test_rotation_is_proper() {
        let axes = [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [-0.2, 0.7, 0.4],
        ];
        for axis in axes {
            let axis = vector::normalize(axis).unwrap();
            for k in -8..=8 {
                let theta = k as Real * PI / 5.0;
                let r = Mat::rotation(theta, axis);
                assert!((&r * &r.transpose()).approx_eq(&Mat::identity(), EPS));
                assert!((r.determinant().unwrap() - 1.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_rotation_is_right_handed() {
        let r = Mat::rotation(FRAC_PI_2, [0.0, 0.0, 1.0]);
        let v = r.transform_direction([1.0, 0.0, 0.0]);
        assert!((v[0]).abs() < EPS);
        assert!((v[1] - 1.0).abs() < EPS);
        assert!((v[2]).abs() < EPS);
    }

    #[test]
    fn test_rotate_to_same_vector_is_identity() {
        let v = [0.3, -1.0, 2.0];
        assert_eq!(Mat::rotate_to(v, v), Mat::identity());
    }

    #[test]
    fn test_rotate_to_within_90_degrees() {
        let from = [2.0, 0.0, 0.0];
        let to = [FRAC_PI_3.cos(), FRAC_PI_3.sin(), 0.0];
        let v = Mat::rotate_to(from, to).transform_direction([1.0, 0.0, 0.0]);
        for (a, b) in v.iter().zip(to.iter()) {
            assert!((a - b).abs() < EPS);
        }
    }

    #[test]
    fn test_rotate_to_wide_angle_uses_supplement() {
        // 120° apart: asin only recovers 60°
        let to = [(2.0 * FRAC_PI_3).cos(), (2.0 * FRAC_PI_3).sin(), 0.0];
        let got = Mat::rotate_to([1.0, 0.0, 0.0], to);
        let expected = Mat::rotation(FRAC_PI_3, [0.0, 0.0, 1.0]);
        assert!(got.approx_eq(&expected, EPS));
    }

    #[test]
    fn test_upper_left_and_determinant() {
        let block = Mat::scale(2.0, 3.0, 4.0).upper_left(3).unwrap();
        assert_eq!((block.rows(), block.cols()), (3, 3));
        assert!((block.determinant().unwrap() - 24.0).abs() < EPS);
        assert!(block.upper_left(4).is_err());

        let wide = Mat::from_row_slice(1, 2, &[1.0, 2.0]).unwrap();
        assert!(wide.determinant().is_err());
    }

    #[test]
    fn test_offset_translation() {
        let mut t = Mat::translation([1.0, 1.0, 1.0]);
        t.offset_translation([0.5, -1.0, 2.0]);
        assert_eq!(t, Mat::translation([1.5, 0.0, 3.0]));
    }
}
