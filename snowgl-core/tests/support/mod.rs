//! Test support library
//! Shared tolerances and comparison helpers for the integration tests.
#![allow(dead_code)]

use snowgl_core::{Mat, Real};

pub const EPSILON: Real = 1e-9;

pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

pub fn approx_eq_slice(a: &[Real], b: &[Real], eps: Real) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| approx_eq(*x, *y, eps))
}

/// `R * R^T == I` and `det(R) == 1`, within `eps`
pub fn is_proper_rotation(r: &Mat, eps: Real) -> bool {
    let n = r.rows();
    (r * &r.transpose()).approx_eq(&Mat::eye(n), eps)
        && r.determinant().map(|d| approx_eq(d, 1.0, eps)).unwrap_or(false)
}

/// Read a column-major flat buffer back as row-major entries
pub fn read_column_major(flat: &[f32], rows: usize, cols: usize) -> Vec<Vec<f32>> {
    (0..rows)
        .map(|i| (0..cols).map(|j| flat[j * rows + i]).collect())
        .collect()
}
