/// Vector operations over fixed-length arrays
///
/// Spatial vectors are `[Real; 3]`, homogeneous ones `[Real; 4]`. Every
/// function takes its operands by value and returns a fresh array.
use crate::error::{MathError, MathResult};
use crate::Real;

/// Element-wise sum
pub fn add<const N: usize>(u: [Real; N], v: [Real; N]) -> [Real; N] {
    std::array::from_fn(|i| u[i] + v[i])
}

/// Element-wise difference, pointing from `v` to `u`
pub fn sub<const N: usize>(u: [Real; N], v: [Real; N]) -> [Real; N] {
    std::array::from_fn(|i| u[i] - v[i])
}

/// Multiply every component by `r`
pub fn scale<const N: usize>(v: [Real; N], r: Real) -> [Real; N] {
    v.map(|x| x * r)
}

pub fn dot<const N: usize>(u: [Real; N], v: [Real; N]) -> Real {
    u.iter().zip(v.iter()).map(|(a, b)| a * b).sum()
}

/// Cross product of the spatial parts of `u` and `v`.
///
/// Homogeneous inputs use their first three components and get a zero `w`.
pub fn cross<const N: usize>(u: [Real; N], v: [Real; N]) -> [Real; N] {
    const { assert!(N == 3 || N == 4, "cross is only defined for 3 or 4 components") };

    let mut out = [0.0; N];
    out[0] = u[1] * v[2] - u[2] * v[1];
    out[1] = u[2] * v[0] - u[0] * v[2];
    out[2] = u[0] * v[1] - u[1] * v[0];
    out
}

/// Euclidean length.
///
/// Components are divided by the largest magnitude before squaring, so
/// lengths near the ends of the `f64` range neither overflow nor underflow.
pub fn norm<const N: usize>(v: [Real; N]) -> Real {
    let largest = max_magnitude(v);
    if largest == 0.0 || !largest.is_finite() {
        return largest;
    }
    let unit = v.map(|x| x / largest);
    largest * dot(unit, unit).sqrt()
}

/// Scale `v` to unit length, rejecting the zero vector and non-finite input
pub fn normalize<const N: usize>(v: [Real; N]) -> MathResult<[Real; N]> {
    if v.iter().any(|x| !x.is_finite()) {
        return Err(MathError::NonFiniteVector);
    }
    let largest = max_magnitude(v);
    if largest == 0.0 {
        return Err(MathError::ZeroVector);
    }

    // Largest component becomes ±1, so the length lies in [1, sqrt(N)]
    let bounded = v.map(|x| x / largest);
    Ok(scale(bounded, 1.0 / dot(bounded, bounded).sqrt()))
}

fn max_magnitude<const N: usize>(v: [Real; N]) -> Real {
    v.iter().fold(0.0, |acc: Real, x| acc.max(x.abs()))
}

/// Append a homogeneous coordinate
pub fn extend(v: [Real; 3], w: Real) -> [Real; 4] {
    [v[0], v[1], v[2], w]
}

/// Drop the homogeneous coordinate
pub fn truncate(v: [Real; 4]) -> [Real; 3] {
    [v[0], v[1], v[2]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sub() {
        let u = [1.0, 2.0, 3.0];
        let v = [0.5, -1.0, 4.0];
        assert_eq!(add(u, v), [1.5, 1.0, 7.0]);
        assert_eq!(sub(u, v), [0.5, 3.0, -1.0]);
        // Inputs are untouched
        assert_eq!(u, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_scale_and_dot() {
        assert_eq!(scale([1.0, -2.0, 0.5, 1.0], 2.0), [2.0, -4.0, 1.0, 2.0]);
        assert_eq!(dot([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]), 32.0);
    }

    #[test]
    fn test_cross_basis() {
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]), [1.0, 0.0, 0.0]);
        assert_eq!(cross([0.0, 0.0, 1.0], [1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_cross_homogeneous_ignores_w() {
        let c = cross([1.0, 0.0, 0.0, 7.0], [0.0, 1.0, 0.0, 3.0]);
        assert_eq!(c, [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_norm() {
        assert_eq!(norm([3.0, 4.0, 0.0]), 5.0);
        assert_eq!(norm([0.0, 0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_normalize_unit_length() {
        let samples = [
            [3.0, 4.0, 0.0],
            [1e-3, -2e-3, 5e-4],
            [120.0, -0.25, 77.0],
            [0.0, 0.0, -9.0],
        ];
        for v in samples {
            let n = normalize(v).unwrap();
            assert!((norm(n) - 1.0).abs() < 1e-6, "{:?} -> {:?}", v, n);
        }
    }

    #[test]
    fn test_normalize_zero_fails() {
        assert_eq!(normalize([0.0, 0.0, 0.0]), Err(MathError::ZeroVector));
        assert_eq!(normalize([0.0; 4]), Err(MathError::ZeroVector));
    }

    #[test]
    fn test_norm_extreme_magnitudes() {
        assert!((norm([3e200, 4e200, 0.0]) / 5e200 - 1.0).abs() < 1e-12);
        assert!((norm([3e-200, 4e-200, 0.0]) / 5e-200 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_extreme_magnitudes() {
        for v in [[1e200, 0.0, 0.0], [1e-200, 0.0, 0.0], [-1e300, 1e300, 0.0]] {
            let n = normalize(v).unwrap();
            assert!((norm(n) - 1.0).abs() < 1e-12, "{:?} -> {:?}", v, n);
        }
        assert_eq!(normalize([1e200, 0.0, 0.0]), Ok([1.0, 0.0, 0.0]));
        assert_eq!(normalize([0.0, -1e-200, 0.0]), Ok([0.0, -1.0, 0.0]));
    }

    #[test]
    fn test_normalize_non_finite_fails() {
        assert_eq!(normalize([Real::NAN, 0.0, 0.0]), Err(MathError::NonFiniteVector));
        assert_eq!(
            normalize([0.0, Real::INFINITY, 0.0, 1.0]),
            Err(MathError::NonFiniteVector)
        );
    }

    #[test]
    fn test_extend_truncate() {
        let h = extend([1.0, 2.0, 3.0], 1.0);
        assert_eq!(h, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(truncate(h), [1.0, 2.0, 3.0]);
    }
}
