//! Rotation of 3-vectors about an arbitrary axis.

use nalgebra::{Matrix3, Vector3};

use crate::error::{GeodesyError, Result};

/// Builds the matrix rotating by `angle` radians (right-handed) about
/// `unit_axis`, which must already have length one.
pub fn rotation_matrix(unit_axis: &Vector3<f64>, angle: f64) -> Matrix3<f64> {
    let (x, y, z) = (unit_axis.x, unit_axis.y, unit_axis.z);
    let (sin, cos) = angle.sin_cos();
    let versine = 1.0 - cos;

    #[rustfmt::skip]
    let matrix = Matrix3::new(
        versine * x * x + cos,     versine * x * y - sin * z, versine * x * z + sin * y,
        versine * y * x + sin * z, versine * y * y + cos,     versine * y * z - sin * x,
        versine * z * x - sin * y, versine * z * y + sin * x, versine * z * z + cos,
    );
    matrix
}

/// Rotates `v` by `angle` radians about `axis`.
///
/// The axis need not be normalized, but it must have nonzero length.
pub fn spin(v: &Vector3<f64>, axis: &Vector3<f64>, angle: f64) -> Result<Vector3<f64>> {
    let length = axis.norm();
    if length == 0.0 {
        return Err(GeodesyError::ZeroRotationAxis);
    }
    Ok(rotation_matrix(&(axis / length), angle) * v)
}

/// Rotates `v` by `angle` radians about the z axis.
pub fn spin_z(v: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    rotation_matrix(&Vector3::z(), angle) * v
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_quarter_turn_about_z() {
        let v = spin(&Vector3::x(), &Vector3::new(0.0, 0.0, 5.0), FRAC_PI_2).unwrap();
        assert_relative_eq!(v, Vector3::y(), epsilon = 1e-15);
    }

    #[test]
    fn test_matches_nalgebra_axis_angle() {
        let axis = Vector3::new(1.0, -2.0, 0.5);
        let v = Vector3::new(3.0, 1.0, -7.0);
        let ours = spin(&v, &axis, 0.7).unwrap();
        let theirs = nalgebra::Rotation3::from_axis_angle(&nalgebra::Unit::new_normalize(axis), 0.7) * v;
        assert_relative_eq!(ours, theirs, epsilon = 1e-12);
    }

    #[test]
    fn test_preserves_length_and_axis_component() {
        let axis = Vector3::new(0.3, 0.4, 1.2);
        let v = Vector3::new(-4.0, 2.5, 9.0);
        let rotated = spin(&v, &axis, 2.1).unwrap();
        assert_relative_eq!(rotated.norm(), v.norm(), epsilon = 1e-12);
        let unit = axis.normalize();
        assert_relative_eq!(rotated.dot(&unit), v.dot(&unit), epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_rotation() {
        let axis = Vector3::new(2.0, 0.0, -1.0);
        let v = Vector3::new(1.0, 2.0, 3.0);
        let there = spin(&v, &axis, PI / 3.0).unwrap();
        let back = spin(&there, &axis, -PI / 3.0).unwrap();
        assert_relative_eq!(back, v, epsilon = 1e-12);
    }

    #[test]
    fn test_spin_z_matches_spin() {
        let v = Vector3::new(-1819.0, 4657.0, 4200.0);
        assert_eq!(spin_z(&v, -0.55), spin(&v, &Vector3::z(), -0.55).unwrap());
    }

    #[test]
    fn test_zero_axis() {
        let err = spin(&Vector3::x(), &Vector3::zeros(), 1.0).unwrap_err();
        assert_eq!(err, GeodesyError::ZeroRotationAxis);
    }
}
