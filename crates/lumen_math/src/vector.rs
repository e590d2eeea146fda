//! Direction helpers on top of `glam::Vec3`.

use crate::Vec3;

/// True if every component is exactly zero.
///
/// Material colors use an all-zero value to mean "effect absent".
#[inline]
pub fn is_null(v: Vec3) -> bool {
    v.x == 0.0 && v.y == 0.0 && v.z == 0.0
}

/// Mirror `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit direction `v` through a surface with unit normal `n`.
///
/// `n` must face against `v` and `eta` is the ratio of the refractive index
/// on the incoming side to the index on the outgoing side. Returns `None`
/// on total internal reflection.
pub fn refract(v: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = -v.dot(n);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some(eta * v + (eta * cos_i - k.sqrt()) * n)
}

/// Build a direction from spherical angles in the frame spanned by `up`
/// and `zero`, which must be orthogonal unit vectors.
///
/// `azimuthal` rotates away from `zero` around `up`, `incline` then lifts
/// towards `up`.
pub fn from_incline_and_azimuthal(up: Vec3, zero: Vec3, incline: f32, azimuthal: f32) -> Vec3 {
    let right = zero.cross(up);
    let zero_inc = zero * azimuthal.cos() + right * azimuthal.sin();
    zero_inc * incline.cos() + up * incline.sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_is_null() {
        assert!(is_null(Vec3::ZERO));
        assert!(is_null(Vec3::new(-0.0, 0.0, 0.0)));
        assert!(!is_null(Vec3::new(0.0, 1e-9, 0.0)));
    }

    #[test]
    fn test_reflect() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(d, Vec3::Y);
        assert!(approx_eq(r, Vec3::new(1.0, 1.0, 0.0).normalize()));
    }

    #[test]
    fn test_refract_straight_through() {
        // Normal incidence is never bent
        let t = refract(-Vec3::Y, Vec3::Y, 1.0 / 1.5).unwrap();
        assert!(approx_eq(t, -Vec3::Y));
    }

    #[test]
    fn test_refract_bends_towards_normal() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let t = refract(d, Vec3::Y, 1.0 / 1.5).unwrap();

        assert!((t.length() - 1.0).abs() < 1e-5);
        // Snell: sin_t = sin_i / 1.5
        let sin_i = d.x;
        assert!((t.x - sin_i / 1.5).abs() < 1e-5);
        assert!(t.y < 0.0);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Grazing exit from glass into air
        let d = Vec3::new(0.9, -0.1, 0.0).normalize();
        assert!(refract(d, Vec3::Y, 1.5).is_none());
    }

    #[test]
    fn test_from_incline_and_azimuthal() {
        let up = Vec3::Z;
        let zero = Vec3::X;

        assert!(approx_eq(from_incline_and_azimuthal(up, zero, 0.0, 0.0), Vec3::X));
        assert!(approx_eq(from_incline_and_azimuthal(up, zero, FRAC_PI_2, 0.0), Vec3::Z));
        // right = zero x up = X x Z = -Y
        assert!(approx_eq(from_incline_and_azimuthal(up, zero, 0.0, FRAC_PI_2), -Vec3::Y));
    }
}
