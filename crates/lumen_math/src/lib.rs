// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod ray;
pub mod sampling;
pub mod vector;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::{Ray, AMBIENT_IOR};

/// Color type alias (linear RGB, unclamped)
pub type Color = Vec3;

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::splat(3.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(a.min(b), a);
        assert_eq!(a.max(b), b);
        assert!((Vec3::new(3.0, 4.0, 0.0).length() - 5.0).abs() < 1e-6);
        assert!((a.normalize().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mat3_rotations() {
        // Right-handed rotations: X takes Y to Z, Y takes Z to X, Z takes X to Y
        assert!(approx_eq(Mat3::from_rotation_x(FRAC_PI_2) * Vec3::Y, Vec3::Z));
        assert!(approx_eq(Mat3::from_rotation_y(FRAC_PI_2) * Vec3::Z, Vec3::X));
        assert!(approx_eq(Mat3::from_rotation_z(FRAC_PI_2) * Vec3::X, Vec3::Y));
    }

    #[test]
    fn test_mat3_scale_and_product() {
        let scale = Mat3::from_diagonal(Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(scale * Vec3::ONE, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!((Mat3::IDENTITY * 2.0) * Vec3::ONE, Vec3::splat(2.0));
        assert_eq!(Mat3::ZERO * Vec3::ONE, Vec3::ZERO);

        // Composition applies the right-hand matrix first
        let rot = Mat3::from_rotation_z(FRAC_PI_2);
        assert!(approx_eq((rot * scale) * Vec3::X, Vec3::new(0.0, 2.0, 0.0)));
        assert!(approx_eq((scale * rot) * Vec3::X, Vec3::new(0.0, 3.0, 0.0)));
    }
}
