use crate::Vec3;

/// Refractive index of the medium a primary ray starts in.
pub const AMBIENT_IOR: f32 = 1.0;

/// A ray in 3D space, prepared for box and triangle intersection.
///
/// The reciprocal direction and per-axis sign are computed once at
/// construction so the slab test can run without divisions or branches.
/// A zero direction component yields an infinite reciprocal; the slab test
/// is written to tolerate that.
///
/// `ior` is the refractive index of the medium the ray is travelling
/// through. Transmitted rays carry the index of the medium they entered.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub inv_direction: Vec3,
    pub sign: [usize; 3],
    pub ior: f32,
}

impl Ray {
    /// Create a new ray in the ambient medium. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_ior(origin, direction, AMBIENT_IOR)
    }

    /// Create a new ray travelling through a medium with the given index.
    pub fn with_ior(origin: Vec3, direction: Vec3, ior: f32) -> Self {
        let direction = direction.normalize();
        let inv_direction = direction.recip();
        let sign = [
            (inv_direction.x < 0.0) as usize,
            (inv_direction.y < 0.0) as usize,
            (inv_direction.z < 0.0) as usize,
        ];
        Self {
            origin,
            direction,
            inv_direction,
            sign,
            ior,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let ray = Ray::new(origin, Vec3::new(0.0, 2.0, 0.0));

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, Vec3::Y);
        assert_eq!(ray.ior, AMBIENT_IOR);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_reciprocal_and_sign() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(-1.0, 0.0, 0.0));

        assert_eq!(ray.inv_direction.x, -1.0);
        assert_eq!(ray.inv_direction.y, f32::INFINITY);
        assert_eq!(ray.inv_direction.z, f32::INFINITY);
        assert_eq!(ray.sign, [1, 0, 0]);
    }

    #[test]
    fn test_ray_negative_zero_component() {
        // -0.0 gives a negative infinite reciprocal and so a set sign bit
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, -0.0, 0.0));

        assert_eq!(ray.inv_direction.y, f32::NEG_INFINITY);
        assert_eq!(ray.sign, [0, 1, 0]);
    }

    #[test]
    fn test_ray_with_ior() {
        let ray = Ray::with_ior(Vec3::ZERO, Vec3::Z, 1.5);
        assert_eq!(ray.ior, 1.5);
    }
}
