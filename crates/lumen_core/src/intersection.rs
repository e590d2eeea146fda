//! Nearest-hit record threaded through BVH traversal.

use lumen_math::Vec3;

use crate::Material;

/// Record of the nearest ray-triangle intersection found so far.
///
/// `dist` starts at infinity and only ever shrinks. Traversal uses it as the
/// upper bound of every box and triangle test, so one record shared across
/// the whole descent prunes everything that cannot beat the current hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Distance along the ray to the nearest hit
    pub dist: f32,
    /// Triangle that produced the nearest hit
    pub triangle_id: usize,
    /// Barycentric weight of the second vertex
    pub u: f32,
    /// Barycentric weight of the third vertex
    pub v: f32,
}

impl Intersection {
    /// An empty record: no hit yet, unbounded distance.
    pub fn new() -> Self {
        Self {
            dist: f32::INFINITY,
            triangle_id: 0,
            u: 0.0,
            v: 0.0,
        }
    }

    /// True once any triangle has been accepted.
    pub fn is_hit(&self) -> bool {
        self.dist.is_finite()
    }

    /// Barycentric weights of the three vertices, `(1 - u - v, u, v)`.
    pub fn barycentrics(&self) -> [f32; 3] {
        [1.0 - self.u - self.v, self.u, self.v]
    }
}

impl Default for Intersection {
    fn default() -> Self {
        Self::new()
    }
}

/// Shading information reconstructed at a hit.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoint<'a> {
    /// World-space hit position
    pub position: Vec3,
    /// Interpolated unit shading normal, as authored (not yet faced)
    pub normal: Vec3,
    /// Material of the object that owns the triangle
    pub material: &'a Material,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_intersection_is_empty() {
        let hit = Intersection::new();
        assert!(!hit.is_hit());
        assert_eq!(hit.dist, f32::INFINITY);
    }

    #[test]
    fn test_barycentrics_sum_to_one() {
        let hit = Intersection {
            dist: 1.0,
            triangle_id: 3,
            u: 0.25,
            v: 0.5,
        };
        let [w, u, v] = hit.barycentrics();

        assert!(hit.is_hit());
        assert_eq!(w, 0.25);
        assert!((w + u + v - 1.0).abs() < 1e-6);
    }
}
