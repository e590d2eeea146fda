//! Ray-triangle intersection.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use lumen_math::{Ray, Vec3};

use crate::Intersection;

/// Dead zone for the determinant and minimum accepted hit distance.
pub const EPSILON: f32 = 1e-4;

/// Möller-Trumbore ray-triangle intersection algorithm.
///
/// Accepts the hit only if it is nearer than `hit.dist`; in that case
/// `dist`, `u` and `v` are updated and `true` is returned. The caller
/// records which triangle produced the hit.
pub fn intersect_triangle(ray: &Ray, vertices: &[Vec3; 3], hit: &mut Intersection) -> bool {
    let [v0, v1, v2] = *vertices;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() <= EPSILON {
        return false;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    // Check if intersection is outside triangle (u parameter)
    if !(0.0..=1.0).contains(&u) {
        return false;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    // Check if intersection is outside triangle (v parameter)
    if v < 0.0 || u + v > 1.0 {
        return false;
    }

    let t = f * edge2.dot(q);

    if t <= EPSILON || t >= hit.dist {
        return false;
    }

    hit.dist = t;
    hit.u = u;
    hit.v = v;
    true
}
