//! Triangle mesh geometry.
//!
//! Positions and normals are indexed separately, so a vertex shared by two
//! faces can still carry a different normal in each of them.

use lumen_math::{Aabb, Vec3};

/// Indexed triangle soup with independent position and normal indices.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,

    /// Shading normals
    pub normals: Vec<Vec3>,

    /// Three position indices per triangle
    pub vertex_indices: Vec<[u32; 3]>,

    /// Three normal indices per triangle
    pub normal_indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Create a mesh from positions and per-triangle position indices,
    /// generating one flat normal per triangle.
    pub fn with_face_normals(positions: Vec<Vec3>, vertex_indices: Vec<[u32; 3]>) -> Self {
        let mut mesh = Self {
            positions,
            normals: Vec::new(),
            vertex_indices,
            normal_indices: Vec::new(),
        };
        mesh.compute_face_normals();
        mesh
    }

    /// Replace all normals with one geometric normal per triangle.
    ///
    /// Counter-clockwise winding gives the front face. Degenerate
    /// triangles get +Z so that interpolation never yields NaN.
    pub fn compute_face_normals(&mut self) {
        self.normals.clear();
        self.normal_indices.clear();

        for (i, tri) in self.vertex_indices.iter().enumerate() {
            let [p0, p1, p2] = tri.map(|idx| self.positions[idx as usize]);
            self.normals.push(face_normal(p0, p1, p2));
            let n = i as u32;
            self.normal_indices.push([n, n, n]);
        }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.vertex_indices.len()
    }

    /// Positions of the three corners of a triangle.
    #[inline]
    pub fn triangle_vertices(&self, triangle: usize) -> [Vec3; 3] {
        self.vertex_indices[triangle].map(|i| self.positions[i as usize])
    }

    /// Normals of the three corners of a triangle.
    #[inline]
    pub fn triangle_normals(&self, triangle: usize) -> [Vec3; 3] {
        self.normal_indices[triangle].map(|i| self.normals[i as usize])
    }

    /// Axis-aligned bounding box of every referenced position.
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for tri in &self.vertex_indices {
            for &i in tri {
                bounds.grow(self.positions[i as usize]);
            }
        }
        bounds
    }
}

/// Unit geometric normal of a counter-clockwise triangle.
pub fn face_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    (p1 - p0).cross(p2 - p0).try_normalize().unwrap_or(Vec3::Z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> TriangleMesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0), // v0
            Vec3::new(1.0, 0.0, 0.0), // v1
            Vec3::new(0.0, 1.0, 0.0), // v2
            Vec3::new(1.0, 1.0, 0.0), // v3
        ];
        // Two triangles: [0,1,2] and [1,3,2]
        TriangleMesh::with_face_normals(positions, vec![[0, 1, 2], [1, 3, 2]])
    }

    #[test]
    fn test_face_normals() {
        let mesh = quad();

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.normals.len(), 2);
        for tri in 0..mesh.triangle_count() {
            for n in mesh.triangle_normals(tri) {
                assert!((n - Vec3::Z).length() < 1e-6);
            }
        }
    }

    #[test]
    fn test_degenerate_face_normal() {
        let n = face_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(n, Vec3::Z);
    }

    #[test]
    fn test_triangle_vertices() {
        let mesh = quad();
        let [a, b, c] = mesh.triangle_vertices(1);

        assert_eq!(a, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(b, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(c, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_bounds_computation() {
        let mesh = TriangleMesh::with_face_normals(
            vec![
                Vec3::new(-1.0, -2.0, -3.0),
                Vec3::new(4.0, 5.0, 6.0),
                Vec3::new(0.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let bounds = mesh.bounds();

        assert_eq!(bounds.min(), Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bounds.max(), Vec3::new(4.0, 5.0, 6.0));
    }
}
