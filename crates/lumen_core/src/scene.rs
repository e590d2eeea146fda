//! Scene representation consumed by the renderer.
//!
//! A scene is one triangle mesh, a table of materials and a list of objects
//! that each own a contiguous range of triangles. The BVH is built once in
//! [`Scene::new`] and is immutable afterwards, so a `&Scene` can be shared by
//! every render thread without locking.

use std::ops::Range;

use lumen_math::Ray;
use thiserror::Error;

use crate::bvh::Bvh;
use crate::intersection::{Intersection, SurfacePoint};
use crate::material::Material;
use crate::mesh::TriangleMesh;

/// Errors that make a scene description unusable.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SceneError {
    #[error("Scene contains no triangles")]
    NoGeometry,

    #[error("Triangle {triangle}: {kind} index {index} out of range (len {len})")]
    IndexOutOfRange {
        triangle: usize,
        kind: &'static str,
        index: u32,
        len: usize,
    },

    #[error("Object '{object}' references material {material}, only {count} defined")]
    InvalidMaterial {
        object: String,
        material: usize,
        count: usize,
    },

    #[error("Object '{object}' has invalid triangle range {start}..{end}")]
    InvalidObjectRange {
        object: String,
        start: usize,
        end: usize,
    },

    #[error("Triangle {0} is owned by no object")]
    UnassignedTriangle(usize),

    #[error("Triangle {0} is owned by more than one object")]
    OverlappingObjects(usize),

    #[error("Mesh has {vertex} vertex index triples but {normal} normal index triples")]
    IndexCountMismatch { vertex: usize, normal: usize },
}

/// A named group of triangles sharing one material.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub name: String,

    /// Index into the scene's material table
    pub material: usize,

    /// Triangles owned by this object
    pub triangles: Range<usize>,
}

impl Object {
    pub fn new(name: impl Into<String>, material: usize, triangles: Range<usize>) -> Self {
        Self {
            name: name.into(),
            material,
            triangles,
        }
    }
}

/// Immutable, validated scene with its acceleration structure.
#[derive(Debug)]
pub struct Scene {
    mesh: TriangleMesh,
    objects: Vec<Object>,
    materials: Vec<Material>,
    /// Owning object of every triangle
    object_ids: Vec<u32>,
    bvh: Bvh,
}

impl Scene {
    /// Validate the description and build the BVH.
    ///
    /// Every index must be in range and every triangle must belong to
    /// exactly one object; traversal and shading rely on both.
    pub fn new(
        mesh: TriangleMesh,
        objects: Vec<Object>,
        materials: Vec<Material>,
    ) -> Result<Self, SceneError> {
        let triangle_count = mesh.triangle_count();
        if triangle_count == 0 {
            return Err(SceneError::NoGeometry);
        }
        if mesh.normal_indices.len() != triangle_count {
            return Err(SceneError::IndexCountMismatch {
                vertex: triangle_count,
                normal: mesh.normal_indices.len(),
            });
        }

        check_indices(&mesh.vertex_indices, mesh.positions.len(), "vertex")?;
        check_indices(&mesh.normal_indices, mesh.normals.len(), "normal")?;

        let object_ids = assign_objects(&objects, materials.len(), triangle_count)?;
        let bvh = Bvh::build(&mesh.vertex_indices, &mesh.positions);

        log::info!(
            "Scene ready: {} triangles, {} objects, {} materials",
            triangle_count,
            objects.len(),
            materials.len()
        );

        Ok(Self {
            mesh,
            objects,
            materials,
            object_ids,
            bvh,
        })
    }

    /// A scene holding a single object made of every triangle in `mesh`.
    pub fn single_object(mesh: TriangleMesh, material: Material) -> Result<Self, SceneError> {
        let object = Object::new(material.name.clone(), 0, 0..mesh.triangle_count());
        Self::new(mesh, vec![object], vec![material])
    }

    /// Find the nearest hit along the ray that beats `hit.dist`.
    ///
    /// Returns true iff the record was updated.
    #[inline]
    pub fn intersect(&self, ray: &Ray, hit: &mut Intersection) -> bool {
        self.bvh.intersect(ray, hit)
    }

    /// Reconstruct position, interpolated normal and material at a hit.
    pub fn surface(&self, hit: &Intersection) -> SurfacePoint<'_> {
        let [w0, w1, w2] = hit.barycentrics();
        let [p0, p1, p2] = self.mesh.triangle_vertices(hit.triangle_id);
        let [n0, n1, n2] = self.mesh.triangle_normals(hit.triangle_id);

        let position = p0 * w0 + p1 * w1 + p2 * w2;
        let normal = (n0 * w0 + n1 * w1 + n2 * w2)
            .try_normalize()
            .unwrap_or_else(|| crate::mesh::face_normal(p0, p1, p2));

        SurfacePoint {
            position,
            normal,
            material: self.material_for(hit.triangle_id),
        }
    }

    /// Material of the object that owns `triangle`.
    #[inline]
    pub fn material_for(&self, triangle: usize) -> &Material {
        let object = &self.objects[self.object_ids[triangle] as usize];
        &self.materials[object.material]
    }

    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }
}

fn check_indices(indices: &[[u32; 3]], len: usize, kind: &'static str) -> Result<(), SceneError> {
    for (triangle, tri) in indices.iter().enumerate() {
        if let Some(&index) = tri.iter().find(|&&i| i as usize >= len) {
            return Err(SceneError::IndexOutOfRange {
                triangle,
                kind,
                index,
                len,
            });
        }
    }
    Ok(())
}

/// Map every triangle to its owning object.
fn assign_objects(
    objects: &[Object],
    material_count: usize,
    triangle_count: usize,
) -> Result<Vec<u32>, SceneError> {
    const UNASSIGNED: u32 = u32::MAX;
    let mut object_ids = vec![UNASSIGNED; triangle_count];

    for (id, object) in objects.iter().enumerate() {
        if object.material >= material_count {
            return Err(SceneError::InvalidMaterial {
                object: object.name.clone(),
                material: object.material,
                count: material_count,
            });
        }
        if object.triangles.start > object.triangles.end || object.triangles.end > triangle_count
        {
            return Err(SceneError::InvalidObjectRange {
                object: object.name.clone(),
                start: object.triangles.start,
                end: object.triangles.end,
            });
        }
        for triangle in object.triangles.clone() {
            if object_ids[triangle] != UNASSIGNED {
                return Err(SceneError::OverlappingObjects(triangle));
            }
            object_ids[triangle] = id as u32;
        }
    }

    match object_ids.iter().position(|&id| id == UNASSIGNED) {
        Some(triangle) => Err(SceneError::UnassignedTriangle(triangle)),
        None => Ok(object_ids),
    }
}
