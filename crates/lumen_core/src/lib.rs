//! Lumen Core - Scene data, BVH and ray intersection.
//!
//! This crate provides:
//!
//! - **Scene data**: `Scene`, `TriangleMesh`, `Object`, `Material`
//! - **Acceleration**: `Bvh`, a balanced binary tree with one triangle per leaf
//! - **Intersection**: Möller-Trumbore triangle test and nearest-hit traversal
//! - **Loading**: OBJ/MTL files via `tobj`
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{load_obj, Intersection};
//! use lumen_math::{Ray, Vec3};
//!
//! let scene = load_obj("scene.obj")?;
//! let ray = Ray::new(Vec3::ZERO, Vec3::Y);
//! let mut hit = Intersection::new();
//! if scene.intersect(&ray, &mut hit) {
//!     println!("hit triangle {} at t = {}", hit.triangle_id, hit.dist);
//! }
//! ```

pub mod bvh;
pub mod intersection;
pub mod material;
pub mod mesh;
pub mod obj;
pub mod scene;
pub mod triangle;

// Re-export commonly used types
pub use bvh::{Axis, Bvh, BvhNode, Leaves};
pub use intersection::{Intersection, SurfacePoint};
pub use material::Material;
pub use mesh::TriangleMesh;
pub use obj::{load_obj, load_obj_str, LoadError, LoadResult};
pub use scene::{Object, Scene, SceneError};
