//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! One triangle per leaf, exact median splits, and a fixed X→Y→Z axis
//! rotation by tree level. Built once per scene and never modified.

use std::time::Instant;

use lumen_math::{Aabb, Interval, Ray, Vec3};

use crate::triangle::{intersect_triangle, EPSILON};
use crate::Intersection;

/// Split axis of an internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Next axis in the rotation X→Y→Z→X.
    #[inline]
    pub fn next(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::Z,
            Axis::Z => Axis::X,
        }
    }
}

/// BVH node - either an internal node with exactly two children or a leaf
/// holding a single triangle.
///
/// Leaves cache the triangle's world-space vertices so traversal never has
/// to go back through the index buffers.
#[derive(Debug)]
pub enum BvhNode {
    Leaf {
        triangle_id: usize,
        vertices: [Vec3; 3],
    },
    Internal {
        bounds: Aabb,
        axis: Axis,
        /// `children[0]` holds the triangles with the smaller centroids
        children: Box<[BvhNode; 2]>,
    },
}

impl BvhNode {
    /// Find the nearest hit in this subtree that beats `hit.dist`.
    ///
    /// Returns true iff the record was updated somewhere in the subtree.
    pub fn intersect(&self, ray: &Ray, hit: &mut Intersection) -> bool {
        match self {
            BvhNode::Leaf {
                triangle_id,
                vertices,
            } => {
                if intersect_triangle(ray, vertices, hit) {
                    hit.triangle_id = *triangle_id;
                    true
                } else {
                    false
                }
            }
            BvhNode::Internal {
                bounds,
                axis,
                children,
            } => {
                if !bounds.hit(ray, Interval::new(EPSILON, hit.dist)) {
                    return false;
                }

                // Visit the child on the ray's entry side first; a hit there
                // tightens hit.dist before the far child's box test.
                let near = ray.sign[axis.index()];
                let hit_near = children[near].intersect(ray, hit);
                let hit_far = children[1 - near].intersect(ray, hit);
                hit_near || hit_far
            }
        }
    }

    fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Internal { children, .. } => {
                1 + children[0].node_count() + children[1].node_count()
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Internal { children, .. } => {
                1 + children[0].depth().max(children[1].depth())
            }
        }
    }
}

/// Immutable BVH over the triangles of a mesh.
#[derive(Debug)]
pub struct Bvh {
    root: BvhNode,
    triangle_count: usize,
}

impl Bvh {
    /// Build a BVH from per-triangle vertex indices and vertex positions.
    ///
    /// # Panics
    ///
    /// Panics if `vertex_indices` is empty; a scene without triangles has no
    /// tree. `Scene::new` rejects such meshes before calling this.
    pub fn build(vertex_indices: &[[u32; 3]], positions: &[Vec3]) -> Self {
        assert!(
            !vertex_indices.is_empty(),
            "Cannot build a BVH without triangles"
        );

        let start = Instant::now();
        let builder = Builder::new(vertex_indices, positions);
        let mut ordering: Vec<u32> = (0..vertex_indices.len() as u32).collect();
        let root = builder.build_range(&mut ordering, Axis::X);

        let bvh = Self {
            root,
            triangle_count: vertex_indices.len(),
        };
        log::info!(
            "Built BVH over {} triangles: {} nodes, depth {} in {:?}",
            bvh.triangle_count,
            bvh.node_count(),
            bvh.depth(),
            start.elapsed()
        );
        bvh
    }

    /// Find the nearest hit along the ray that beats `hit.dist`.
    #[inline]
    pub fn intersect(&self, ray: &Ray, hit: &mut Intersection) -> bool {
        self.root.intersect(ray, hit)
    }

    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    /// Number of triangles (and therefore leaves).
    pub fn leaf_count(&self) -> usize {
        self.triangle_count
    }

    /// Total number of nodes, `2 * leaves - 1` for a full binary tree.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Number of levels; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Iterate over `(triangle_id, vertices)` of every leaf, left to right.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![&self.root],
        }
    }
}

/// Depth-first iterator over the leaves of a [`Bvh`].
pub struct Leaves<'a> {
    stack: Vec<&'a BvhNode>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = (usize, &'a [Vec3; 3]);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                BvhNode::Leaf {
                    triangle_id,
                    vertices,
                } => return Some((*triangle_id, vertices)),
                BvhNode::Internal { children, .. } => {
                    self.stack.push(&children[1]);
                    self.stack.push(&children[0]);
                }
            }
        }
        None
    }
}

/// Build-time view of the mesh with per-triangle centroids.
struct Builder<'a> {
    vertex_indices: &'a [[u32; 3]],
    positions: &'a [Vec3],
    /// Midpoint of each triangle's extent on every axis
    centroids: Vec<Vec3>,
}

impl<'a> Builder<'a> {
    fn new(vertex_indices: &'a [[u32; 3]], positions: &'a [Vec3]) -> Self {
        let centroids = vertex_indices
            .iter()
            .map(|tri| {
                let [a, b, c] = tri.map(|i| positions[i as usize]);
                (a.min(b).min(c) + a.max(b).max(c)) * 0.5
            })
            .collect();
        Self {
            vertex_indices,
            positions,
            centroids,
        }
    }

    #[inline]
    fn vertices(&self, triangle: u32) -> [Vec3; 3] {
        self.vertex_indices[triangle as usize].map(|i| self.positions[i as usize])
    }

    #[inline]
    fn key(&self, triangle: u32, axis: Axis) -> f32 {
        self.centroids[triangle as usize][axis.index()]
    }

    /// Build the subtree for one contiguous range of the ordering.
    fn build_range(&self, ordering: &mut [u32], axis: Axis) -> BvhNode {
        if ordering.len() == 1 {
            let triangle = ordering[0];
            return BvhNode::Leaf {
                triangle_id: triangle as usize,
                vertices: self.vertices(triangle),
            };
        }

        let mut bounds = Aabb::EMPTY;
        for &triangle in ordering.iter() {
            for v in self.vertices(triangle) {
                bounds.grow(v);
            }
        }

        let mid = ordering.len() / 2;
        self.partition_at(ordering, mid, axis);

        let (left, right) = ordering.split_at_mut(mid);
        let next = axis.next();
        let children = Box::new([self.build_range(left, next), self.build_range(right, next)]);

        BvhNode::Internal {
            bounds,
            axis,
            children,
        }
    }

    /// Reorder the range so that no centroid before `mid` is greater than
    /// any centroid from `mid` on.
    ///
    /// Quickselect with the middle element as pivot and a three-way
    /// partition; triangles equal to the pivot end the search at once, so
    /// meshes with many coplanar triangles do not degrade.
    fn partition_at(&self, ordering: &mut [u32], mid: usize, axis: Axis) {
        if ordering.len() == 2 {
            if self.key(ordering[1], axis) < self.key(ordering[0], axis) {
                ordering.swap(0, 1);
            }
            return;
        }

        let mut lo = 0;
        let mut hi = ordering.len();
        while hi - lo > 1 {
            let range = &mut ordering[lo..hi];
            let pivot = self.key(range[range.len() / 2], axis);
            let (less, greater) = self.partition3(range, pivot, axis);
            let (less, greater) = (lo + less, lo + greater);

            if mid < less {
                hi = less;
            } else if mid >= greater {
                lo = greater;
            } else {
                break;
            }
        }
    }

    /// Dutch-flag partition around `pivot`: returns `(less, greater)` such
    /// that `[0, less)` is below, `[less, greater)` equal and
    /// `[greater, len)` above the pivot.
    fn partition3(&self, range: &mut [u32], pivot: f32, axis: Axis) -> (usize, usize) {
        let mut less = 0;
        let mut i = 0;
        let mut greater = range.len();

        while i < greater {
            let key = self.key(range[i], axis);
            if key < pivot {
                range.swap(less, i);
                less += 1;
                i += 1;
            } else if key > pivot {
                greater -= 1;
                range.swap(i, greater);
            } else {
                i += 1;
            }
        }
        (less, greater)
    }
}
