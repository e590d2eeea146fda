use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Grow the box so that it encloses the point.
    pub fn grow(&mut self, p: Vec3) {
        self.x = self.x.include(p.x);
        self.y = self.y.include(p.y);
        self.z = self.z.include(p.z);
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Face coordinate on `axis`: side 0 is the min face, side 1 the max face.
    #[inline]
    pub fn bound(&self, side: usize, axis: usize) -> f32 {
        let interval = self.axis_interval(axis);
        if side == 0 {
            interval.min
        } else {
            interval.max
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// True if the point lies inside or on the boundary of the box.
    pub fn contains(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// Slab test returning the box's entry/exit distances along the ray.
    ///
    /// The ray's sign bits pick which face is the entry face on each axis,
    /// so no swaps are needed. Returns `None` if the box is missed or if the
    /// entry/exit span does not overlap `[ray_t.min, ray_t.max)`.
    ///
    /// Zero direction components produce infinite reciprocals. A ray inside
    /// such a slab gets an unbounded `(-inf, inf)` span on that axis and a ray
    /// outside gets an empty one, so parallel rays are neither wrongly
    /// accepted nor wrongly rejected.
    pub fn hit_interval(&self, ray: &Ray, ray_t: Interval) -> Option<Interval> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let sign = ray.sign[axis];
            let origin = ray.origin[axis];
            let inv = ray.inv_direction[axis];
            let near = (self.bound(sign, axis) - origin) * inv;
            let far = (self.bound(1 - sign, axis) - origin) * inv;

            if t_min > far || near > t_max {
                return None;
            }
            // f32::max/min drop a NaN operand (0 * inf on a face plane)
            t_min = t_min.max(near);
            t_max = t_max.min(far);
        }

        if t_min < ray_t.max && t_max > ray_t.min {
            Some(Interval::new(t_min, t_max))
        } else {
            None
        }
    }

    /// Test if a ray intersects this AABB within `[ray_t.min, ray_t.max)`.
    #[inline]
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.hit_interval(ray, ray_t).is_some()
    }

    /// An empty box; growing it by a point yields that point's box.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
