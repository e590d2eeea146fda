//! Pinhole camera for primary ray generation.

use lumen_math::{Mat3, Ray, Vec3};
use rand::Rng;

use crate::RenderConfig;

/// Pinhole camera derived from a [`RenderConfig`].
///
/// The basis columns are right, down and forward, so screen coordinates
/// grow to the right and towards the bottom of the image, matching the
/// row-major pixel layout with row 0 at the top.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vec3,
    basis: Mat3,
    horizontal_scale: f32,
    vertical_scale: f32,
    width: f32,
    height: f32,
}

impl Camera {
    pub fn new(config: &RenderConfig) -> Self {
        let forward = config.direction.normalize();
        let right = forward.cross(config.up).normalize();
        let down = forward.cross(right).normalize();

        Self {
            position: config.position,
            basis: Mat3::from_cols(right, down, forward),
            horizontal_scale: config.horizontal_view.tan(),
            vertical_scale: config.vertical_view.tan(),
            width: config.width as f32,
            height: config.height as f32,
        }
    }

    /// Ray through the point `(x + jx, y + jy)` of the image plane, where
    /// `(jx, jy)` is the offset inside the pixel.
    pub fn ray(&self, x: u32, y: u32, jx: f32, jy: f32) -> Ray {
        let sx = (2.0 * (x as f32 + jx) / self.width - 1.0) * self.horizontal_scale;
        let sy = (2.0 * (y as f32 + jy) / self.height - 1.0) * self.vertical_scale;
        Ray::new(self.position, self.basis * Vec3::new(sx, sy, 1.0))
    }

    /// Ray through a uniformly jittered point of pixel `(x, y)`.
    pub fn primary_ray<R: Rng + ?Sized>(&self, x: u32, y: u32, rng: &mut R) -> Ray {
        let jx: f32 = rng.gen();
        let jy: f32 = rng.gen();
        self.ray(x, y, jx, jy)
    }
}
