//! Render configuration.

use std::f32::consts::FRAC_PI_4;
use std::path::Path;

use lumen_math::{Color, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in a render configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{field} must lie in (0, pi/2), got {value}")]
    ViewAngle { field: &'static str, value: f32 },

    #[error("Camera direction and up vector must be non-zero and not parallel")]
    DegenerateCamera,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the renderer needs besides the scene.
///
/// Missing fields in a JSON file take the values from [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Half of the horizontal field of view, in radians
    pub horizontal_view: f32,
    /// Half of the vertical field of view, in radians
    pub vertical_view: f32,

    /// Camera position
    pub position: Vec3,
    /// Viewing direction (need not be normalized)
    pub direction: Vec3,
    /// Up hint; must not be parallel to `direction`
    pub up: Vec3,

    /// Radiance of rays that leave the scene or run out of depth
    pub void_color: Color,

    /// Primary rays per pixel and pass
    pub pixel_samples: u32,
    /// Total recursion depth budget of a primary ray
    pub depth: u32,
    /// Budget consumed by a diffuse bounce
    pub diffuse_depth_cost: u32,
    /// Budget consumed by a specular bounce
    pub specular_depth_cost: u32,
    /// Budget consumed by a transmitted ray
    pub transmission_depth_cost: u32,

    /// Secondary rays per diffuse bounce
    pub diffuse_samples: u32,
    /// Secondary rays per specular bounce
    pub specular_samples: u32,
    /// Secondary rays per transmission event
    pub transmission_samples: u32,

    /// Worker threads; the image is split into this many row bands
    pub threads: usize,
    /// Base seed of the per-band random streams
    pub seed: u64,
    /// Number of progressive passes the CLI runs
    pub passes: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            horizontal_view: FRAC_PI_4,
            vertical_view: FRAC_PI_4,
            position: Vec3::ZERO,
            direction: Vec3::Y,
            up: Vec3::Z,
            void_color: Color::ZERO,
            pixel_samples: 1,
            depth: 8,
            diffuse_depth_cost: 1,
            specular_depth_cost: 2,
            transmission_depth_cost: 1,
            diffuse_samples: 1,
            specular_samples: 1,
            transmission_samples: 1,
            threads: rayon::current_num_threads(),
            seed: 0,
            passes: 1,
        }
    }
}

impl RenderConfig {
    /// Create a configuration for the given resolution and view half-angles.
    pub fn new(width: u32, height: u32, horizontal_view: f32, vertical_view: f32) -> Self {
        Self {
            width,
            height,
            horizontal_view,
            vertical_view,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from JSON text and validate it.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field the renderer relies on.
    ///
    /// Non-zero depth costs are what bound the recursion of the integrator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("width", self.width),
            ("height", self.height),
            ("pixel_samples", self.pixel_samples),
            ("diffuse_depth_cost", self.diffuse_depth_cost),
            ("specular_depth_cost", self.specular_depth_cost),
            ("transmission_depth_cost", self.transmission_depth_cost),
            ("diffuse_samples", self.diffuse_samples),
            ("specular_samples", self.specular_samples),
            ("transmission_samples", self.transmission_samples),
            ("passes", self.passes),
        ];
        if let Some(&(field, _)) = counts.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Zero(field));
        }
        if self.threads == 0 {
            return Err(ConfigError::Zero("threads"));
        }

        for (field, value) in [
            ("horizontal_view", self.horizontal_view),
            ("vertical_view", self.vertical_view),
        ] {
            if !(value > 0.0 && value < std::f32::consts::FRAC_PI_2) {
                return Err(ConfigError::ViewAngle { field, value });
            }
        }

        if self.direction.cross(self.up).length_squared() <= f32::EPSILON {
            return Err(ConfigError::DegenerateCamera);
        }

        Ok(())
    }

    /// Smallest depth cost of any effect.
    pub fn min_depth_cost(&self) -> u32 {
        self.diffuse_depth_cost
            .min(self.specular_depth_cost)
            .min(self.transmission_depth_cost)
    }
}
