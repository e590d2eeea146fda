//! Lumen Renderer - CPU path tracing
//!
//! A Monte Carlo path tracer over a BVH-accelerated triangle scene:
//!
//! - **Integrator**: recursive transport with a per-ray depth budget
//! - **Scheduler**: one worker thread per horizontal row band
//! - **Progressive driver**: passes folded into a running average
//! - **Output**: floating point buffer encoded through the `image` crate
//!
//! # Example
//!
//! ```ignore
//! use lumen_renderer::{ProgressiveRenderer, RenderConfig};
//!
//! let scene = lumen_core::load_obj("scene.obj")?;
//! let mut renderer = ProgressiveRenderer::new(RenderConfig::default())?;
//! renderer.step(&scene)?;
//! renderer.image().save("out.png")?;
//! ```

mod bands;
mod camera;
mod config;
mod error;
pub mod image;
mod integrator;
mod progressive;

pub use bands::{render_pass, row_bands};
pub use camera::Camera;
pub use config::{ConfigError, RenderConfig};
pub use error::RenderError;
pub use crate::image::{color_to_rgb, ImageBuffer};
pub use integrator::{schlick, TraceStats, Tracer};
pub use progressive::ProgressiveRenderer;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Color, Vec3};
