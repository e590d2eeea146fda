use thiserror::Error;

use crate::ConfigError;

/// Errors that can occur while rendering or saving an image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Image buffer holds {actual} pixels but {expected} were requested")]
    BufferSize { expected: usize, actual: usize },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
