//! Render setup errors.

use thiserror::Error;

/// Errors that stop a render before any pixel is traced.
///
/// Once workers start a render always completes; per-ray problems are
/// absorbed as misses or clamped values.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid render config: {0}")]
    InvalidConfig(String),

    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
