//! Arbor Renderer - parallel Blinn-Phong ray tracing of Arbor scene graphs.
//!
//! Primary rays come from a pinhole [`Camera`], are intersected with the
//! scene graph, and are shaded with shadow rays per light and optional
//! mirror reflections. Rendering splits the image into column ranges traced
//! in parallel on a rayon pool.

mod buffer;
mod camera;
mod chunk;
mod config;
mod error;
mod renderer;
mod shading;

pub use buffer::{Channel, Image};
pub use camera::{device_to_world, Camera};
pub use chunk::{chunk_width, column_chunks};
pub use config::{Background, RenderConfig, DUSK_COLOUR, ZENITH_COLOUR};
pub use error::RenderError;
pub use renderer::{render, render_pixel, render_with_progress, Progress, RenderStats};
pub use shading::{reflect, Shader};

/// Re-export common math types from arbor_math
pub use arbor_math::{Mat4, Vec3};
