//! Render configuration.

use arbor_core::{BoundingVolume, Color};
use arbor_math::Ray;
use serde::{Deserialize, Serialize};

use crate::RenderError;

/// Sky colour straight up.
pub const ZENITH_COLOUR: Color = Color::new(0.0, 0.0, 0.35);

/// Sky colour at and below the horizon.
pub const DUSK_COLOUR: Color = Color::new(0.902, 0.514, 0.071);

/// Colour returned for rays that hit nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// The same colour in every direction
    Solid(Color),
    /// Blend from `horizon` (pointing down) to `zenith` (pointing up)
    Gradient { zenith: Color, horizon: Color },
}

impl Default for Background {
    fn default() -> Self {
        Background::Gradient {
            zenith: ZENITH_COLOUR,
            horizon: DUSK_COLOUR,
        }
    }
}

impl Background {
    /// Colour seen along `ray`.
    pub fn colour(&self, ray: &Ray) -> Color {
        match *self {
            Background::Solid(colour) => colour,
            Background::Gradient { zenith, horizon } => {
                let unit_direction = ray.direction().normalize_or_zero();
                let a = 0.5 * (unit_direction.y + 1.0);
                horizon * (1.0 - a) + zenith * a
            }
        }
    }
}

/// Options for a single render.
///
/// Immutable for the duration of the render; every worker reads the same
/// copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel axis; each pixel averages `n * n` samples
    pub supersample_factor: u32,
    /// Volume tested before a mesh's triangles
    pub bounding_volume: BoundingVolume,
    /// Draw mesh bounding volumes in place of the meshes, for debugging
    pub show_bounding_volumes: bool,
    /// Mirror reflection depth; 0 disables reflections
    pub max_reflection_bounces: u32,
    /// Weight of the reflected colour in `[0, 1]`
    pub reflection_mix: f32,
    /// Worker threads; `None` uses one per logical CPU
    pub worker_count: Option<usize>,
    /// Distance secondary rays start above the surface, along its normal
    pub surface_bias: f32,
    /// Colour of rays that escape the scene
    pub background: Background,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            supersample_factor: 1,
            bounding_volume: BoundingVolume::Box,
            show_bounding_volumes: false,
            max_reflection_bounces: 0,
            reflection_mix: 0.25,
            worker_count: None,
            surface_bias: 0.005,
            background: Background::default(),
        }
    }
}

impl RenderConfig {
    /// Check the options before a render starts.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.supersample_factor == 0 {
            return Err(RenderError::InvalidConfig(
                "supersample_factor must be at least 1".to_string(),
            ));
        }
        if self.worker_count == Some(0) {
            return Err(RenderError::InvalidConfig(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reflection_mix) {
            return Err(RenderError::InvalidConfig(format!(
                "reflection_mix must be in [0, 1], got {}",
                self.reflection_mix
            )));
        }
        if !self.surface_bias.is_finite() || self.surface_bias < 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "surface_bias must be finite and non-negative, got {}",
                self.surface_bias
            )));
        }
        Ok(())
    }

    /// Number of workers a render with this config uses.
    pub fn workers(&self) -> usize {
        self.worker_count.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Sub-pixel sample offsets along one axis.
    ///
    /// Factor `n` places samples at the centers of an `n x n` grid over the
    /// pixel, `(i + 0.5) / n - 0.5`. Factor 1 samples the pixel coordinate
    /// itself.
    pub fn subpixel_offsets(&self) -> Vec<f32> {
        let n = self.supersample_factor.max(1);
        (0..n)
            .map(|i| (i as f32 + 0.5) / n as f32 - 0.5)
            .collect()
    }
}
