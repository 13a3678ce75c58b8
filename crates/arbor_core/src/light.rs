//! Point lights.

use arbor_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::Color;

/// A point light in world space with quadratic falloff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub colour: Color,
    /// Attenuation coefficients `[c0, c1, c2]` of `c0 + c1*d + c2*d^2`
    pub falloff: [f32; 3],
}

impl Light {
    pub fn new(position: Vec3, colour: Color, falloff: [f32; 3]) -> Self {
        Self {
            position,
            colour,
            falloff,
        }
    }

    /// A light whose intensity does not fall off with distance.
    pub fn unattenuated(position: Vec3, colour: Color) -> Self {
        Self::new(position, colour, [1.0, 0.0, 0.0])
    }

    /// Scale factor `1 / (c0 + c1*d + c2*d^2)` at distance `d`.
    ///
    /// A denominator that is not strictly positive (or not finite) yields 1.
    pub fn attenuation(&self, distance: f32) -> f32 {
        let [c0, c1, c2] = self.falloff;
        let denom = c0 + c1 * distance + c2 * distance * distance;
        if denom > 0.0 && denom.is_finite() {
            1.0 / denom
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_falloff() {
        let light = Light::unattenuated(Vec3::splat(10.0), Color::ONE);
        assert_eq!(light.attenuation(0.0), 1.0);
        assert_eq!(light.attenuation(100.0), 1.0);
    }

    #[test]
    fn test_quadratic_falloff() {
        let light = Light::new(Vec3::ZERO, Color::ONE, [1.0, 0.5, 0.25]);
        // 1 + 0.5*2 + 0.25*4 = 3
        assert!((light.attenuation(2.0) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_falloff_is_ignored() {
        let light = Light::new(Vec3::ZERO, Color::ONE, [0.0, 0.0, 0.0]);
        assert_eq!(light.attenuation(5.0), 1.0);

        let light = Light::new(Vec3::ZERO, Color::ONE, [-1.0, 0.0, 0.0]);
        assert_eq!(light.attenuation(5.0), 1.0);
    }
}
