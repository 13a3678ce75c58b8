//! Phong surface description.

use arbor_math::Vec3;
use serde::{Deserialize, Serialize};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Phong reflectance parameters.
///
/// Immutable once built and shared by `Arc` between every geometry node that
/// uses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhongMaterial {
    /// Diffuse color (kd)
    pub diffuse: Color,
    /// Specular color (ks)
    pub specular: Color,
    /// Phong exponent
    pub shininess: f32,
    /// Whether mirror reflections are traced off this surface.
    #[serde(default = "default_reflective")]
    pub reflective: bool,
}

fn default_reflective() -> bool {
    true
}

impl PhongMaterial {
    pub fn new(diffuse: Color, specular: Color, shininess: f32) -> Self {
        Self {
            diffuse,
            specular,
            shininess,
            reflective: true,
        }
    }

    /// Mark the surface as (non-)reflective, e.g. for a flat ground plane.
    pub fn with_reflective(mut self, reflective: bool) -> Self {
        self.reflective = reflective;
        self
    }
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self::new(Color::splat(0.5), Color::ZERO, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_reflective() {
        let mat = PhongMaterial::new(Color::new(0.7, 0.1, 0.1), Color::splat(0.5), 25.0);
        assert!(mat.reflective);
        assert!(!mat.with_reflective(false).reflective);
    }

    #[test]
    fn test_deserialize_defaults_reflective() {
        let json = r#"{"diffuse":[0.1,0.2,0.3],"specular":[0.5,0.5,0.5],"shininess":10.0}"#;
        let mat: PhongMaterial = serde_json::from_str(json).expect("valid material");

        assert_eq!(mat.diffuse, Color::new(0.1, 0.2, 0.3));
        assert_eq!(mat.shininess, 10.0);
        assert!(mat.reflective);
    }
}
