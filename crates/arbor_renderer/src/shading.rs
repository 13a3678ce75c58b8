//! Blinn-Phong shading with shadow rays and mirror reflections.

use arbor_core::{Color, HitRecord, Light, MeshCulling, SceneNode, EPSILON};
use arbor_math::{Interval, Ray, Vec3};

use crate::RenderConfig;

/// Everything shading reads during a render.
///
/// Holds shared borrows only, so one shader is used by every worker.
#[derive(Debug, Clone, Copy)]
pub struct Shader<'a> {
    pub root: &'a SceneNode,
    pub ambient: Color,
    pub lights: &'a [Light],
    pub config: &'a RenderConfig,
}

impl<'a> Shader<'a> {
    pub fn new(
        root: &'a SceneNode,
        ambient: Color,
        lights: &'a [Light],
        config: &'a RenderConfig,
    ) -> Self {
        Self {
            root,
            ambient,
            lights,
            config,
        }
    }

    /// Closest hit along `ray` over `ray_t`, in world space.
    pub fn trace(&self, ray: &Ray, ray_t: Interval) -> HitRecord<'a> {
        let culling = MeshCulling {
            volume: self.config.bounding_volume,
            show_volume: self.config.show_bounding_volumes,
        };
        self.root.hit(ray, ray_t, culling)
    }

    /// Colour seen along `ray`, following up to `bounces` mirror reflections.
    pub fn ray_color(&self, ray: &Ray, bounces: u32) -> Color {
        let rec = self.trace(ray, Interval::from_min(EPSILON));
        if rec.hit {
            self.shade(ray, &rec, bounces)
        } else {
            self.config.background.colour(ray)
        }
    }

    /// Whether anything lies strictly between `point` and `target`.
    pub fn occluded(&self, point: Vec3, target: Vec3) -> bool {
        let shadow_ray = Ray::between(point, target);
        self.trace(&shadow_ray, Interval::new(EPSILON, 1.0)).hit
    }

    /// Local illumination at `rec` plus any reflected contribution.
    ///
    /// Dot products are clamped at zero so lights behind the surface add
    /// nothing. A degenerate normal leaves only the ambient term.
    pub fn shade(&self, ray: &Ray, rec: &HitRecord<'_>, bounces: u32) -> Color {
        // Hits come from geometry nodes, which always carry a material
        let Some(material) = rec.material else {
            return Color::ZERO;
        };
        let kd = material.diffuse;
        let ks = material.specular;

        let mut colour = kd * self.ambient;

        let n = rec.normal.normalize_or_zero();
        let p = rec.point + self.config.surface_bias * n;
        let v = (ray.origin() - p).normalize_or_zero();

        for light in self.lights {
            if self.occluded(p, light.position) {
                continue;
            }

            let to_light = light.position - p;
            let l = to_light.normalize_or_zero();
            let h = (v + l).normalize_or_zero();
            let attenuation = light.attenuation(to_light.length());

            let diffuse = kd * n.dot(l).max(0.0);
            // powf(0, 0) is 1, so a zero exponent would light the back side
            let n_dot_h = n.dot(h);
            let specular = if n_dot_h > 0.0 {
                ks * n_dot_h.powf(material.shininess)
            } else {
                Color::ZERO
            };
            colour += (diffuse + specular) * light.colour * attenuation;
        }

        let mix = self.config.reflection_mix;
        if bounces > 0 && material.reflective && mix > 0.0 && n != Vec3::ZERO {
            let reflected = Ray::new(p, reflect(ray.direction().normalize_or_zero(), n));
            let reflected_colour = self.ray_color(&reflected, bounces - 1);
            colour = colour * (1.0 - mix) + reflected_colour * mix;
        }

        colour
    }
}

/// Mirror `d` about the unit normal `n`.
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - 2.0 * d.dot(n) * n
}
