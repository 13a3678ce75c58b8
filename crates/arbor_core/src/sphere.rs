//! Sphere primitive for ray tracing.

use crate::HitRecord;
use arbor_math::{Interval, Ray, Vec3};

/// A sphere in its own local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Radius 1 at the origin; scale it through the scene graph.
    pub fn unit() -> Self {
        Self::new(Vec3::ZERO, 1.0)
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Closest intersection with `t` strictly inside `ray_t`.
    ///
    /// Solves `|o + t*d - c|^2 = r^2` without assuming `d` is unit length.
    /// The returned normal is `p - c`, left unnormalized so its length keeps
    /// following any scaling applied above this primitive.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> HitRecord<'static> {
        let Some((near, far)) = self.roots(ray) else {
            return HitRecord::miss();
        };

        // Entirely behind the ray origin
        if far <= ray_t.min {
            return HitRecord::miss();
        }

        // Prefer the near root; fall back to the far one when the origin
        // sits inside the sphere or on its surface.
        let t = if ray_t.surrounds(near) {
            near
        } else if ray_t.surrounds(far) {
            far
        } else {
            return HitRecord::miss();
        };

        let point = ray.at(t);
        HitRecord::new(t, point, point - self.center)
    }

    /// Whether the part of the ray inside the sphere overlaps `ray_t`.
    ///
    /// Unlike [`Sphere::hit`] this holds when both roots lie outside the
    /// interval but the segment between them crosses it, e.g. a ray that
    /// starts inside the sphere and stops before leaving it.
    pub fn overlaps(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.roots(ray)
            .is_some_and(|(near, far)| far > ray_t.min && near < ray_t.max)
    }

    /// Entry and exit parameters, `near <= far`, or `None` on a miss.
    fn roots(&self, ray: &Ray) -> Option<(f32, f32)> {
        if self.radius <= 0.0 || self.radius.is_nan() {
            return None;
        }

        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        if a == 0.0 || !a.is_finite() {
            return None;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || discriminant.is_nan() {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        Some(((h - sqrtd) / a, (h + sqrtd) / a))
    }
}
