use crate::{Mat4, Vec3};

/// A ray in 3D space with an origin point and a direction vector.
///
/// The direction is never normalized implicitly. The parameter `t` of
/// [`Ray::at`] is always a multiple of the stored direction, which keeps `t`
/// identical when the ray is carried into another coordinate frame by an
/// affine transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray starting at `origin` that reaches `target` at `t = 1`.
    pub fn between(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Get the origin point of the ray.
    ///
    /// Note: Since `origin` is public, you can also access it directly via `ray.origin`.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    ///
    /// Note: Since `direction` is public, you can also access it directly via `ray.direction`.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Carry the ray into another frame.
    ///
    /// The origin is transformed as a point (w=1) and the direction as a
    /// vector (w=0). The direction is left unnormalized.
    #[inline]
    pub fn transformed(&self, m: &Mat4) -> Ray {
        Ray::new(m.transform_point3(self.origin), m.transform_vector3(self.direction))
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}
