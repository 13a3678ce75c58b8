//! Triangle primitive for ray tracing.
//!
//! Solves the 3x3 barycentric system with Cramer's rule for `t`, beta and
//! gamma, where the hit point is `a + beta*(b - a) + gamma*(c - a)`.

use crate::HitRecord;
use arbor_math::{Interval, Ray, Vec3};

/// Slack on the barycentric bounds so hits exactly on an edge or vertex survive
/// rounding.
pub const BARYCENTRIC_EPSILON: f32 = 1e-5;

/// A triangle given by three vertices.
///
/// The winding order decides the direction of the reported normal; it is taken
/// as given from the mesh data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Unnormalized face normal `(b - a) x (c - a)`.
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a)
    }

    /// Closest intersection with `t` strictly inside `ray_t`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> HitRecord<'static> {
        let normal = self.normal();
        // Zero-area triangle
        if normal.length_squared() <= f32::MIN_POSITIVE {
            return HitRecord::miss();
        }

        let [va, vb, vc] = self.vertices;
        let dir = ray.direction();
        let origin = ray.origin();

        // Column 1: a - b
        let (a, b, c) = (va.x - vb.x, va.y - vb.y, va.z - vb.z);
        // Column 2: a - c
        let (d, e, f) = (va.x - vc.x, va.y - vc.y, va.z - vc.z);
        // Column 3: ray direction
        let (g, h, i) = (dir.x, dir.y, dir.z);
        // Right hand side: a - origin
        let (j, k, l) = (va.x - origin.x, va.y - origin.y, va.z - origin.z);

        let ei_minus_hf = e * i - h * f;
        let gf_minus_di = g * f - d * i;
        let dh_minus_eg = d * h - e * g;

        let det = a * ei_minus_hf + b * gf_minus_di + c * dh_minus_eg;
        // Ray parallel to the plane
        if det == 0.0 || !det.is_finite() {
            return HitRecord::miss();
        }
        let inv_det = 1.0 / det;

        let ak_minus_jb = a * k - j * b;
        let jc_minus_al = j * c - a * l;
        let bl_minus_kc = b * l - k * c;

        let t = -(f * ak_minus_jb + e * jc_minus_al + d * bl_minus_kc) * inv_det;
        if !ray_t.surrounds(t) {
            return HitRecord::miss();
        }

        let gamma = (i * ak_minus_jb + h * jc_minus_al + g * bl_minus_kc) * inv_det;
        if !(-BARYCENTRIC_EPSILON..=1.0 + BARYCENTRIC_EPSILON).contains(&gamma) {
            return HitRecord::miss();
        }

        let beta = (j * ei_minus_hf + k * gf_minus_di + l * dh_minus_eg) * inv_det;
        if !(-BARYCENTRIC_EPSILON..=1.0 - gamma + BARYCENTRIC_EPSILON).contains(&beta) {
            return HitRecord::miss();
        }

        HitRecord::new(t, ray.at(t), normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EPSILON;

    fn forward() -> Interval {
        Interval::from_min(EPSILON)
    }

    fn xy_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let rec = xy_triangle().hit(&ray, forward());

        assert!(rec.hit);
        assert!((rec.t - 5.0).abs() < 1e-5);
        assert!(rec.point.length() < 1e-5);
        // Counter-clockwise winding seen from +z
        assert!(rec.normal.z > 0.0);
    }

    #[test]
    fn test_triangle_miss() {
        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(!xy_triangle().hit(&ray, forward()).hit);
    }

    #[test]
    fn test_ray_through_vertex_is_accepted() {
        for vertex in xy_triangle().vertices {
            let ray = Ray::new(vertex + Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
            let rec = xy_triangle().hit(&ray, forward());
            assert!(rec.hit, "vertex {vertex:?} should be hit");
            assert!((rec.t - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ray_just_outside_edge_is_rejected() {
        // Bottom edge runs along y = -1
        let ray = Ray::new(Vec3::new(0.0, -1.01, 5.0), Vec3::NEG_Z);
        assert!(!xy_triangle().hit(&ray, forward()).hit);

        // Just beyond the right-hand edge from (1,-1) to (0,1)
        let ray = Ray::new(Vec3::new(0.51, 0.0, 5.0), Vec3::NEG_Z);
        assert!(!xy_triangle().hit(&ray, forward()).hit);

        // Just inside the same edge
        let ray = Ray::new(Vec3::new(0.49, 0.0, 5.0), Vec3::NEG_Z);
        assert!(xy_triangle().hit(&ray, forward()).hit);
    }

    #[test]
    fn test_t_outside_interval_is_rejected() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(!xy_triangle().hit(&ray, Interval::new(EPSILON, 4.0)).hit);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(!xy_triangle().hit(&ray, forward()).hit);
    }

    #[test]
    fn test_degenerate_triangle_fails_closed() {
        let sliver = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0));
        let ray = Ray::new(Vec3::new(0.5, 0.0, 5.0), Vec3::NEG_Z);
        assert!(!sliver.hit(&ray, forward()).hit);
    }
}
