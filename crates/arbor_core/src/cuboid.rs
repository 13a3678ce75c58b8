//! Axis-aligned box primitive.

use crate::HitRecord;
use arbor_math::{Interval, Ray, Vec3};

/// An axis-aligned box given by its minimum corner and extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    min: Vec3,
    size: Vec3,
}

impl Cuboid {
    pub fn new(min: Vec3, size: Vec3) -> Self {
        Self { min, size }
    }

    /// A cube with edge length `edge` and minimum corner `min`.
    pub fn cube(min: Vec3, edge: f32) -> Self {
        Self::new(min, Vec3::splat(edge))
    }

    /// The unit cube spanning `[0, 1]` on every axis.
    pub fn unit() -> Self {
        Self::cube(Vec3::ZERO, 1.0)
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.min + self.size
    }

    /// Closest intersection with `t` strictly inside `ray_t`.
    ///
    /// Slab method that remembers which face produced the entry and exit
    /// parameters. When the entry lies at or behind `ray_t.min` (the origin is
    /// inside the box) the exit is reported with the far face's outward
    /// normal.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> HitRecord<'static> {
        if !self.size.cmpgt(Vec3::ZERO).all() {
            return HitRecord::miss();
        }
        let max = self.max();

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut n_enter = Vec3::ZERO;
        let mut n_exit = Vec3::ZERO;

        for (axis, axis_normal) in Vec3::AXES.into_iter().enumerate() {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];

            // Parallel to this slab: inside it for every t, or never.
            if dir == 0.0 {
                if origin < self.min[axis] || origin > max[axis] {
                    return HitRecord::miss();
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (self.min[axis] - origin) * inv;
            let mut t1 = (max[axis] - origin) * inv;
            let mut n0 = -axis_normal;
            let mut n1 = axis_normal;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
                std::mem::swap(&mut n0, &mut n1);
            }

            if t0 > t_enter {
                t_enter = t0;
                n_enter = n0;
            }
            if t1 < t_exit {
                t_exit = t1;
                n_exit = n1;
            }
            if t_exit <= t_enter || t_exit.is_nan() {
                return HitRecord::miss();
            }
        }

        if t_exit <= ray_t.min {
            return HitRecord::miss();
        }

        let (t, normal) = if t_enter > ray_t.min {
            (t_enter, n_enter)
        } else {
            (t_exit, n_exit)
        };
        if !ray_t.surrounds(t) {
            return HitRecord::miss();
        }

        HitRecord::new(t, ray.at(t), normal)
    }
}
