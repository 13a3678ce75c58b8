//! HitRecord for ray-object intersection.

use std::cmp::Ordering;

use crate::PhongMaterial;
use arbor_math::Vec3;

/// Lower bound of the ray interval for primary, shadow and reflection rays.
///
/// Every primitive rejects intersections at or below it, which keeps a ray
/// from re-hitting the surface it starts on.
pub const EPSILON: f32 = 1e-4;

/// Record of a ray-object intersection.
///
/// A miss has `hit == false` and `t == f32::INFINITY`. The normal and point
/// are expressed in whichever frame the record was produced in; the scene
/// graph carries them back to world space as the traversal unwinds.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Whether anything was hit
    pub hit: bool,
    /// Ray parameter of the closest intersection found so far
    pub t: f32,
    /// Surface normal, not normalized
    pub normal: Vec3,
    /// Point of intersection
    pub point: Vec3,
    /// Material of the surface that was hit
    pub material: Option<&'a PhongMaterial>,
    /// Name of the geometry node that was hit
    pub node: Option<&'a str>,
}

impl<'a> HitRecord<'a> {
    /// A record for a ray that hit nothing.
    pub fn miss() -> Self {
        Self {
            hit: false,
            t: f32::INFINITY,
            normal: Vec3::ZERO,
            point: Vec3::ZERO,
            material: None,
            node: None,
        }
    }

    /// A hit at parameter `t` without material information.
    pub fn new(t: f32, point: Vec3, normal: Vec3) -> Self {
        Self {
            hit: true,
            t,
            normal,
            point,
            material: None,
            node: None,
        }
    }

    /// Order two records by `t`; `None` unless both are hits.
    pub fn compare(&self, other: &HitRecord<'_>) -> Option<Ordering> {
        if self.hit && other.hit {
            self.t.partial_cmp(&other.t)
        } else {
            None
        }
    }

    /// Whether this record is a hit strictly closer than `other`.
    ///
    /// Any hit is closer than a miss.
    pub fn is_closer_than(&self, other: &HitRecord<'_>) -> bool {
        self.hit && (!other.hit || self.t < other.t)
    }
}

impl Default for HitRecord<'_> {
    fn default() -> Self {
        Self::miss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_record() {
        let rec = HitRecord::miss();
        assert!(!rec.hit);
        assert_eq!(rec.t, f32::INFINITY);
        assert!(rec.material.is_none());
    }

    #[test]
    fn test_compare_only_between_hits() {
        let near = HitRecord::new(1.0, Vec3::ZERO, Vec3::Z);
        let far = HitRecord::new(2.0, Vec3::ZERO, Vec3::Z);
        let miss = HitRecord::miss();

        assert_eq!(near.compare(&far), Some(Ordering::Less));
        assert_eq!(far.compare(&near), Some(Ordering::Greater));
        assert_eq!(near.compare(&miss), None);
        assert_eq!(miss.compare(&miss), None);
    }

    #[test]
    fn test_is_closer_than() {
        let near = HitRecord::new(1.0, Vec3::ZERO, Vec3::Z);
        let far = HitRecord::new(2.0, Vec3::ZERO, Vec3::Z);
        let miss = HitRecord::miss();

        assert!(near.is_closer_than(&far));
        assert!(!far.is_closer_than(&near));
        assert!(far.is_closer_than(&miss));
        assert!(!miss.is_closer_than(&far));
    }
}
