//! Geometric primitives attached to geometry nodes.

use arbor_math::{Interval, Ray, Vec3};
use serde::{Deserialize, Serialize};

use crate::{Cuboid, HitRecord, Mesh, Sphere};

/// Volume tested before a mesh's triangles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundingVolume {
    /// Test every triangle
    None,
    /// Axis-aligned box around the vertices
    #[default]
    Box,
    /// Sphere around the vertex bounding box
    Sphere,
}

/// How meshes use their bounding volume during intersection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshCulling {
    /// Volume tested before the triangles
    pub volume: BoundingVolume,
    /// Report the bounding volume's own surface instead of the triangles.
    /// Has no effect with [`BoundingVolume::None`].
    pub show_volume: bool,
}

impl From<BoundingVolume> for MeshCulling {
    fn from(volume: BoundingVolume) -> Self {
        Self {
            volume,
            show_volume: false,
        }
    }
}

/// A primitive in the local frame of its geometry node.
#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere(Sphere),
    Cuboid(Cuboid),
    Mesh(Mesh),
}

impl Primitive {
    /// Unit sphere at the origin.
    pub fn unit_sphere() -> Self {
        Self::Sphere(Sphere::unit())
    }

    /// Unit cube spanning `[0, 1]^3`.
    pub fn unit_cube() -> Self {
        Self::Cuboid(Cuboid::unit())
    }

    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere(Sphere::new(center, radius))
    }

    pub fn cuboid(min: Vec3, size: Vec3) -> Self {
        Self::Cuboid(Cuboid::new(min, size))
    }

    /// Closest intersection with `t` strictly inside `ray_t`.
    ///
    /// `culling` only affects meshes.
    pub fn hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        culling: impl Into<MeshCulling>,
    ) -> HitRecord<'static> {
        match self {
            Primitive::Sphere(sphere) => sphere.hit(ray, ray_t),
            Primitive::Cuboid(cuboid) => cuboid.hit(ray, ray_t),
            Primitive::Mesh(mesh) => mesh.hit(ray, ray_t, culling),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

impl From<Cuboid> for Primitive {
    fn from(cuboid: Cuboid) -> Self {
        Self::Cuboid(cuboid)
    }
}

impl From<Mesh> for Primitive {
    fn from(mesh: Mesh) -> Self {
        Self::Mesh(mesh)
    }
}
