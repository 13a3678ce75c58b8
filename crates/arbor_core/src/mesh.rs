//! Triangle mesh primitive.
//!
//! A mesh is a triangle soup in its own local frame. The bounding box and
//! bounding sphere are derived from the vertex extents once at construction
//! and used to reject rays before any triangle is tested.

use arbor_math::{Aabb, Interval, Ray, Vec3};

use crate::error::{SceneError, SceneResult};
use crate::{BoundingVolume, Cuboid, HitRecord, MeshCulling, Sphere, Triangle};

/// A mesh consisting of vertex positions and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    positions: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
    bounds: Aabb,
    bounding_sphere: Sphere,
}

impl Mesh {
    /// Create a mesh from positions and faces (three vertex indices each).
    ///
    /// Every face index must refer to an existing position.
    pub fn new(positions: Vec<Vec3>, faces: Vec<[u32; 3]>) -> SceneResult<Self> {
        let vertex_count = positions.len();
        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(SceneError::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        let bounds = Aabb::enclosing(&positions);
        let bounding_sphere = if bounds.is_empty() {
            Sphere::new(Vec3::ZERO, 0.0)
        } else {
            Sphere::new(bounds.centroid(), bounds.diagonal().length() * 0.5)
        };

        log::debug!(
            "Mesh: {} vertices, {} faces, bounds {:?}",
            vertex_count,
            faces.len(),
            bounds
        );

        Ok(Self {
            positions,
            faces,
            bounds,
            bounding_sphere,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Bounding box of the vertex extents.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Sphere around the bounding box: centered on it, half its diagonal wide.
    pub fn bounding_sphere(&self) -> Sphere {
        self.bounding_sphere
    }

    /// Triangle for face `index`.
    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let [a, b, c] = *self.faces.get(index)?;
        Some(Triangle::new(
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ))
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(|&[a, b, c]| {
            Triangle::new(
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[c as usize],
            )
        })
    }

    /// Closest triangle hit with `t` strictly inside `ray_t`.
    ///
    /// The bounding volume (if any) is tested first, and the mesh is skipped
    /// when the part of the ray inside the volume does not overlap `ray_t`.
    /// Every triangle is then scanned; the upper bound of the interval shrinks
    /// to each accepted hit so only strictly closer triangles can replace it.
    ///
    /// With `show_volume` set the volume's own surface is returned instead.
    pub fn hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        culling: impl Into<MeshCulling>,
    ) -> HitRecord<'static> {
        if self.faces.is_empty() {
            return HitRecord::miss();
        }

        let culling = culling.into();
        if culling.show_volume {
            match culling.volume {
                BoundingVolume::None => {}
                BoundingVolume::Box => return self.bounding_box().hit(ray, ray_t),
                BoundingVolume::Sphere => return self.bounding_sphere.hit(ray, ray_t),
            }
        }

        let culled = match culling.volume {
            BoundingVolume::None => false,
            BoundingVolume::Box => !self.bounds.hit(ray, ray_t),
            BoundingVolume::Sphere => !self.bounding_sphere.overlaps(ray, ray_t),
        };
        if culled {
            return HitRecord::miss();
        }

        let mut closest = HitRecord::miss();
        let mut interval = ray_t;
        for triangle in self.triangles() {
            let rec = triangle.hit(ray, interval);
            if rec.hit {
                interval = interval.with_max(rec.t);
                closest = rec;
            }
        }

        closest
    }

    fn bounding_box(&self) -> Cuboid {
        Cuboid::new(self.bounds.min(), self.bounds.diagonal())
    }
}
