// Transform utilities for Mat4
//
// Extends glam::Mat4 with the pieces hierarchical ray tracing needs on top of
// transform_point3()/transform_vector3(): a checked inverse and the normal
// matrix.

use glam::{Mat3, Mat4, Vec3};

/// Smallest |determinant| accepted by [`Mat4Ext::try_inverse`].
const MIN_DETERMINANT: f32 = 1e-12;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Inverse of the matrix, or `None` when it is singular or not finite.
    fn try_inverse(&self) -> Option<Mat4>;

    /// Matrix that carries surface normals through this transform.
    ///
    /// Call it on the *inverse* of the geometry transform: the result is the
    /// transpose of the upper 3x3 block, which keeps normals perpendicular to
    /// surfaces under non-uniform scaling.
    fn normal_matrix(&self) -> Mat3;

    /// Transform a normal with [`Mat4Ext::normal_matrix`]. Not normalized.
    fn transform_normal(&self, normal: Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn try_inverse(&self) -> Option<Mat4> {
        if !self.is_finite() {
            return None;
        }
        let det = self.determinant();
        if !det.is_finite() || det.abs() < MIN_DETERMINANT {
            return None;
        }
        let inverse = self.inverse();
        inverse.is_finite().then_some(inverse)
    }

    fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(*self).transpose()
    }

    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.normal_matrix() * normal
    }
}
