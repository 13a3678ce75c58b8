//! Pinhole camera and the device-to-world pixel mapping.

use arbor_math::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::RenderError;

/// Distance from the eye to the image plane.
const FOCAL_DISTANCE: f32 = 1.0;

/// Camera for generating primary rays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Eye position in world space
    pub eye: Vec3,
    /// Viewing direction; need not be unit length
    pub view: Vec3,
    /// Approximate up direction
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fovy: f32,
}

impl Camera {
    pub fn new(eye: Vec3, view: Vec3, up: Vec3, fovy: f32) -> Self {
        Self {
            eye,
            view,
            up,
            fovy,
        }
    }

    /// Camera at `eye` looking towards `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3, fovy: f32) -> Self {
        Self::new(eye, target - eye, up, fovy)
    }

    /// Check that the camera spans a proper basis and a usable field of view.
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.eye.is_finite() && self.view.is_finite() && self.up.is_finite()) {
            return Err(RenderError::InvalidCamera(
                "eye, view and up must be finite".to_string(),
            ));
        }
        if self.view.length_squared() == 0.0 {
            return Err(RenderError::InvalidCamera(
                "view direction is zero".to_string(),
            ));
        }
        if self.up.cross(self.view).length_squared() == 0.0 {
            return Err(RenderError::InvalidCamera(
                "up is parallel to the view direction".to_string(),
            ));
        }
        if !(self.fovy > 0.0 && self.fovy < 180.0) {
            return Err(RenderError::InvalidCamera(format!(
                "fovy must be in (0, 180) degrees, got {}",
                self.fovy
            )));
        }
        Ok(())
    }

    /// Matrix taking pixel coordinates `(x, y, 0, 1)` of a `width` x `height`
    /// image to points on the image plane in world space.
    pub fn device_to_world(&self, width: u32, height: u32) -> Mat4 {
        device_to_world(width, height, self.eye, self.view, self.up, self.fovy)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, Vec3::Y, 60.0)
    }
}

/// Build the pixel-to-world matrix `T_eye * R * S * T_pixel`.
///
/// - `T_pixel` centers pixel coordinates on the view axis and pushes them to
///   the focal distance.
/// - `S` converts pixels to world units. Both axes are negated: pixel rows
///   grow downwards and the basis below is left-handed in x.
/// - `R` places the basis `u = up x w`, `v = w x u`, `w = view` in its columns.
/// - `T_eye` moves the plane in front of the eye.
///
/// A primary ray runs from the eye through the transformed pixel point.
pub fn device_to_world(width: u32, height: u32, eye: Vec3, view: Vec3, up: Vec3, fovy: f32) -> Mat4 {
    let nx = width as f32;
    let ny = height as f32;

    let plane_height = 2.0 * FOCAL_DISTANCE * (fovy.to_radians() / 2.0).tan();
    let plane_width = (nx / ny) * plane_height;

    let t_pixel = Mat4::from_translation(Vec3::new(-nx / 2.0, -ny / 2.0, FOCAL_DISTANCE));
    let s = Mat4::from_scale(Vec3::new(-plane_width / nx, -plane_height / ny, 1.0));

    let w = view.normalize();
    let u = up.cross(w).normalize();
    let v = w.cross(u);
    let r = Mat4::from_cols(u.extend(0.0), v.extend(0.0), w.extend(0.0), Vec4::W);

    let t_eye = Mat4::from_translation(eye);

    t_eye * r * s * t_pixel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_parallel(a: Vec3, b: Vec3) {
        let (a, b) = (a.normalize(), b.normalize());
        assert!((a - b).length() < 1e-5, "{a:?} is not parallel to {b:?}");
    }

    #[test]
    fn test_center_pixel_looks_down_view_axis() {
        let camera = Camera::default();
        let m = camera.device_to_world(100, 100);

        let p = m.transform_point3(Vec3::new(50.0, 50.0, 0.0));
        assert!((p - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
        assert_parallel(p - camera.eye, camera.view);
    }

    #[test]
    fn test_image_axes_map_to_world_axes() {
        let camera = Camera::default();
        let m = camera.device_to_world(100, 100);
        let center = m.transform_point3(Vec3::new(50.0, 50.0, 0.0));

        // Columns grow to the right, rows grow downwards
        let right = m.transform_point3(Vec3::new(100.0, 50.0, 0.0)) - center;
        let down = m.transform_point3(Vec3::new(50.0, 100.0, 0.0)) - center;
        assert_parallel(right, Vec3::X);
        assert_parallel(down, Vec3::NEG_Y);
    }

    #[test]
    fn test_field_of_view_spans_image_height() {
        let camera = Camera::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 90.0);
        let m = camera.device_to_world(200, 100);

        // tan(45) = 1: the top edge sits one unit above the axis
        let top = m.transform_point3(Vec3::new(100.0, 0.0, 0.0));
        assert!((top - Vec3::new(0.0, 1.0, -1.0)).length() < 1e-5);

        // Square pixels: the side edge is twice as far out
        let side = m.transform_point3(Vec3::new(200.0, 50.0, 0.0));
        assert!((side - Vec3::new(2.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_oblique_camera_basis() {
        let camera = Camera::look_at(Vec3::new(3.0, 2.0, 1.0), Vec3::ZERO, Vec3::Y, 45.0);
        let m = camera.device_to_world(64, 48);

        let center = m.transform_point3(Vec3::new(32.0, 24.0, 0.0));
        assert_parallel(center - camera.eye, -camera.eye);
        assert!(((center - camera.eye).length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_validate() {
        assert!(Camera::default().validate().is_ok());

        let mut camera = Camera::default();
        camera.up = Vec3::new(0.0, 0.0, 2.0);
        assert!(matches!(camera.validate(), Err(RenderError::InvalidCamera(_))));

        let mut camera = Camera::default();
        camera.fovy = 180.0;
        assert!(camera.validate().is_err());

        let mut camera = Camera::default();
        camera.view = Vec3::ZERO;
        assert!(camera.validate().is_err());

        let mut camera = Camera::default();
        camera.eye.x = f32::NAN;
        assert!(camera.validate().is_err());
    }
}
