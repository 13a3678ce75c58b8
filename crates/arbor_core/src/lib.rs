//! Arbor Core - scene graph, primitives and materials for the Arbor ray tracer.
//!
//! This crate provides:
//!
//! - **Primitives**: `Sphere`, `Cuboid`, `Triangle` and `Mesh`, intersected in
//!   their own local frame
//! - **Scene graph**: `SceneNode` trees with per-node transforms and joints
//! - **Shading inputs**: `PhongMaterial` and point `Light`s
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use arbor_core::{BoundingVolume, PhongMaterial, Primitive, SceneNode, EPSILON};
//! use arbor_math::{Interval, Ray, Vec3};
//!
//! let mut ball = SceneNode::geometry(
//!     "ball",
//!     Primitive::unit_sphere(),
//!     Arc::new(PhongMaterial::default()),
//! );
//! ball.translate(Vec3::new(0.0, 0.0, -5.0))?;
//!
//! let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
//! let rec = ball.hit(&ray, Interval::from_min(EPSILON), BoundingVolume::Box);
//! assert_eq!(rec.node, Some("ball"));
//! # Ok::<(), arbor_core::SceneError>(())
//! ```

pub mod cuboid;
pub mod error;
pub mod hittable;
pub mod light;
pub mod material;
pub mod mesh;
pub mod primitive;
pub mod scene;
pub mod sphere;
pub mod triangle;

// Re-export commonly used types
pub use cuboid::Cuboid;
pub use error::{SceneError, SceneResult};
pub use hittable::{HitRecord, EPSILON};
pub use light::Light;
pub use material::{Color, PhongMaterial};
pub use mesh::Mesh;
pub use primitive::{BoundingVolume, MeshCulling, Primitive};
pub use scene::{Axis, Joint, JointRange, NodeKind, SceneNode};
pub use sphere::Sphere;
pub use triangle::{Triangle, BARYCENTRIC_EPSILON};
