//! Hierarchical scene graph.
//!
//! Every node owns a local transform relative to its parent plus the inverse
//! and normal matrix derived from it. Rays are carried down the tree into each
//! node's local frame; hit points and normals are carried back up on return,
//! so the world-to-local transform accumulated along a path is never stored.

use std::sync::Arc;

use arbor_math::{Interval, Mat3, Mat4, Mat4Ext, Ray, Vec3};

use crate::error::{SceneError, SceneResult};
use crate::{HitRecord, MeshCulling, PhongMaterial, Primitive};

/// Rotation axis for [`SceneNode::rotate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    fn label(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

/// Allowed rotation about one joint axis, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointRange {
    pub min: f32,
    pub init: f32,
    pub max: f32,
}

impl JointRange {
    pub fn new(min: f32, init: f32, max: f32) -> Self {
        Self { min, init, max }
    }

    /// A joint that cannot rotate about this axis.
    pub fn fixed() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    fn is_valid(&self) -> bool {
        [self.min, self.init, self.max].iter().all(|v| v.is_finite())
            && self.min <= self.init
            && self.init <= self.max
    }
}

/// Joint state: the ranges and the rotation accumulated so far on each axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    x: JointRange,
    y: JointRange,
    x_angle: f32,
    y_angle: f32,
}

impl Joint {
    pub fn x_range(&self) -> JointRange {
        self.x
    }

    pub fn y_range(&self) -> JointRange {
        self.y
    }

    /// Accumulated rotation about x, in degrees.
    pub fn x_angle(&self) -> f32 {
        self.x_angle
    }

    /// Accumulated rotation about y, in degrees.
    pub fn y_angle(&self) -> f32 {
        self.y_angle
    }

    /// Limit `degrees` so the accumulated angle on `axis` stays in range.
    ///
    /// Rotation about z is unrestricted.
    fn clamp(&self, axis: Axis, degrees: f32) -> f32 {
        match axis {
            Axis::X => degrees.clamp(self.x.min - self.x_angle, self.x.max - self.x_angle),
            Axis::Y => degrees.clamp(self.y.min - self.y_angle, self.y.max - self.y_angle),
            Axis::Z => degrees,
        }
    }

    fn accumulate(&mut self, axis: Axis, degrees: f32) {
        match axis {
            Axis::X => self.x_angle += degrees,
            Axis::Y => self.y_angle += degrees,
            Axis::Z => {}
        }
    }
}

/// What a node contributes besides its transform.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Grouping node with no geometry
    Plain,
    /// Leaf surface: a primitive shaded with a material
    Geometry {
        primitive: Arc<Primitive>,
        material: Arc<PhongMaterial>,
    },
    /// Grouping node whose x/y rotations are range-limited
    Joint(Joint),
}

/// A node in the scene hierarchy.
///
/// Children are owned; primitives and materials are shared so several nodes
/// can reference the same mesh or surface description.
#[derive(Debug, Clone)]
pub struct SceneNode {
    name: String,
    transform: Mat4,
    inverse: Mat4,
    normal_matrix: Mat3,
    kind: NodeKind,
    children: Vec<SceneNode>,
}

impl SceneNode {
    /// A plain grouping node with the identity transform.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Plain)
    }

    /// A geometry node drawing `primitive` with `material`.
    pub fn geometry(
        name: impl Into<String>,
        primitive: impl Into<Arc<Primitive>>,
        material: Arc<PhongMaterial>,
    ) -> Self {
        Self::with_kind(
            name,
            NodeKind::Geometry {
                primitive: primitive.into(),
                material,
            },
        )
    }

    /// A joint node. The initial x then y rotations are applied immediately.
    pub fn joint(name: impl Into<String>, x: JointRange, y: JointRange) -> SceneResult<Self> {
        let name = name.into();
        for (axis, range) in [('x', x), ('y', y)] {
            if !range.is_valid() {
                return Err(SceneError::InvalidJointRange {
                    node: name,
                    axis,
                    min: range.min,
                    init: range.init,
                    max: range.max,
                });
            }
        }

        let joint = Joint {
            x,
            y,
            x_angle: 0.0,
            y_angle: 0.0,
        };
        let mut node = Self::with_kind(name, NodeKind::Joint(joint));
        node.rotate(Axis::X, x.init)?;
        node.rotate(Axis::Y, y.init)?;
        Ok(node)
    }

    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
            normal_matrix: Mat3::IDENTITY,
            kind,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Joint state, for joint nodes.
    pub fn joint_state(&self) -> Option<&Joint> {
        match &self.kind {
            NodeKind::Joint(joint) => Some(joint),
            _ => None,
        }
    }

    /// Local-to-parent transform.
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Parent-to-local transform.
    pub fn inverse(&self) -> Mat4 {
        self.inverse
    }

    /// Carries local normals into the parent frame.
    pub fn normal_matrix(&self) -> Mat3 {
        self.normal_matrix
    }

    /// Replace the local transform.
    ///
    /// A matrix without a usable inverse is rejected and the node keeps its
    /// previous transform.
    pub fn set_transform(&mut self, transform: Mat4) -> SceneResult<()> {
        let inverse = transform
            .try_inverse()
            .ok_or_else(|| SceneError::NonInvertibleTransform {
                node: self.name.clone(),
            })?;
        self.transform = transform;
        self.inverse = inverse;
        self.normal_matrix = inverse.normal_matrix();
        Ok(())
    }

    /// Pre-multiply a translation onto the local transform.
    pub fn translate(&mut self, offset: Vec3) -> SceneResult<()> {
        self.set_transform(Mat4::from_translation(offset) * self.transform)
    }

    /// Pre-multiply a scale onto the local transform.
    pub fn scale(&mut self, amount: Vec3) -> SceneResult<()> {
        self.set_transform(Mat4::from_scale(amount) * self.transform)
    }

    /// Pre-multiply a rotation of `degrees` about `axis`.
    ///
    /// On a joint node x and y rotations are clamped so the accumulated angle
    /// stays inside the joint's range.
    pub fn rotate(&mut self, axis: Axis, degrees: f32) -> SceneResult<()> {
        let degrees = match &self.kind {
            NodeKind::Joint(joint) => {
                let clamped = joint.clamp(axis, degrees);
                if clamped != degrees {
                    log::debug!(
                        "Joint '{}': {} rotation {:.2} clamped to {:.2}",
                        self.name,
                        axis.label(),
                        degrees,
                        clamped
                    );
                }
                clamped
            }
            _ => degrees,
        };

        let rotation = Mat4::from_axis_angle(axis.unit(), degrees.to_radians());
        self.set_transform(rotation * self.transform)?;
        if let NodeKind::Joint(joint) = &mut self.kind {
            joint.accumulate(axis, degrees);
        }
        Ok(())
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Builder form of [`SceneNode::add_child`].
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.add_child(child);
        self
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [SceneNode] {
        &mut self.children
    }

    /// Depth-first search for a node by name, this node included.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Mutable variant of [`SceneNode::find`].
    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(name))
    }

    /// Number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Closest surface hit by `ray` (given in the parent frame) with `t`
    /// strictly inside `ray_t`.
    ///
    /// The returned point and normal are in the parent frame, so calling this
    /// on the root yields world-space results. The normal is not normalized.
    /// `t` is shared by every frame because directions are transformed along
    /// with origins and never renormalized.
    pub fn hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        culling: impl Into<MeshCulling>,
    ) -> HitRecord<'_> {
        self.hit_local(ray, ray_t, culling.into())
    }

    fn hit_local(&self, ray: &Ray, ray_t: Interval, culling: MeshCulling) -> HitRecord<'_> {
        let local = ray.transformed(&self.inverse);
        let mut closest = HitRecord::miss();
        let mut interval = ray_t;

        if let NodeKind::Geometry {
            primitive,
            material,
        } = &self.kind
        {
            let mut rec: HitRecord<'_> = primitive.hit(&local, interval, culling);
            if rec.hit {
                interval = interval.with_max(rec.t);
                rec.material = Some(material.as_ref());
                rec.node = Some(self.name.as_str());
                closest = rec;
            }
        }

        for child in &self.children {
            let rec = child.hit_local(&local, interval, culling);
            if rec.hit {
                interval = interval.with_max(rec.t);
                closest = rec;
            }
        }

        if closest.hit {
            closest.point = self.transform.transform_point3(closest.point);
            closest.normal = self.normal_matrix * closest.normal;
        }
        closest
    }
}
