//! Scene construction errors.

use thiserror::Error;

/// Errors raised while building a scene graph.
///
/// Ray queries never fail; these only come out of constructors and
/// transform setters, before any render starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("transform of node '{node}' is not invertible")]
    NonInvertibleTransform { node: String },

    #[error("face {face} references vertex {index}, mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("joint '{node}' has an invalid {axis} range: min {min}, init {init}, max {max}")]
    InvalidJointRange {
        node: String,
        axis: char,
        min: f32,
        init: f32,
        max: f32,
    },
}

/// Result type for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;
