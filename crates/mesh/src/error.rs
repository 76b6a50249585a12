use thiserror::Error;

use crate::Interpolation;

pub type MeshResult<T> = Result<T, MeshError>;

/// Reasons a mesh or one of its attributes fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("face vertex counts sum to {expected} but {actual} vertex ids were given")]
    VertexCountMismatch { expected: usize, actual: usize },

    #[error("face {face} has {vertices} vertices, at least 3 are required")]
    DegenerateFace { face: usize, vertices: u32 },

    #[error("vertex id {index} is out of range for {points} points")]
    IndexOutOfRange { index: u32, points: usize },

    #[error("attribute `{name}` has {actual} elements, {interpolation:?} interpolation needs {expected}")]
    AttributeSize {
        name: String,
        interpolation: Interpolation,
        expected: usize,
        actual: usize,
    },
}
