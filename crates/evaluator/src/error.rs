use thiserror::Error;

pub type EvaluatorResult<T> = Result<T, EvaluatorError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluatorError {
    /// The mesh has a face that is not a triangle.
    #[error("mesh is not triangulated: face {face} has {vertices} vertices")]
    InvalidMesh { face: usize, vertices: u32 },

    /// A result or attribute had a different type than the query expected.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("mesh has no triangles")]
    EmptyMesh,

    #[error("unsupported query: {0}")]
    Unsupported(&'static str),

    /// An attribute is too short for the triangle a result refers to, which
    /// happens when it belongs to a different mesh.
    #[error("attribute index {index} is out of range for {len} values")]
    InvalidAttribute { index: usize, len: usize },
}
