use std::ops::{Add, Mul};

use plumb_mesh::{Attribute, AttributeData, AttributeKind, Color3, Interpolation, Vector2, Vector3};

use crate::{EvaluatorError, EvaluatorResult};

/// A single attribute value sampled at a location on the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue<'a> {
    Float(f32),
    Int(i32),
    Vector2(Vector2),
    Vector3(Vector3),
    Color(Color3),
    String(&'a str),
}

impl AttributeValue<'_> {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Float(_) => AttributeKind::Float,
            AttributeValue::Int(_) => AttributeKind::Int,
            AttributeValue::Vector2(_) => AttributeKind::Vector2,
            AttributeValue::Vector3(_) => AttributeKind::Vector3,
            AttributeValue::Color(_) => AttributeKind::Color,
            AttributeValue::String(_) => AttributeKind::String,
        }
    }
}

/// The attribute elements a sample on one triangle is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Support {
    Single(usize),
    Corners([usize; 3]),
}

impl Support {
    /// Corner values of a triangulated mesh are laid out three per triangle,
    /// so face `t` owns corners `3t..3t+3`.
    pub(crate) fn new(interpolation: Interpolation, triangle: usize, vertex_ids: [u32; 3]) -> Self {
        match interpolation {
            Interpolation::Constant => Support::Single(0),
            Interpolation::Uniform => Support::Single(triangle),
            Interpolation::Vertex => Support::Corners(vertex_ids.map(|v| v as usize)),
            Interpolation::FaceVarying => {
                let first = 3 * triangle;
                Support::Corners([first, first + 1, first + 2])
            }
        }
    }
}

fn fetch<T>(values: &[T], index: usize) -> EvaluatorResult<&T> {
    values.get(index).ok_or(EvaluatorError::InvalidAttribute {
        index,
        len: values.len(),
    })
}

/// Linear blend of the supporting values with barycentric weights.
pub(crate) fn blend<T>(values: &[T], support: Support, bary: Vector3) -> EvaluatorResult<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    match support {
        Support::Single(i) => fetch(values, i).copied(),
        Support::Corners([a, b, c]) => {
            let (a, b, c) = (*fetch(values, a)?, *fetch(values, b)?, *fetch(values, c)?);
            Ok(a * bary.x + b * bary.y + c * bary.z)
        }
    }
}

/// Picks the supporting value with the largest weight, for data that has no
/// meaningful blend. Ties go to the earlier corner.
pub(crate) fn nearest<T>(values: &[T], support: Support, bary: Vector3) -> EvaluatorResult<&T> {
    match support {
        Support::Single(i) => fetch(values, i),
        Support::Corners(corners) => {
            let weights = [bary.x, bary.y, bary.z];
            let mut best = 0;
            for k in 1..3 {
                if weights[k] > weights[best] {
                    best = k;
                }
            }
            fetch(values, corners[best])
        }
    }
}

/// Samples `attribute` on triangle `triangle` at the barycentric location `bary`.
pub fn interpolate(
    attribute: &Attribute,
    triangle: usize,
    vertex_ids: [u32; 3],
    bary: Vector3,
) -> EvaluatorResult<AttributeValue<'_>> {
    let support = Support::new(attribute.interpolation, triangle, vertex_ids);
    Ok(match &attribute.data {
        AttributeData::Float(v) => AttributeValue::Float(blend(v, support, bary)?),
        AttributeData::Int(v) => AttributeValue::Int(*nearest(v, support, bary)?),
        AttributeData::Vector2(v) => AttributeValue::Vector2(blend(v, support, bary)?),
        AttributeData::Vector3(v) => AttributeValue::Vector3(blend(v, support, bary)?),
        AttributeData::Color(v) => AttributeValue::Color(blend(v, support, bary)?),
        AttributeData::String(v) => AttributeValue::String(nearest(v, support, bary)?.as_str()),
    })
}
