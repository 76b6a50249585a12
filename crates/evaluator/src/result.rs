use cgmath::Zero;
use plumb_mesh::{Attribute, AttributeKind, Color3, Vector2, Vector3};

use crate::interpolate::{interpolate, AttributeValue};
use crate::{EvaluatorError, EvaluatorResult};

/// Identifies the evaluator that produced a [`PrimitiveResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum EvaluatorKind {
    Mesh,
}

impl EvaluatorKind {
    pub fn name(self) -> &'static str {
        match self {
            EvaluatorKind::Mesh => "mesh",
        }
    }
}

/// The outcome of a query: where on the surface it landed and the local
/// frame there.
///
/// Results are owned by the caller and reused across queries. A query only
/// writes to the result when it succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveResult {
    kind: Option<EvaluatorKind>,
    pub(crate) point: Vector3,
    pub(crate) normal: Vector3,
    pub(crate) geometric_normal: Vector3,
    pub(crate) uv: Vector2,
    pub(crate) u_tangent: Vector3,
    pub(crate) v_tangent: Vector3,
    pub(crate) barycentric: Vector3,
    pub(crate) triangle_index: usize,
    pub(crate) vertex_ids: [u32; 3],
    pub(crate) distance: f32,
}

impl Default for PrimitiveResult {
    /// An unbound result, rejected by every evaluator's `validate_result`.
    fn default() -> Self {
        Self {
            kind: None,
            point: Vector3::zero(),
            normal: Vector3::zero(),
            geometric_normal: Vector3::zero(),
            uv: Vector2::zero(),
            u_tangent: Vector3::zero(),
            v_tangent: Vector3::zero(),
            barycentric: Vector3::new(1.0, 0.0, 0.0),
            triangle_index: 0,
            vertex_ids: [0; 3],
            distance: 0.0,
        }
    }
}

fn mismatch(expected: AttributeKind, found: AttributeKind) -> EvaluatorError {
    EvaluatorError::TypeMismatch {
        expected: expected.name(),
        found: found.name(),
    }
}

impl PrimitiveResult {
    pub fn new(kind: EvaluatorKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn kind(&self) -> Option<EvaluatorKind> {
        self.kind
    }

    pub fn point(&self) -> Vector3 {
        self.point
    }

    /// Interpolated shading normal, unit length.
    pub fn normal(&self) -> Vector3 {
        self.normal
    }

    /// Unit normal of the triangle itself, zero for a degenerate triangle.
    pub fn geometric_normal(&self) -> Vector3 {
        self.geometric_normal
    }

    /// Texture coordinate at the point, zero when the mesh has no uvs.
    pub fn uv(&self) -> Vector2 {
        self.uv
    }

    /// Surface derivative along u. Not normalized.
    pub fn u_tangent(&self) -> Vector3 {
        self.u_tangent
    }

    pub fn v_tangent(&self) -> Vector3 {
        self.v_tangent
    }

    pub fn barycentric(&self) -> Vector3 {
        self.barycentric
    }

    pub fn triangle_index(&self) -> usize {
        self.triangle_index
    }

    pub fn vertex_ids(&self) -> [u32; 3] {
        self.vertex_ids
    }

    /// Distance along the ray for intersections, or from the query point for
    /// closest point lookups.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Samples `attribute` at the stored triangle and barycentric location.
    ///
    /// The attribute must belong to the mesh that produced this result.
    pub fn attribute<'a>(&self, attribute: &'a Attribute) -> EvaluatorResult<AttributeValue<'a>> {
        interpolate(attribute, self.triangle_index, self.vertex_ids, self.barycentric)
    }

    pub fn float_attribute(&self, attribute: &Attribute) -> EvaluatorResult<f32> {
        match self.attribute(attribute)? {
            AttributeValue::Float(f) => Ok(f),
            other => Err(mismatch(AttributeKind::Float, other.kind())),
        }
    }

    pub fn int_attribute(&self, attribute: &Attribute) -> EvaluatorResult<i32> {
        match self.attribute(attribute)? {
            AttributeValue::Int(i) => Ok(i),
            other => Err(mismatch(AttributeKind::Int, other.kind())),
        }
    }

    pub fn vector2_attribute(&self, attribute: &Attribute) -> EvaluatorResult<Vector2> {
        match self.attribute(attribute)? {
            AttributeValue::Vector2(v) => Ok(v),
            other => Err(mismatch(AttributeKind::Vector2, other.kind())),
        }
    }

    pub fn vector_attribute(&self, attribute: &Attribute) -> EvaluatorResult<Vector3> {
        match self.attribute(attribute)? {
            AttributeValue::Vector3(v) => Ok(v),
            other => Err(mismatch(AttributeKind::Vector3, other.kind())),
        }
    }

    pub fn color_attribute(&self, attribute: &Attribute) -> EvaluatorResult<Color3> {
        match self.attribute(attribute)? {
            AttributeValue::Color(c) => Ok(c),
            other => Err(mismatch(AttributeKind::Color, other.kind())),
        }
    }

    pub fn string_attribute<'a>(&self, attribute: &'a Attribute) -> EvaluatorResult<&'a str> {
        match self.attribute(attribute)? {
            AttributeValue::String(s) => Ok(s),
            other => Err(mismatch(AttributeKind::String, other.kind())),
        }
    }
}
