use std::fmt;
use std::ops::{Add, Mul};

use crate::{Vector2, Vector3};

/// How the values of an attribute map onto the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interpolation {
    /// A single value for the whole mesh.
    Constant,
    /// One value per face.
    Uniform,
    /// One value per point, blended across each face.
    Vertex,
    /// One value per face corner, so neighbouring faces may disagree at a
    /// shared point (UV seams, hard normals).
    FaceVarying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Float,
    Int,
    Vector2,
    Vector3,
    Color,
    String,
}

impl AttributeKind {
    pub fn name(self) -> &'static str {
        match self {
            AttributeKind::Float => "float",
            AttributeKind::Int => "int",
            AttributeKind::Vector2 => "vector2",
            AttributeKind::Vector3 => "vector3",
            AttributeKind::Color => "color",
            AttributeKind::String => "string",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Add for Color3 {
    type Output = Color3;

    fn add(self, rhs: Color3) -> Color3 {
        Color3::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Mul<f32> for Color3 {
    type Output = Color3;

    fn mul(self, rhs: f32) -> Color3 {
        Color3::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

/// Typed storage for the values of one attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeData {
    Float(Vec<f32>),
    Int(Vec<i32>),
    Vector2(Vec<Vector2>),
    Vector3(Vec<Vector3>),
    Color(Vec<Color3>),
    String(Vec<String>),
}

impl AttributeData {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeData::Float(_) => AttributeKind::Float,
            AttributeData::Int(_) => AttributeKind::Int,
            AttributeData::Vector2(_) => AttributeKind::Vector2,
            AttributeData::Vector3(_) => AttributeKind::Vector3,
            AttributeData::Color(_) => AttributeKind::Color,
            AttributeData::String(_) => AttributeKind::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AttributeData::Float(v) => v.len(),
            AttributeData::Int(v) => v.len(),
            AttributeData::Vector2(v) => v.len(),
            AttributeData::Vector3(v) => v.len(),
            AttributeData::Color(v) => v.len(),
            AttributeData::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named channel of per-element data attached to a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub interpolation: Interpolation,
    pub data: AttributeData,
}

impl Attribute {
    pub fn new(interpolation: Interpolation, data: AttributeData) -> Self {
        Self {
            interpolation,
            data,
        }
    }

    pub fn kind(&self) -> AttributeKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
