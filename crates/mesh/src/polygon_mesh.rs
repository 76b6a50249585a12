use std::collections::{BTreeMap, HashMap};

use ordered_float::OrderedFloat;

use crate::{Attribute, Interpolation, MeshError, MeshResult, Triangle, TriangleMesh, Vector3};

/// A mesh of arbitrary polygons with named attribute channels.
///
/// Faces are stored as a run-length list: `vertices_per_face[f]` consecutive
/// entries of `vertex_ids` make up face `f`. For example two triangles sharing
/// an edge of a unit square
///
/// ```text
///    3 ------- 2
///    |       / |
///    |     /   |
///    |   /     |
///    | /       |
///    0 ------- 1
/// ```
///
/// are `vertices_per_face = [3, 3]` and `vertex_ids = [0, 1, 2, 0, 2, 3]`.
/// The index `i` of an entry in `vertex_ids` is also the "corner" used to look
/// up face-varying attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonMesh {
    points: Vec<Vector3>,
    vertices_per_face: Vec<u32>,
    vertex_ids: Vec<u32>,
    attributes: BTreeMap<String, Attribute>,
}

impl PolygonMesh {
    pub fn new(
        points: Vec<Vector3>,
        vertices_per_face: Vec<u32>,
        vertex_ids: Vec<u32>,
    ) -> MeshResult<Self> {
        let expected: usize = vertices_per_face.iter().map(|&n| n as usize).sum();
        if expected != vertex_ids.len() {
            return Err(MeshError::VertexCountMismatch {
                expected,
                actual: vertex_ids.len(),
            });
        }
        if let Some(face) = vertices_per_face.iter().position(|&n| n < 3) {
            return Err(MeshError::DegenerateFace {
                face,
                vertices: vertices_per_face[face],
            });
        }
        if let Some(&index) = vertex_ids.iter().find(|&&id| id as usize >= points.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                points: points.len(),
            });
        }
        Ok(Self {
            points,
            vertices_per_face,
            vertex_ids,
            attributes: BTreeMap::new(),
        })
    }

    /// Builds a triangle mesh from shared points and index triples.
    pub fn from_indexed_triangles(points: Vec<Vector3>, triangles: &[[u32; 3]]) -> MeshResult<Self> {
        let vertex_ids = triangles.iter().flatten().copied().collect();
        Self::new(points, vec![3; triangles.len()], vertex_ids)
    }

    pub fn points(&self) -> &[Vector3] {
        &self.points
    }

    pub fn vertices_per_face(&self) -> &[u32] {
        &self.vertices_per_face
    }

    pub fn vertex_ids(&self) -> &[u32] {
        &self.vertex_ids
    }

    pub fn face_count(&self) -> usize {
        self.vertices_per_face.len()
    }

    /// True when every face has exactly three vertices.
    pub fn is_triangulated(&self) -> bool {
        self.vertices_per_face.iter().all(|&n| n == 3)
    }

    pub fn faces(&self) -> Faces<'_> {
        Faces {
            counts: self.vertices_per_face.iter(),
            ids: &self.vertex_ids,
        }
    }

    /// The number of values an attribute with the given interpolation must hold.
    pub fn variable_size(&self, interpolation: Interpolation) -> usize {
        match interpolation {
            Interpolation::Constant => 1,
            Interpolation::Uniform => self.vertices_per_face.len(),
            Interpolation::Vertex => self.points.len(),
            Interpolation::FaceVarying => self.vertex_ids.len(),
        }
    }

    pub fn add_attribute<S: Into<String>>(&mut self, name: S, attribute: Attribute) -> MeshResult<()> {
        let name = name.into();
        let expected = self.variable_size(attribute.interpolation);
        if attribute.len() != expected {
            return Err(MeshError::AttributeSize {
                name,
                interpolation: attribute.interpolation,
                expected,
                actual: attribute.len(),
            });
        }
        self.attributes.insert(name, attribute);
        Ok(())
    }

    /// Builder flavoured version of [`PolygonMesh::add_attribute`].
    pub fn with_attribute<S: Into<String>>(mut self, name: S, attribute: Attribute) -> MeshResult<Self> {
        self.add_attribute(name, attribute)?;
        Ok(self)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        self.attributes.remove(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> + '_ {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

pub struct Faces<'a> {
    counts: std::slice::Iter<'a, u32>,
    ids: &'a [u32],
}

impl<'a> Iterator for Faces<'a> {
    type Item = &'a [u32];

    fn next(&mut self) -> Option<Self::Item> {
        let n = *self.counts.next()? as usize;
        // The counts were validated against the id list on construction.
        let (face, rest) = self.ids.split_at(n);
        self.ids = rest;
        Some(face)
    }
}

type PointKey = [OrderedFloat<f32>; 3];

fn point_key(p: &Vector3) -> PointKey {
    [OrderedFloat(p.x), OrderedFloat(p.y), OrderedFloat(p.z)]
}

impl TriangleMesh for PolygonMesh {
    /// Welds the triangle soup into shared points.
    ///
    /// Formats like STL repeat every point for each facet. Points that are
    /// bitwise equal (with -0.0 == 0.0) are merged so that neighbouring
    /// triangles share vertex ids, which is what edge based queries need.
    fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let mut lookup: HashMap<PointKey, u32> = HashMap::new();
        let mut points = Vec::new();
        let mut vertex_ids = Vec::with_capacity(triangles.len() * 3);
        for t in &triangles {
            for p in t.points() {
                let id = *lookup.entry(point_key(&p)).or_insert_with(|| {
                    points.push(p);
                    (points.len() - 1) as u32
                });
                vertex_ids.push(id);
            }
        }
        Self {
            points,
            vertices_per_face: vec![3; triangles.len()],
            vertex_ids,
            attributes: BTreeMap::new(),
        }
    }

    fn triangle_count(&self) -> usize {
        self.vertices_per_face.iter().map(|&n| n as usize - 2).sum()
    }

    /// Yields every face, fanning polygons with more than three vertices
    /// around their first vertex.
    fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces().flat_map(move |face| {
            (1..face.len() - 1).map(move |i| Triangle {
                p0: self.points[face[0] as usize],
                p1: self.points[face[i] as usize],
                p2: self.points[face[i + 1] as usize],
            })
        })
    }
}
