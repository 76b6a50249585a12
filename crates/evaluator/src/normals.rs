use std::collections::HashMap;

use cgmath::{InnerSpace, Zero};
use plumb_mesh::{Triangle, Vector3};

fn normalize_or_zero(v: Vector3) -> Vector3 {
    let len = v.magnitude();
    if len > f32::MIN_POSITIVE && len.is_finite() {
        v / len
    } else {
        Vector3::zero()
    }
}

fn triangle(points: &[Vector3], [a, b, c]: [u32; 3]) -> Triangle {
    Triangle::new(points[a as usize], points[b as usize], points[c as usize])
}

/// Undirected edge key, low vertex id first.
pub fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Per point normals, each the sum of the adjacent face normals weighted by
/// the face's corner angle at that point.
///
/// Points touched only by degenerate faces get a zero normal.
pub(crate) fn vertex_normals(points: &[Vector3], triangles: &[[u32; 3]]) -> Vec<Vector3> {
    let mut normals = vec![Vector3::zero(); points.len()];
    for &ids in triangles {
        let t = triangle(points, ids);
        let Some(n) = t.normal() else {
            continue;
        };
        let p = t.points();
        for k in 0..3 {
            let e1 = p[(k + 1) % 3] - p[k];
            let e2 = p[(k + 2) % 3] - p[k];
            let angle = e1.angle(e2).0;
            if angle.is_finite() {
                normals[ids[k] as usize] += n * angle;
            }
        }
    }
    normals.into_iter().map(normalize_or_zero).collect()
}

/// Average face normal of every edge of a mesh.
#[derive(Debug, Clone, Default)]
pub struct EdgeNormals {
    normals: HashMap<(u32, u32), Vector3>,
    open_edges: usize,
}

impl EdgeNormals {
    pub(crate) fn new(points: &[Vector3], triangles: &[[u32; 3]]) -> Self {
        let mut edges: HashMap<(u32, u32), (Vector3, usize)> = HashMap::new();
        for &ids in triangles {
            let n = triangle(points, ids).normal().unwrap_or_else(Vector3::zero);
            for k in 0..3 {
                let (a, b) = (ids[k], ids[(k + 1) % 3]);
                if a == b {
                    continue;
                }
                let entry = edges.entry(edge_key(a, b)).or_insert((Vector3::zero(), 0));
                entry.0 += n;
                entry.1 += 1;
            }
        }

        let open_edges = edges.values().filter(|(_, uses)| *uses != 2).count();
        let normals = edges
            .into_iter()
            .map(|(key, (sum, _))| (key, normalize_or_zero(sum)))
            .collect();
        Self { normals, open_edges }
    }

    /// The normal of the edge between points `a` and `b`, in either order.
    pub fn get(&self, a: u32, b: u32) -> Option<Vector3> {
        self.normals.get(&edge_key(a, b)).copied()
    }

    pub fn len(&self) -> usize {
        self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    /// Edges used by a number of faces other than two: boundary edges and
    /// non-manifold ones.
    pub fn open_edges(&self) -> usize {
        self.open_edges
    }
}
